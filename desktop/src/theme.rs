//! Colors and container styles for EnergyGrid Admin

use iced::widget::container;
use iced::{Background, Border, Color, Theme};

pub mod colors {
    use iced::Color;

    pub const PRIMARY_GREEN: Color = Color::from_rgb(0.13, 0.70, 0.42); // #21b36b
    pub const RED: Color = Color::from_rgb(1.0, 0.27, 0.23); // #ff453a
    pub const GRAY: Color = Color::from_rgb(0.56, 0.56, 0.58);
}

/// Banner behind general sign-in errors.
pub struct ErrorBanner;

impl container::StyleSheet for ErrorBanner {
    type Style = Theme;

    fn appearance(&self, _style: &Self::Style) -> container::Appearance {
        container::Appearance {
            background: Some(Background::Color(Color::from_rgb(0.3, 0.1, 0.1))),
            text_color: Some(Color::WHITE),
            border: Border {
                color: colors::RED,
                width: 1.0,
                radius: 4.0.into(),
            },
            ..Default::default()
        }
    }
}

/// Card holding the sign-in form and the admin summary.
pub struct Card;

impl container::StyleSheet for Card {
    type Style = Theme;

    fn appearance(&self, style: &Self::Style) -> container::Appearance {
        let palette = style.extended_palette();
        container::Appearance {
            background: Some(Background::Color(palette.background.weak.color)),
            border: Border {
                color: palette.background.strong.color,
                width: 1.0,
                radius: 8.0.into(),
            },
            ..Default::default()
        }
    }
}
