//! Admin landing screen shown after sign-in

use crate::messages::Message;
use crate::state::AppState;
use crate::theme::{colors, Card};
use iced::widget::{button, column, container, row, text, Space};
use iced::{Alignment, Element, Length};

pub struct AdminScreen;

impl AdminScreen {
    pub fn view(state: &AppState) -> Element<'_, Message> {
        let header = row![
            text("EnergyGrid Admin").size(24),
            Space::with_width(Length::Fill),
            button(text("Sign out"))
                .padding([8, 14])
                .on_press(Message::Logout),
        ]
        .padding(16)
        .align_items(Alignment::Center);

        let account = match state.user {
            Some(ref user) => column![
                text(format!("Welcome, {}", user.display_name())).size(20),
                Space::with_height(12),
                row![
                    text("Email:").size(14),
                    Space::with_width(8),
                    text(&user.email).size(14),
                ],
                row![
                    text("Role:").size(14),
                    Space::with_width(8),
                    text(user.role.as_deref().unwrap_or("member")).size(14),
                ],
            ]
            .spacing(8),
            None => column![text("Loading account...")
                .size(14)
                .style(iced::theme::Text::Color(colors::GRAY))],
        };

        let card = container(account)
            .padding(24)
            .width(Length::Fill)
            .style(iced::theme::Container::Custom(Box::new(Card)));

        let content = column![header, container(card).padding(16)].spacing(10);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}
