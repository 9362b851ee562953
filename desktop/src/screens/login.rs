//! Sign-in screen for EnergyGrid Admin

use crate::messages::Message;
use crate::state::AppState;
use crate::theme::{colors, Card, ErrorBanner};
use energygrid_core::{Field, SubmitPath};
use iced::widget::{button, checkbox, column, container, text, text_input, Column, Space};
use iced::{alignment, Alignment, Element, Length};

pub struct LoginScreen;

impl LoginScreen {
    pub fn view(state: &AppState) -> Element<'_, Message> {
        let form = &state.form;
        let busy = form.is_loading();

        let title = text("EnergyGrid")
            .size(40)
            .style(iced::theme::Text::Color(colors::PRIMARY_GREEN));
        let subtitle = text("Sign in to the admin console").size(16);

        // General error banner
        let banner: Element<'_, Message> = match form.error(Field::General) {
            Some(message) => container(text(message).size(14))
                .padding(12)
                .width(Length::Fill)
                .style(iced::theme::Container::Custom(Box::new(ErrorBanner)))
                .into(),
            None => Space::with_height(0).into(),
        };

        // Credentials
        let mut email_input = text_input("you@energygrid.com", &form.credentials().email).padding(12);
        let mut password_input = text_input("Password", &form.credentials().password)
            .padding(12)
            .secure(true);
        if !busy {
            email_input = email_input.on_input(Message::EmailChanged);
            password_input = password_input
                .on_input(Message::PasswordChanged)
                .on_submit(Message::Submit);
        }

        let credentials = column![
            text("Email").size(14),
            email_input,
            field_error(form.error(Field::Email)),
            text("Password").size(14),
            password_input,
            field_error(form.error(Field::Password)),
            checkbox("Remember me", form.credentials().remember_me)
                .on_toggle(Message::RememberMeToggled),
        ]
        .spacing(8);

        // Actions
        let sign_in_label = if form.is_loading_for(SubmitPath::Manual) {
            "Signing in..."
        } else {
            "Sign In"
        };
        let mut sign_in_btn = button(
            text(sign_in_label).horizontal_alignment(alignment::Horizontal::Center),
        )
        .width(Length::Fill)
        .padding(14);

        let demo_label = if form.is_loading_for(SubmitPath::Demo) {
            "Loading demo..."
        } else {
            "Try the demo account"
        };
        let mut demo_btn = button(
            text(demo_label).horizontal_alignment(alignment::Horizontal::Center),
        )
        .width(Length::Fill)
        .padding(14)
        .style(iced::theme::Button::Secondary);

        // Either path in flight disables both
        if !busy {
            sign_in_btn = sign_in_btn.on_press(Message::Submit);
            demo_btn = demo_btn.on_press(Message::DemoLogin);
        }

        let status = if state.is_restoring {
            text("Checking saved session...")
                .size(12)
                .style(iced::theme::Text::Color(colors::GRAY))
        } else {
            text("")
        };

        let card = container(
            column![
                banner,
                credentials,
                Space::with_height(12),
                sign_in_btn,
                demo_btn,
                status,
            ]
            .spacing(10),
        )
        .padding(24)
        .max_width(420)
        .style(iced::theme::Container::Custom(Box::new(Card)));

        let theme_toggle = checkbox("Dark theme", state.config.is_dark())
            .on_toggle(Message::ThemeToggled)
            .size(14);

        let content = column![
            Space::with_height(Length::FillPortion(1)),
            title,
            subtitle,
            Space::with_height(30),
            card,
            Space::with_height(20),
            theme_toggle,
            Space::with_height(Length::FillPortion(1)),
        ]
        .align_items(Alignment::Center)
        .spacing(10)
        .padding(40);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x()
            .center_y()
            .into()
    }
}

fn field_error(message: Option<&str>) -> Column<'_, Message> {
    match message {
        Some(message) => column![text(message)
            .size(12)
            .style(iced::theme::Text::Color(colors::RED))],
        None => column![],
    }
}
