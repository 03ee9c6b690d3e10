use iced::{widget::{column, text, Container, vertical_space}, Length, Center, Theme};
use iced::widget::{button, pick_list, row, text_input};
use crate::app::{App, Message};
use crate::config::theme_to_str;

pub fn settings_screen(app: &App) -> Container<Message> {
    let current_name = theme_to_str(&app.theme);
    let theme_names: Vec<&'static str> = Theme::ALL.iter().map(theme_to_str).collect();

    let tenant_label = match app.config.tenant() {
        Some(tenant) => format!("School: {tenant}"),
        None if app.config.require_tenant => "School: not selected".to_string(),
        None => "School: not required".to_string(),
    };

    let mut content = column![
        text("Settings").size(30),
        vertical_space().height(10),
        pick_list(theme_names, Some(current_name), Message::ThemeSelected)
            .placeholder("Choose a theme"),
        text("API base URL"),
        text_input("http://localhost:8000", &app.settings_api_url)
            .on_input(Message::ApiUrlChanged)
            .width(Length::Fixed(400.0)),
        text("Auto-refresh interval (seconds)"),
        text_input("300", &app.settings_refresh_secs)
            .on_input(Message::RefreshIntervalChanged)
            .on_submit(Message::SaveSettings)
            .width(Length::Fixed(400.0)),
        text(tenant_label),
        row![
            button(text("Test connection")).on_press(Message::TestConnection),
            button(text("Save")).on_press(Message::SaveSettings),
        ]
            .spacing(10),
    ]
        .spacing(15)
        .align_x(Center);

    if app.config.require_tenant {
        content = content.push(button(text("Change tenant")).on_press(Message::ChangeTenant));
    }

    if let Some(status) = &app.settings_status {
        content = content.push(text(status));
    }

    Container::new(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(40)
}
