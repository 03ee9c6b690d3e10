use iced::widget::{button, column, text, text_input, Container};
use iced::{Center, Length};

use crate::app::{App, Message};

pub fn tenant_select_screen(app: &App) -> Container<Message> {
    let mut content = column![
        text("Select your school").size(30),
        text("Every request is scoped to a school. Enter the identifier you were given."),
        text_input("School identifier", &app.tenant_input)
            .on_input(Message::TenantInputChanged)
            .on_submit(Message::TenantSubmitted)
            .width(Length::Fixed(320.0)),
        button(text("Continue")).on_press(Message::TenantSubmitted),
    ]
        .spacing(15)
        .align_x(Center);

    if let Some(err) = &app.tenant_error {
        content = content.push(text(err).style(text::danger));
    }

    Container::new(content)
        .center(Length::Fill)
        .padding(40)
}
