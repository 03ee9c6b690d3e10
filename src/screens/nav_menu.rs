use iced::{widget::{button, column}, Alignment, Element, Length, Renderer, Theme};
use iced::widget::{text, vertical_space, Container, Row};
use iced_font_awesome::fa_icon_solid;
use crate::app::{App, Message, Screen};

fn icon_button_content<'a>(
    icon_element: impl Into<Element<'a, Message, Theme, Renderer>>,
    label: &'a str,
) -> Row<'a, Message> {
    Row::new()
        .align_y(Alignment::Center)
        .spacing(5)
        .push(icon_element)
        .push(text(label))
}

fn nav_button<'a>(app: &'a App, icon: &'static str, label: &'static str, target: Screen, message: Message) -> Element<'a, Message> {
    // The active page stays pressed.
    let on_press = (app.current_screen != target).then_some(message);
    button(icon_button_content(
        fa_icon_solid(icon).style(move |_| text::base(&app.theme)),
        label,
    ))
        .on_press_maybe(on_press)
        .width(Length::Fill)
        .into()
}

pub fn nav_menu(app: &App) -> Container<Message> {
    let content = column![
        nav_button(app, "table", "Grades", Screen::GradesTable, Message::GoToGradesTable),
        nav_button(app, "user-graduate", "Student portal", Screen::StudentPortal, Message::GoToStudentPortal),
        vertical_space(),
        nav_button(app, "gear", "Settings", Screen::Settings, Message::GoToSettings),
    ]
        .spacing(10);

    Container::new(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(10)
}
