use iced::widget::container::{background, bordered_box};
use iced::widget::{button, mouse_area, text, Column, Container, Row, Stack};
use iced::{Color, Element, Length};

use crate::app::state::Screen;
use crate::screens::{
    grades_table_screen, nav_menu, settings_screen, student_portal_screen, tenant_select_screen,
};
use super::{App, Message};

impl App {
    pub fn view(&self) -> Element<Message> {
        let base = Row::new()
            .spacing(20)
            .push(
                if self.current_screen != Screen::TenantSelect {
                    Container::new(nav_menu(self))
                        .width(Length::Fixed(200.0))
                        .height(Length::Fill)
                        .padding(10)
                } else {
                    Container::new(Column::new())
                        .width(Length::Fixed(0.0))
                        .height(Length::Fill)
                },
            )
            .push(
                match &self.current_screen {
                    Screen::TenantSelect => tenant_select_screen(self),
                    Screen::GradesTable => grades_table_screen(self),
                    Screen::StudentPortal => student_portal_screen(self),
                    Screen::Settings => settings_screen(self),
                }
                .width(Length::Fill),
            );

        let Some(alert) = &self.alert else {
            return base.into();
        };

        let modal = Container::new(
            Column::new()
                .spacing(15)
                .push(text("Notice").size(24))
                .push(text(alert))
                .push(button(text("OK")).on_press(Message::DismissAlert)),
        )
        .style(move |_| bordered_box(&self.theme))
        .padding(20)
        .width(Length::Fixed(420.0));

        // The backdrop blocks the screen underneath; clicking it dismisses.
        let overlay = Container::new(
            mouse_area(Container::new(modal).center(Length::Fill).padding(40))
                .on_press(Message::DismissAlert),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .style(move |_| background(Color { r: 0.0, g: 0.0, b: 0.0, a: 0.7 }));

        Stack::new().push(base).push(overlay).into()
    }
}
