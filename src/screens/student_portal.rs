use iced::widget::container::bordered_box;
use iced::widget::{button, row, text, text_input, Column, Container, Row, Scrollable};
use iced::{Alignment, Element, Length};

use crate::app::state::EMAIL_INPUT_ID;
use crate::app::{App, Message};
use crate::screens::grade_color;
use crate::student_portal::{PortalPanel, ReportView, NO_ASSIGNMENTS, SEARCHING};

fn summary_card<'a>(app: &'a App, label: &'a str, value: String) -> Element<'a, Message> {
    Container::new(
        Column::new()
            .spacing(4)
            .push(text(label).size(13))
            .push(text(value).size(22)),
    )
        .style(move |_| bordered_box(&app.theme))
        .padding(12)
        .width(Length::Fixed(180.0))
        .into()
}

fn report_view<'a>(app: &'a App, report: ReportView) -> Element<'a, Message> {
    let overall_color = grade_color(report.overall_class);

    let header = Column::new()
        .spacing(4)
        .push(text(report.name).size(26))
        .push(text(report.email));

    let cards = Row::new()
        .spacing(10)
        .push(summary_card(app, "Total Assignments", report.total_assignments.to_string()))
        .push(summary_card(app, "Points Earned", report.total_points))
        .push(summary_card(app, "Points Possible", report.max_possible))
        .push(
            Container::new(
                Column::new()
                    .spacing(4)
                    .push(text("Overall Grade").size(13))
                    .push(text(format!("{} ({})", report.overall_label, report.letter)).size(22).color(overall_color)),
            )
                .style(move |_| bordered_box(&app.theme))
                .padding(12)
                .width(Length::Fixed(180.0)),
        );

    let grades: Element<'a, Message> = if report.rows.is_empty() {
        text(NO_ASSIGNMENTS).into()
    } else {
        report
            .rows
            .into_iter()
            .fold(Column::new().spacing(6), |list, grade| {
                list.push(
                    Container::new(
                        Row::new()
                            .spacing(15)
                            .align_y(Alignment::Center)
                            .push(Column::new().push(text(grade.assignment)).push(text(grade.date_label).size(12)).width(Length::Fill))
                            .push(text(grade.score_label).width(Length::Fixed(120.0)))
                            .push(text(grade.percentage_label).color(grade_color(grade.class)).width(Length::Fixed(80.0))),
                    )
                        .style(move |_| bordered_box(&app.theme))
                        .padding(10),
                )
            })
            .into()
    };

    let exports = row![
        button(text("Export HTML")).on_press(Message::ExportReportHtml),
        button(text("Export PDF")).on_press(Message::ExportReportPdf),
    ]
        .spacing(10);

    Column::new()
        .spacing(15)
        .push(header)
        .push(cards)
        .push(text("Grades").size(20))
        .push(grades)
        .push(exports)
        .into()
}

pub fn student_portal_screen(app: &App) -> Container<Message> {
    let portal = &app.student_portal;
    let searching = portal.is_searching();

    let search_label = if searching { "Searching..." } else { "View grades" };
    let search_row = Row::new()
        .spacing(10)
        .align_y(Alignment::Center)
        .push(
            text_input("your.email@school.edu", portal.input())
                .id(text_input::Id::new(EMAIL_INPUT_ID))
                .on_input(Message::EmailInputChanged)
                .on_submit(Message::SearchPressed)
                .width(Length::Fixed(360.0)),
        )
        .push(button(text(search_label)).on_press_maybe((!searching).then_some(Message::SearchPressed)))
        .push(button(text("Clear")).on_press(Message::ClearPressed));

    let panel: Element<Message> = match portal.render() {
        PortalPanel::Hidden => Column::new().into(),
        PortalPanel::Invalid(message) => text(message).style(text::danger).into(),
        PortalPanel::Loading => text(SEARCHING).into(),
        PortalPanel::Found(report) => report_view(app, report),
        PortalPanel::NotFound { email } => Column::new()
            .spacing(6)
            .push(text("Student Not Found").size(20))
            .push(text(format!("No student found with email: {email}")))
            .push(text("Please check your email address and try again."))
            .into(),
        PortalPanel::Error { message } => text(message).style(text::danger).into(),
    };

    let mut content = Column::new()
        .spacing(20)
        .push(text("Student portal").size(30))
        .push(search_row)
        .push(Scrollable::new(panel).height(Length::Fill));

    if !app.status_message.is_empty() {
        content = content.push(text(&app.status_message));
    }

    Container::new(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(20)
}
