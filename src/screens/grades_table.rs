use iced::widget::container::bordered_box;
use iced::widget::scrollable::{Direction, Scrollbar};
use iced::widget::{
    button, horizontal_space, mouse_area, text, text_input, Column, Container, Row, Scrollable,
};
use iced::{Alignment, Element, Length};

use crate::app::{App, Message};
use crate::grades_table::{ColumnHeader, GradeCell, LoadState, TableBody, TableRow, NO_GRADE};
use crate::screens::grade_color;

const NAME_WIDTH: f32 = 220.0;
const CELL_WIDTH: f32 = 150.0;

fn header_cell<'a>(column: &ColumnHeader) -> Element<'a, Message> {
    let mut cell = Column::new()
        .spacing(2)
        .push(text(column.name.clone()).size(15))
        .push(text(column.info()).size(12));
    if !column.tags.is_empty() {
        cell = cell.push(text(column.tags.join(", ")).size(11));
    }
    Container::new(cell)
        .width(Length::Fixed(CELL_WIDTH))
        .padding(5)
        .into()
}

fn grade_cell<'a>(cell: &GradeCell) -> Element<'a, Message> {
    let content: Element<'a, Message> = match &cell.grade {
        Some(grade) => {
            let color = grade_color(grade.class);
            Column::new()
                .push(text(grade.score_label()).color(color))
                .push(text(format!("{}%", grade.percentage)).size(12))
                .into()
        }
        None => text(NO_GRADE).into(),
    };
    Container::new(content)
        .width(Length::Fixed(CELL_WIDTH))
        .padding(5)
        .into()
}

fn student_row<'a>(app: &'a App, row: &TableRow) -> Element<'a, Message> {
    let name = Column::new()
        .push(text(row.name.clone()))
        .push(text(row.email.clone()).size(12));

    let line = row
        .cells
        .iter()
        .filter(|cell| !cell.hidden)
        .fold(
            Row::new().push(Container::new(name).width(Length::Fixed(NAME_WIDTH)).padding(5)),
            |line, cell| line.push(grade_cell(cell)),
        )
        .align_y(Alignment::Center);

    mouse_area(Container::new(line).style(move |_| bordered_box(&app.theme)))
        .on_press(Message::StudentRowPressed(row.student_index))
        .into()
}

pub fn grades_table_screen(app: &App) -> Container<Message> {
    let table = &app.grades_table;
    let layout = table.render();
    let loaded = *table.state() == LoadState::Loaded;

    let filters = Row::new()
        .spacing(10)
        .align_y(Alignment::Center)
        .push(
            text_input("Filter by student name", &table.filter().student_query)
                .on_input(Message::StudentFilterChanged)
                .width(Length::Fixed(280.0)),
        )
        .push(
            text_input("Filter by tag", &table.filter().tag_query)
                .on_input(Message::TagFilterChanged)
                .width(Length::Fixed(220.0)),
        )
        .push(horizontal_space())
        .push(button(text("Reload")).on_press_maybe((*table.state() != LoadState::Loading).then_some(Message::ReloadGrades)))
        .push(button(text("Export XLSX")).on_press_maybe(loaded.then_some(Message::ExportTableXlsx)))
        .push(button(text("Export HTML")).on_press_maybe(loaded.then_some(Message::ExportTableHtml)));

    let summary = text(format!(
        "Showing {} of {} students, {} of {} assignments",
        layout.visible_students,
        layout.total_students,
        layout.visible_columns,
        layout.columns.len(),
    ));

    let header = layout
        .columns
        .iter()
        .filter(|column| !column.hidden)
        .fold(
            Row::new().push(
                Container::new(text("Student").size(15))
                    .width(Length::Fixed(NAME_WIDTH))
                    .padding(5),
            ),
            |header, column| header.push(header_cell(column)),
        );

    let body: Element<Message> = match &layout.body {
        TableBody::Rows(rows) => rows
            .iter()
            .fold(Column::new().spacing(4).push(header), |list, row| {
                list.push(student_row(app, row))
            })
            .into(),
        TableBody::Message(message) => Column::new()
            .spacing(10)
            .push(header)
            .push(Container::new(text(*message)).padding(10))
            .into(),
    };

    let grid = Scrollable::new(Container::new(body).padding(10))
        .direction(Direction::Both {
            vertical: Scrollbar::new(),
            horizontal: Scrollbar::new(),
        })
        .width(Length::Fill)
        .height(Length::Fill);

    let mut content = Column::new()
        .spacing(15)
        .push(text("Grades").size(30))
        .push(filters)
        .push(summary)
        .push(grid);

    if !app.status_message.is_empty() {
        content = content.push(text(&app.status_message));
    }

    Container::new(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(20)
}
