//! HTML, PDF and XLSX exports of the two views.
//!
//! Every string that reaches a document goes through [`escape_html`]; the
//! render models carry raw API text.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use headless_chrome::{Browser, LaunchOptionsBuilder};
use umya_spreadsheet::{new_file, writer};

use crate::error::AppError;
use crate::format::escape_html;
use crate::grades_table::{NO_GRADE, TableBody, TableLayout};
use crate::student_portal::{NO_ASSIGNMENTS, PortalPanel, ReportView, SEARCHING};

const STYLE: &str = r#"
  body { font-family: 'Fira Sans', sans-serif; margin: 24px; color: #3c3836; }
  h1 { font-size: 24px; }
  table { border-collapse: collapse; width: 100%; }
  th, td { border: 1px solid #d5c4a1; padding: 6px 10px; text-align: left; }
  th { background: #ebdbb2; }
  .assignment-info, .student-email, .assignment-date { font-size: 12px; color: #7c6f64; }
  .grade-good { color: #79740e; }
  .grade-medium { color: #b57614; }
  .grade-poor { color: #9d0006; }
  .no-grade, .no-results, .no-data { color: #928374; }
  .error, .not-found { border: 1px solid #9d0006; padding: 12px; }
  .stat-box { display: inline-block; margin-right: 24px; }
  .stat-value { font-size: 22px; font-weight: bold; }
"#;

pub fn reports_dir() -> Result<PathBuf, AppError> {
    let exe = std::env::current_exe()?;
    let exe_dir = exe
        .parent()
        .ok_or_else(|| AppError::Export("executable has no parent directory".to_string()))?;
    let dir = exe_dir.join("reports");
    if !dir.exists() {
        fs::create_dir_all(&dir)?;
    }
    Ok(dir)
}

/// `grades_2024-09-15_10-30-00.xlsx`
pub fn timestamped_name(stem: &str, extension: &str) -> String {
    format!("{stem}_{}.{extension}", Local::now().format("%Y-%m-%d_%H-%M-%S"))
}

fn document(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8" />
<title>{title}</title>
<style>{STYLE}</style>
</head>
<body>
{body}
</body>
</html>
"#,
        title = escape_html(title),
    )
}

fn hidden_attr(hidden: bool) -> &'static str {
    if hidden { " hidden" } else { "" }
}

pub fn table_fragment(layout: &TableLayout) -> String {
    let mut html = String::from("<table class=\"grades-matrix\">\n<thead><tr><th>Student</th>");
    for column in &layout.columns {
        let _ = write!(
            html,
            "<th{}><div class=\"assignment-name\">{}</div><div class=\"assignment-info\">{}</div></th>",
            hidden_attr(column.hidden),
            escape_html(&column.name),
            escape_html(&column.info()),
        );
    }
    html.push_str("</tr></thead>\n<tbody>\n");

    match &layout.body {
        TableBody::Message(message) => {
            let _ = writeln!(
                html,
                "<tr><td colspan=\"{}\" class=\"no-results\">{}</td></tr>",
                layout.columns.len() + 1,
                escape_html(message),
            );
        }
        TableBody::Rows(rows) => {
            for row in rows {
                let _ = write!(
                    html,
                    "<tr data-email=\"{}\"><td><div class=\"student-name\">{}</div><div class=\"student-email\">{}</div></td>",
                    escape_html(&row.email),
                    escape_html(&row.name),
                    escape_html(&row.email),
                );
                for cell in &row.cells {
                    match &cell.grade {
                        Some(grade) => {
                            let _ = write!(
                                html,
                                "<td class=\"grade-cell\"{}><div class=\"grade-score {}\">{}</div><div class=\"grade-percentage\">{}%</div></td>",
                                hidden_attr(cell.hidden),
                                grade.class.css_class(),
                                grade.score_label(),
                                grade.percentage,
                            );
                        }
                        None => {
                            let _ = write!(
                                html,
                                "<td class=\"grade-cell\"{}><div class=\"no-grade\">{NO_GRADE}</div></td>",
                                hidden_attr(cell.hidden),
                            );
                        }
                    }
                }
                html.push_str("</tr>\n");
            }
        }
    }
    html.push_str("</tbody>\n</table>\n");
    html
}

pub fn table_document(layout: &TableLayout) -> String {
    let body = format!(
        "<h1>Grades</h1>\n<p>{} of {} students, {} of {} assignments</p>\n{}",
        layout.visible_students,
        layout.total_students,
        layout.visible_columns,
        layout.columns.len(),
        table_fragment(layout),
    );
    document("Grades", &body)
}

fn report_fragment(view: &ReportView) -> String {
    let mut html = format!(
        r#"<div class="student-header">
  <div class="student-name">{name}</div>
  <div class="student-email">{email}</div>
  <div class="overall-stats">
    <div class="stat-box"><span class="stat-value">{count}</span><div class="stat-label">Total Assignments</div></div>
    <div class="stat-box"><span class="stat-value">{earned}</span><div class="stat-label">Points Earned</div></div>
    <div class="stat-box"><span class="stat-value">{possible}</span><div class="stat-label">Points Possible</div></div>
  </div>
  <div class="overall-grade {class}">Overall Grade: {overall} ({letter})</div>
</div>
"#,
        name = escape_html(&view.name),
        email = escape_html(&view.email),
        count = view.total_assignments,
        earned = escape_html(&view.total_points),
        possible = escape_html(&view.max_possible),
        class = view.overall_class.css_class(),
        overall = escape_html(&view.overall_label),
        letter = view.letter,
    );

    if view.rows.is_empty() {
        let _ = writeln!(html, "<p class=\"no-data\">{NO_ASSIGNMENTS}</p>");
        return html;
    }

    html.push_str(
        "<table class=\"grades-table\">\n<thead><tr><th>Assignment</th><th>Score</th><th>Percentage</th></tr></thead>\n<tbody>\n",
    );
    for row in &view.rows {
        let _ = writeln!(
            html,
            "<tr><td><div class=\"assignment-name\">{}</div><div class=\"assignment-date\">{}</div></td><td class=\"score-cell\">{}</td><td class=\"percentage-cell\"><span class=\"percentage-badge {}\">{}</span></td></tr>",
            escape_html(&row.assignment),
            escape_html(&row.date_label),
            escape_html(&row.score_label),
            row.class.css_class(),
            escape_html(&row.percentage_label),
        );
    }
    html.push_str("</tbody>\n</table>\n");
    html
}

pub fn portal_fragment(panel: &PortalPanel) -> String {
    match panel {
        PortalPanel::Hidden => String::new(),
        PortalPanel::Loading => format!("<div class=\"loading\">{SEARCHING}</div>\n"),
        PortalPanel::Invalid(message) | PortalPanel::Error { message } => format!(
            "<div class=\"error\"><strong>Error:</strong> {}</div>\n",
            escape_html(message)
        ),
        PortalPanel::NotFound { email } => format!(
            r#"<div class="not-found">
  <h3>Student Not Found</h3>
  <p>No student found with email: <strong>{}</strong></p>
  <p>Please check your email address and try again.</p>
</div>
"#,
            escape_html(email)
        ),
        PortalPanel::Found(view) => report_fragment(view),
    }
}

pub fn portal_document(panel: &PortalPanel) -> String {
    let title = match panel {
        PortalPanel::Found(view) => format!("Grades for {}", view.name),
        _ => "Student Grades".to_string(),
    };
    document(&title, &portal_fragment(panel))
}

pub fn write_html(html: &str, path: &Path) -> Result<(), AppError> {
    fs::write(path, html)?;
    tracing::info!(path = %path.display(), "html report written");
    Ok(())
}

fn file_url(path: &Path) -> Result<String, AppError> {
    let abs = fs::canonicalize(path)?;
    let abs = abs
        .to_str()
        .ok_or_else(|| AppError::Export("path is not valid UTF-8".to_string()))?;

    #[cfg(target_os = "windows")]
    {
        let abs = abs.strip_prefix(r"\\?\").unwrap_or(abs).replace('\\', "/");
        Ok(format!("file:///{abs}"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        Ok(format!("file://{abs}"))
    }
}

/// Prints an HTML file to PDF with headless Chrome.
pub fn write_pdf(html_path: &Path, pdf_path: &Path) -> Result<(), AppError> {
    let export = |e: &dyn std::fmt::Display| AppError::Export(e.to_string());

    let options = LaunchOptionsBuilder::default()
        .headless(true)
        .build()
        .map_err(|e| export(&e))?;
    let browser = Browser::new(options).map_err(|e| export(&e))?;
    let tab = browser.new_tab().map_err(|e| export(&e))?;

    let url = file_url(html_path)?;
    tracing::debug!(%url, "rendering pdf");
    tab.navigate_to(&url).map_err(|e| export(&e))?;
    tab.wait_until_navigated().map_err(|e| export(&e))?;
    let pdf = tab.print_to_pdf(None).map_err(|e| export(&e))?;

    fs::write(pdf_path, pdf)?;
    tracing::info!(path = %pdf_path.display(), "pdf report written");
    Ok(())
}

/// Visible rows and visible columns of the table as a spreadsheet.
pub fn write_table_xlsx(layout: &TableLayout, path: &Path) -> Result<(), AppError> {
    let mut book = new_file();
    let sheet = book
        .get_sheet_by_name_mut("Sheet1")
        .ok_or_else(|| AppError::Export("workbook has no default sheet".to_string()))?;

    let visible: Vec<usize> = layout
        .columns
        .iter()
        .enumerate()
        .filter(|(_, c)| !c.hidden)
        .map(|(i, _)| i)
        .collect();

    sheet.get_cell_mut((1, 1)).set_value("Student");
    sheet.get_cell_mut((2, 1)).set_value("Email");
    for (col, &i) in visible.iter().enumerate() {
        let column = &layout.columns[i];
        sheet
            .get_cell_mut((col as u32 + 3, 1))
            .set_value(format!("{} ({})", column.name, column.info()));
    }

    for (r, row) in layout.rows().iter().enumerate() {
        let line = r as u32 + 2;
        sheet.get_cell_mut((1, line)).set_value(row.name.clone());
        sheet.get_cell_mut((2, line)).set_value(row.email.clone());
        for (col, &i) in visible.iter().enumerate() {
            let cell = sheet.get_cell_mut((col as u32 + 3, line));
            match &row.cells[i].grade {
                Some(grade) => cell.set_value_number(grade.score),
                None => cell.set_value(NO_GRADE),
            };
        }
    }

    writer::xlsx::write(&book, path).map_err(|e| AppError::Export(e.to_string()))?;
    tracing::info!(path = %path.display(), rows = layout.rows().len(), "xlsx report written");
    Ok(())
}
