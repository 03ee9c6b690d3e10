use std::path::{Path, PathBuf};

use iced::widget::text_input;
use iced::{Subscription, Task};
use tokio::task::spawn_blocking;

use crate::config::{self, theme_from_str};
use crate::error::AppError;
use crate::report;
use crate::student_portal::SearchRequest;

use super::state::EMAIL_INPUT_ID;
use super::{App, Message, Route, Screen};

impl App {
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::GoToGradesTable => {
                self.current_screen = Screen::GradesTable;
                self.load_grades()
            }
            Message::GoToStudentPortal => {
                self.current_screen = Screen::StudentPortal;
                text_input::focus(text_input::Id::new(EMAIL_INPUT_ID))
            }
            Message::GoToSettings => {
                self.current_screen = Screen::Settings;
                self.settings_status = None;
                Task::none()
            }
            Message::TenantInputChanged(v) => {
                self.tenant_input = v;
                Task::none()
            }
            Message::TenantSubmitted => {
                let tenant = self.tenant_input.trim().to_string();
                if tenant.is_empty() {
                    self.tenant_error = Some("Please enter a tenant identifier.".to_string());
                    return Task::none();
                }
                tracing::info!(%tenant, "tenant selected");
                self.config.tenant_id = Some(tenant);
                self.persist_config();
                self.rebuild_client();
                self.tenant_error = None;
                self.enter_route()
            }
            Message::ChangeTenant => {
                self.tenant_error = None;
                self.current_screen = Screen::TenantSelect;
                Task::none()
            }
            Message::ReloadGrades | Message::RefreshTick => self.load_grades(),
            Message::GradesLoaded(result) => {
                if let Err(AppError::Tenant(reason)) = &result {
                    let reason = reason.clone();
                    self.grades_table.finish_load(result);
                    return self.reject_tenant(reason);
                }
                self.grades_table.finish_load(result);
                Task::none()
            }
            Message::StudentFilterChanged(query) => {
                self.grades_table.filter_by_student(&query);
                Task::none()
            }
            Message::TagFilterChanged(query) => {
                self.grades_table.filter_by_tag(&query);
                Task::none()
            }
            Message::StudentRowPressed(index) => match self.grades_table.student_email(index) {
                Ok(email) => {
                    tracing::info!(%email, "opening student");
                    self.current_screen = Screen::StudentPortal;
                    match self.student_portal.open(&email) {
                        Ok(request) => self.send_search(request),
                        Err(_) => Task::none(),
                    }
                }
                Err(err) => {
                    tracing::warn!(%err, "row has no routing key");
                    self.alert = Some(format!(
                        "Cannot open this student: {err}. Ask an administrator to add an email address."
                    ));
                    Task::none()
                }
            },
            Message::DismissAlert => {
                self.alert = None;
                Task::none()
            }
            Message::ExportTableXlsx => {
                let layout = self.grades_table.render();
                Task::perform(
                    export_with_dialog("grades", "xlsx", move |path| {
                        report::write_table_xlsx(&layout, path)
                    }),
                    Message::ExportFinished,
                )
            }
            Message::ExportTableHtml => {
                let html = report::table_document(&self.grades_table.render());
                Task::perform(
                    export_with_dialog("grades", "html", move |path| report::write_html(&html, path)),
                    Message::ExportFinished,
                )
            }
            Message::EmailInputChanged(v) => {
                self.student_portal.set_input(v);
                Task::none()
            }
            Message::SearchPressed => match self.student_portal.search() {
                Ok(request) => self.send_search(request),
                Err(_) => Task::none(),
            },
            Message::ClearPressed => {
                self.student_portal.clear();
                text_input::focus(text_input::Id::new(EMAIL_INPUT_ID))
            }
            Message::StudentLoaded(seq, result) => {
                let tenant_reason = match &result {
                    Err(AppError::Tenant(reason)) => Some(reason.clone()),
                    _ => None,
                };
                let applied = self.student_portal.finish_search(seq, result);
                match tenant_reason {
                    Some(reason) if applied => self.reject_tenant(reason),
                    _ => Task::none(),
                }
            }
            Message::ExportReportHtml => {
                let html = report::portal_document(&self.student_portal.render());
                Task::perform(
                    export_with_dialog("student_report", "html", move |path| {
                        report::write_html(&html, path)
                    }),
                    Message::ExportFinished,
                )
            }
            Message::ExportReportPdf => {
                let html = report::portal_document(&self.student_portal.render());
                Task::perform(
                    export_with_dialog("student_report", "pdf", move |path| {
                        let html_path = report::reports_dir()?
                            .join(report::timestamped_name("student_report", "html"));
                        report::write_html(&html, &html_path)?;
                        report::write_pdf(&html_path, path)
                    }),
                    Message::ExportFinished,
                )
            }
            Message::ExportFinished(result) => {
                self.status_message = match result {
                    Ok(Some(path)) => format!("Saved {}", path.display()),
                    Ok(None) => "Export cancelled.".to_string(),
                    Err(err) => {
                        tracing::error!(%err, "export failed");
                        err.to_string()
                    }
                };
                Task::none()
            }
            Message::ThemeSelected(name) => {
                if let Some(theme) = theme_from_str(name) {
                    self.config.theme_name = name.to_string();
                    self.theme = theme;
                    self.persist_config();
                }
                Task::none()
            }
            Message::ApiUrlChanged(v) => {
                self.settings_api_url = v;
                Task::none()
            }
            Message::RefreshIntervalChanged(v) => {
                self.settings_refresh_secs = v;
                Task::none()
            }
            Message::SaveSettings => {
                let url = self.settings_api_url.trim();
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    self.settings_status =
                        Some("The API URL must start with http:// or https://".to_string());
                    return Task::none();
                }
                let Ok(secs) = self.settings_refresh_secs.trim().parse::<u64>() else {
                    self.settings_status =
                        Some("The refresh interval must be a whole number of seconds.".to_string());
                    return Task::none();
                };
                if secs < config::MIN_REFRESH_SECS {
                    self.settings_status = Some(format!(
                        "The refresh interval must be at least {} seconds.",
                        config::MIN_REFRESH_SECS
                    ));
                    return Task::none();
                }
                self.config.api_base_url = url.to_string();
                self.config.refresh_interval_secs = secs;
                self.rebuild_client();
                self.settings_status = Some(match config::save_config_to(&self.config, &self.config_path) {
                    Ok(()) => "Settings saved.".to_string(),
                    Err(err) => err.to_string(),
                });
                Task::none()
            }
            Message::TestConnection => {
                self.settings_status = Some("Checking...".to_string());
                match self.client() {
                    Ok(client) => Task::perform(
                        async move { client.health().await },
                        Message::ConnectionTested,
                    ),
                    Err(err) => Task::done(Message::ConnectionTested(Err(err))),
                }
            }
            Message::ConnectionTested(result) => {
                self.settings_status = Some(match result {
                    Ok(health) => format!("Server status: {}", health.status),
                    Err(err) => {
                        tracing::error!(%err, "health check failed");
                        format!("Connection failed: {err}")
                    }
                });
                Task::none()
            }
        }
    }

    pub fn subscription(&self) -> Subscription<Message> {
        // Only the table refreshes; leaving it drops the timer.
        if self.current_screen == Screen::GradesTable {
            iced::time::every(self.config.refresh_interval()).map(|_| Message::RefreshTick)
        } else {
            Subscription::none()
        }
    }

    /// Shows the page chosen at startup and kicks off its first request.
    pub fn enter_route(&mut self) -> Task<Message> {
        match self.route.clone() {
            Route::GradesTable => {
                self.current_screen = Screen::GradesTable;
                self.load_grades()
            }
            Route::StudentPortal { email } => {
                self.current_screen = Screen::StudentPortal;
                let focus = text_input::focus(text_input::Id::new(EMAIL_INPUT_ID));
                match email {
                    Some(email) => match self.student_portal.open(&email) {
                        Ok(request) => Task::batch([focus, self.send_search(request)]),
                        Err(_) => focus,
                    },
                    None => focus,
                }
            }
        }
    }

    fn load_grades(&mut self) -> Task<Message> {
        if self.session().needs_tenant() {
            self.current_screen = Screen::TenantSelect;
            return Task::none();
        }
        self.grades_table.begin_load();
        match self.client() {
            Ok(client) => Task::perform(
                async move { client.fetch_grades_table().await },
                Message::GradesLoaded,
            ),
            Err(err) => Task::done(Message::GradesLoaded(Err(err))),
        }
    }

    fn send_search(&self, request: SearchRequest) -> Task<Message> {
        let SearchRequest { seq, email } = request;
        match self.client() {
            Ok(client) => Task::perform(
                async move { client.fetch_student(&email).await },
                move |result| Message::StudentLoaded(seq, result),
            ),
            Err(err) => Task::done(Message::StudentLoaded(seq, Err(err))),
        }
    }

    /// The server refused the stored tenant: forget it and ask again.
    fn reject_tenant(&mut self, reason: String) -> Task<Message> {
        tracing::warn!(%reason, "tenant rejected, clearing stored identifier");
        self.config.tenant_id = None;
        self.persist_config();
        self.rebuild_client();
        self.tenant_input.clear();
        self.tenant_error = Some(format!("Please select your school again ({reason})."));
        self.current_screen = Screen::TenantSelect;
        Task::none()
    }

    fn persist_config(&self) {
        if let Err(err) = config::save_config_to(&self.config, &self.config_path) {
            tracing::warn!(%err, "failed to save config");
        }
    }
}

/// Asks for a target path, writes the export there and opens it. `Ok(None)`
/// means the dialog was cancelled.
async fn export_with_dialog<F>(
    stem: &'static str,
    extension: &'static str,
    write: F,
) -> Result<Option<PathBuf>, AppError>
where
    F: FnOnce(&Path) -> Result<(), AppError> + Send + 'static,
{
    spawn_blocking(move || {
        let dir = report::reports_dir()?;
        let Some(path) = rfd::FileDialog::new()
            .set_directory(&dir)
            .set_file_name(report::timestamped_name(stem, extension))
            .add_filter(extension.to_uppercase(), &[extension])
            .save_file()
        else {
            return Ok(None);
        };

        write(&path)?;
        if let Err(err) = open::that(&path) {
            tracing::warn!(%err, path = %path.display(), "could not open export");
        }
        Ok(Some(path))
    })
    .await
    .unwrap_or_else(|join_err| Err(AppError::Export(format!("export task failed: {join_err}"))))
}
