use std::path::PathBuf;

use iced::{Task, Theme};

use crate::api::{ApiClient, Session};
use crate::config::{Config, CONFIG_FILE};
use crate::error::AppError;
use crate::grades_table::GradesTable;
use crate::student_portal::StudentPortal;

use super::Message;

pub const EMAIL_INPUT_ID: &str = "student-email";

/// Which page the process was started for. Chosen once from the command
/// line; the tenant screen may come first but hands over to this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    GradesTable,
    StudentPortal { email: Option<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    TenantSelect,
    GradesTable,
    StudentPortal,
    Settings,
}

pub struct App {
    pub config: Config,
    /// Where settings and tenant changes are written back.
    pub config_path: PathBuf,
    pub theme: Theme,
    pub route: Route,
    pub current_screen: Screen,
    pub client: Option<ApiClient>,
    //
    pub grades_table: GradesTable,
    pub student_portal: StudentPortal,
    //
    pub tenant_input: String,
    pub tenant_error: Option<String>,
    // blocking dialog over the current screen
    pub alert: Option<String>,
    pub status_message: String,
    //
    pub settings_api_url: String,
    pub settings_refresh_secs: String,
    pub settings_status: Option<String>,
}

impl App {
    pub fn new(config: Config, route: Route) -> (Self, Task<Message>) {
        let mut app = Self {
            theme: config.theme(),
            tenant_input: config.tenant().unwrap_or_default().to_string(),
            settings_api_url: config.api_base_url.clone(),
            settings_refresh_secs: config.refresh_interval_secs.to_string(),
            config,
            config_path: PathBuf::from(CONFIG_FILE),
            route,
            current_screen: Screen::TenantSelect,
            client: None,
            grades_table: GradesTable::new(),
            student_portal: StudentPortal::new(),
            tenant_error: None,
            alert: None,
            status_message: String::new(),
            settings_status: None,
        };
        app.rebuild_client();

        let task = if app.session().needs_tenant() {
            tracing::info!("no tenant stored, asking for one");
            Task::none()
        } else {
            app.enter_route()
        };
        (app, task)
    }

    pub fn theme(&self) -> Theme {
        self.theme.clone()
    }

    pub fn session(&self) -> Session {
        Session::from_config(&self.config)
    }

    /// Rebuilds the HTTP client after the config changed.
    pub fn rebuild_client(&mut self) {
        self.client = match ApiClient::new(self.session()) {
            Ok(client) => Some(client),
            Err(err) => {
                tracing::error!(%err, "failed to build HTTP client");
                None
            }
        };
    }

    pub fn client(&self) -> Result<ApiClient, AppError> {
        self.client
            .clone()
            .ok_or_else(|| AppError::Transport("HTTP client unavailable".to_string()))
    }
}
