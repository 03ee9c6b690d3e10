use std::fs;
use std::path::Path;

use iced::Theme;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CONFIG_FILE: &str = "config.json";
pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_REFRESH_SECS: u64 = 300;
pub const MIN_REFRESH_SECS: u64 = 10;

const ENV_API_URL: &str = "GRADE_INSIGHT_API_URL";
const ENV_TENANT: &str = "GRADE_INSIGHT_TENANT";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to write {CONFIG_FILE}: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Which lookup URL the server exposes for a single student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudentEndpoint {
    /// `/api/student/{email}`
    #[default]
    Plain,
    /// `/api/student/{email}/grades`
    Grades,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme_name")]
    pub theme_name: String,
    #[serde(default = "default_api_url")]
    pub api_base_url: String,
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub require_tenant: bool,
    #[serde(default = "default_refresh_secs")]
    pub refresh_interval_secs: u64,
    #[serde(default)]
    pub student_endpoint: StudentEndpoint,
}

fn default_theme_name() -> String {
    "Light".to_string()
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_refresh_secs() -> u64 {
    DEFAULT_REFRESH_SECS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme_name: default_theme_name(),
            api_base_url: default_api_url(),
            tenant_id: None,
            require_tenant: false,
            refresh_interval_secs: DEFAULT_REFRESH_SECS,
            student_endpoint: StudentEndpoint::default(),
        }
    }
}

impl Config {
    pub fn theme(&self) -> Theme {
        theme_from_str(&self.theme_name).unwrap_or(Theme::Light)
    }

    pub fn refresh_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.refresh_interval_secs.max(MIN_REFRESH_SECS))
    }

    /// Stored tenant, ignoring blank values.
    pub fn tenant(&self) -> Option<&str> {
        self.tenant_id
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    fn apply_env(mut self) -> Self {
        if let Ok(url) = std::env::var(ENV_API_URL) {
            if !url.trim().is_empty() {
                self.api_base_url = url.trim().to_string();
            }
        }
        if let Ok(tenant) = std::env::var(ENV_TENANT) {
            if !tenant.trim().is_empty() {
                self.tenant_id = Some(tenant.trim().to_string());
            }
        }
        self
    }
}

/// Reads `config.json` from the working directory; a missing or broken file
/// gives the defaults. Environment overrides are applied on top.
pub fn load_config() -> Config {
    load_config_from(Path::new(CONFIG_FILE)).apply_env()
}

pub fn load_config_from(path: &Path) -> Config {
    let Ok(contents) = fs::read_to_string(path) else {
        return Config::default();
    };
    match serde_json::from_str(&contents) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "ignoring unreadable config");
            Config::default()
        }
    }
}

pub fn save_config_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)?;
    Ok(())
}

pub fn theme_from_str(name: &str) -> Option<Theme> {
    Theme::ALL
        .iter()
        .find(|t| theme_to_str(t).eq_ignore_ascii_case(name))
        .cloned()
}

pub fn theme_to_str(theme: &Theme) -> &'static str {
    match theme {
        Theme::Light => "Light",
        Theme::Dark => "Dark",
        Theme::Dracula => "Dracula",
        Theme::Nord => "Nord",
        Theme::SolarizedLight => "SolarizedLight",
        Theme::SolarizedDark => "SolarizedDark",
        Theme::GruvboxLight => "GruvboxLight",
        Theme::GruvboxDark => "GruvboxDark",
        Theme::CatppuccinLatte => "CatppuccinLatte",
        Theme::CatppuccinFrappe => "CatppuccinFrappe",
        Theme::CatppuccinMacchiato => "CatppuccinMacchiato",
        Theme::CatppuccinMocha => "CatppuccinMocha",
        Theme::TokyoNight => "TokyoNight",
        Theme::TokyoNightStorm => "TokyoNightStorm",
        Theme::TokyoNightLight => "TokyoNightLight",
        Theme::KanagawaWave => "KanagawaWave",
        Theme::KanagawaDragon => "KanagawaDragon",
        Theme::KanagawaLotus => "KanagawaLotus",
        Theme::Moonfly => "Moonfly",
        Theme::Nightfly => "Nightfly",
        Theme::Oxocarbon => "Oxocarbon",
        Theme::Ferra => "Ferra",
        _ => "Unknown",
    }
}
