//! HTTP client for the Grade Insight REST API.
//!
//! Centralizes status handling so the views only ever see [`AppError`]:
//! 401/403 in tenant mode become [`AppError::Tenant`], any other
//! non-success becomes [`AppError::Status`], and the student lookup turns a
//! 404 into [`AppError::NotFound`].

use std::time::Duration;

use reqwest::StatusCode;

use crate::config::{Config, StudentEndpoint};
use crate::error::AppError;
use crate::model::{GradesTableResponse, HealthStatus, Student, StudentReport};

pub const TENANT_HEADER: &str = "X-Tenant-ID";

/// Everything a view needs to talk to the server. Built from the config once
/// and handed to each view; nothing here is global.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub base_url: String,
    pub tenant_id: Option<String>,
    pub require_tenant: bool,
    pub student_endpoint: StudentEndpoint,
}

impl Session {
    pub fn from_config(config: &Config) -> Self {
        Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            tenant_id: config.tenant().map(str::to_string),
            require_tenant: config.require_tenant,
            student_endpoint: config.student_endpoint,
        }
    }

    /// A tenant is required but none is stored: the user must pick one
    /// before any request goes out.
    pub fn needs_tenant(&self) -> bool {
        self.require_tenant && self.tenant_id.is_none()
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn student_path(&self, email: &str) -> String {
        let encoded = urlencoding::encode(email);
        match self.student_endpoint {
            StudentEndpoint::Plain => format!("/api/student/{encoded}"),
            StudentEndpoint::Grades => format!("/api/student/{encoded}/grades"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    session: Session,
}

impl ApiClient {
    pub fn new(session: Session) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("grade-insight/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { http, session })
    }

    async fn get(&self, path: &str) -> Result<reqwest::Response, AppError> {
        if self.session.needs_tenant() {
            return Err(AppError::Tenant("no tenant selected".to_string()));
        }
        let url = self.session.url(path);
        tracing::debug!(%url, "GET");
        let mut request = self.http.get(&url);
        if let Some(tenant) = &self.session.tenant_id {
            request = request.header(TENANT_HEADER, tenant);
        }
        let resp = request.send().await?;
        check_response(resp, self.session.require_tenant)
    }

    pub async fn fetch_grades_table(&self) -> Result<Vec<Student>, AppError> {
        let resp = self.get("/api/grades-table").await?;
        let data: GradesTableResponse = resp.json().await?;
        tracing::info!(students = data.students.len(), "grades table loaded");
        Ok(data.students)
    }

    pub async fn fetch_student(&self, email: &str) -> Result<StudentReport, AppError> {
        let path = self.session.student_path(email);
        let resp = self
            .get(&path)
            .await
            .map_err(|err| not_found_for(err, email))?;
        Ok(resp.json().await?)
    }

    pub async fn health(&self) -> Result<HealthStatus, AppError> {
        let resp = self.get("/health").await?;
        Ok(resp.json().await?)
    }
}

/// Returns the response unchanged on success.
pub fn check_response(
    resp: reqwest::Response,
    tenant_scoped: bool,
) -> Result<reqwest::Response, AppError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    if tenant_scoped && matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
        return Err(AppError::Tenant(format!(
            "server rejected the tenant ({})",
            status.as_u16()
        )));
    }
    Err(AppError::Status {
        status: status.as_u16(),
    })
}

fn not_found_for(err: AppError, email: &str) -> AppError {
    match err {
        AppError::Status { status: 404 } => AppError::NotFound {
            email: email.to_string(),
        },
        other => other,
    }
}
