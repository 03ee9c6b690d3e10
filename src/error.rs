//! Error taxonomy for API calls, validation and exports.
//!
//! Values travel inside UI messages, so the enum is `Clone` and carries
//! rendered strings instead of source errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    /// Input rejected locally; no request was made.
    #[error("{0}")]
    Validation(String),

    /// The student lookup returned 404.
    #[error("no student found with email {email}")]
    NotFound { email: String },

    /// Network failure or a body that could not be decoded.
    #[error("transport error: {0}")]
    Transport(String),

    /// Non-success status other than 404.
    #[error("HTTP error! status: {status}")]
    Status { status: u16 },

    /// Tenant identifier missing or rejected by the server.
    #[error("tenant error: {0}")]
    Tenant(String),

    /// A table row without an email cannot be opened.
    #[error("no email on record for {student}")]
    MissingEmail { student: String },

    #[error("export failed: {0}")]
    Export(String),
}

impl AppError {
    /// Failures shown with the generic "try again" message.
    pub fn is_transport(&self) -> bool {
        matches!(self, AppError::Transport(_) | AppError::Status { .. })
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Transport(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Export(err.to_string())
    }
}
