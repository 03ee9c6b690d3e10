use std::path::PathBuf;

use crate::error::AppError;
use crate::model::{HealthStatus, Student, StudentReport};

#[derive(Debug, Clone)]
pub enum Message {
    GoToGradesTable,
    GoToStudentPortal,
    GoToSettings,
    // Tenant
    TenantInputChanged(String),
    TenantSubmitted,
    ChangeTenant,
    // Grades table
    ReloadGrades,
    RefreshTick,
    GradesLoaded(Result<Vec<Student>, AppError>),
    StudentFilterChanged(String),
    TagFilterChanged(String),
    StudentRowPressed(usize),
    DismissAlert,
    ExportTableXlsx,
    ExportTableHtml,
    // Student portal
    EmailInputChanged(String),
    SearchPressed,
    ClearPressed,
    StudentLoaded(u64, Result<StudentReport, AppError>),
    ExportReportHtml,
    ExportReportPdf,
    ExportFinished(Result<Option<PathBuf>, AppError>),
    // Settings
    ThemeSelected(&'static str),
    ApiUrlChanged(String),
    RefreshIntervalChanged(String),
    SaveSettings,
    TestConnection,
    ConnectionTested(Result<HealthStatus, AppError>),
}
