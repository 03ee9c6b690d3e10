//! Single-student lookup by email.
//!
//! `Idle -> Searching -> Found | NotFound | Error`, and back to `Idle` on
//! clear. Invalid input never leaves `Idle` and never reaches the network.

use crate::error::AppError;
use crate::format::{self, GradeClass};
use crate::model::{Grade, StudentReport};

pub const EMPTY_EMAIL: &str = "Please enter your email address.";
pub const INVALID_EMAIL: &str = "Please enter a valid email address.";
pub const FETCH_FAILED: &str = "Unable to fetch grades. Please try again later.";
pub const SEARCHING: &str = "Loading your grades...";
pub const NO_ASSIGNMENTS: &str = "No assignments found.";

#[derive(Debug, Clone, PartialEq, Default)]
pub enum PortalState {
    #[default]
    Idle,
    Searching {
        email: String,
    },
    Found(StudentReport),
    NotFound {
        email: String,
    },
    Error {
        message: String,
    },
}

/// A lookup the caller must send. `seq` comes back with the response so a
/// superseded one can be recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub seq: u64,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub assignment: String,
    pub date_label: String,
    pub score_label: String,
    pub percentage_label: String,
    pub class: GradeClass,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportView {
    pub name: String,
    pub email: String,
    pub total_assignments: u32,
    pub total_points: String,
    pub max_possible: String,
    pub overall_label: String,
    pub overall_class: GradeClass,
    pub letter: char,
    pub rows: Vec<ReportRow>,
}

impl ReportView {
    pub fn from_report(report: &StudentReport) -> Self {
        let overall = report.overall_percentage;
        Self {
            name: format!("{} {}", report.first_name, report.last_name),
            email: report.email.clone(),
            total_assignments: report.total_assignments,
            total_points: format::format_points(report.total_points),
            max_possible: format::format_points(report.max_possible),
            overall_label: format::percent_label(overall),
            overall_class: format::grade_class(overall),
            letter: format::grade_letter(overall),
            rows: report.grades.iter().map(report_row).collect(),
        }
    }
}

fn report_row(grade: &Grade) -> ReportRow {
    let pct = format::percentage(grade.score, grade.max_points);
    ReportRow {
        assignment: grade.assignment.clone(),
        date_label: format::format_date(grade.date.as_deref()),
        score_label: format!(
            "{} / {}",
            format::format_points(grade.score),
            format::format_points(grade.max_points)
        ),
        percentage_label: format::percent_label(pct as f64),
        class: format::grade_class(pct as f64),
    }
}

/// What the results area shows.
#[derive(Debug, Clone, PartialEq)]
pub enum PortalPanel {
    Hidden,
    Invalid(String),
    Loading,
    Found(ReportView),
    NotFound { email: String },
    Error { message: String },
}

#[derive(Debug, Clone, Default)]
pub struct StudentPortal {
    input: String,
    state: PortalState,
    notice: Option<String>,
    last_seq: u64,
}

impl StudentPortal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, value: String) {
        self.input = value;
    }

    pub fn state(&self) -> &PortalState {
        &self.state
    }

    pub fn is_searching(&self) -> bool {
        matches!(self.state, PortalState::Searching { .. })
    }

    /// Validates the input and, when it passes, moves to `Searching` and
    /// hands back the request to send.
    pub fn search(&mut self) -> Result<SearchRequest, AppError> {
        let email = self.input.trim().to_string();
        let rejected = if email.is_empty() {
            Some(EMPTY_EMAIL)
        } else if !format::is_valid_email(&email) {
            Some(INVALID_EMAIL)
        } else {
            None
        };
        if let Some(message) = rejected {
            self.state = PortalState::Idle;
            self.notice = Some(message.to_string());
            return Err(AppError::Validation(message.to_string()));
        }

        self.last_seq += 1;
        self.notice = None;
        self.state = PortalState::Searching {
            email: email.clone(),
        };
        tracing::info!(%email, seq = self.last_seq, "student lookup");
        Ok(SearchRequest {
            seq: self.last_seq,
            email,
        })
    }

    /// Pre-fills the input and starts a search, as a deep link does.
    pub fn open(&mut self, email: &str) -> Result<SearchRequest, AppError> {
        self.input = email.to_string();
        self.search()
    }

    /// Applies a lookup result. Returns `false` when the response belongs to
    /// an older request and was dropped.
    pub fn finish_search(&mut self, seq: u64, result: Result<StudentReport, AppError>) -> bool {
        if seq != self.last_seq || !self.is_searching() {
            tracing::warn!(seq, latest = self.last_seq, "dropping stale student response");
            return false;
        }
        self.state = match result {
            Ok(report) => PortalState::Found(report),
            Err(AppError::NotFound { email }) => PortalState::NotFound { email },
            Err(err) => {
                tracing::error!(%err, "error fetching student grades");
                PortalState::Error {
                    message: FETCH_FAILED.to_string(),
                }
            }
        };
        true
    }

    pub fn clear(&mut self) {
        self.state = PortalState::Idle;
        self.notice = None;
        self.input.clear();
    }

    pub fn render(&self) -> PortalPanel {
        if let Some(message) = &self.notice {
            return PortalPanel::Invalid(message.clone());
        }
        match &self.state {
            PortalState::Idle => PortalPanel::Hidden,
            PortalState::Searching { .. } => PortalPanel::Loading,
            PortalState::Found(report) => PortalPanel::Found(ReportView::from_report(report)),
            PortalState::NotFound { email } => PortalPanel::NotFound {
                email: email.clone(),
            },
            PortalState::Error { message } => PortalPanel::Error {
                message: message.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn report() -> StudentReport {
        StudentReport {
            first_name: "Alice".into(),
            last_name: "Lee".into(),
            email: "alice@school.edu".into(),
            overall_percentage: 87.46,
            total_assignments: 2,
            total_points: 87.5,
            max_possible: 100.0,
            grades: vec![
                Grade {
                    assignment: "HW1".into(),
                    date: Some("2024-09-01".into()),
                    score: 45.0,
                    max_points: 50.0,
                    tags: None,
                },
                Grade {
                    assignment: "Quiz".into(),
                    date: None,
                    score: 42.5,
                    max_points: 50.0,
                    tags: None,
                },
            ],
        }
    }

    #[test]
    fn empty_input_fails_locally() {
        let mut portal = StudentPortal::new();
        portal.set_input("   ".into());
        assert_eq!(
            portal.search(),
            Err(AppError::Validation(EMPTY_EMAIL.into()))
        );
        assert_eq!(portal.state(), &PortalState::Idle);
        assert_eq!(portal.render(), PortalPanel::Invalid(EMPTY_EMAIL.into()));
    }

    #[test]
    fn invalid_input_fails_locally() {
        let mut portal = StudentPortal::new();
        portal.set_input("alice@school".into());
        assert!(portal.search().is_err());
        assert!(!portal.is_searching());
        assert_eq!(portal.render(), PortalPanel::Invalid(INVALID_EMAIL.into()));
    }

    #[test]
    fn valid_input_is_trimmed_and_searches() {
        let mut portal = StudentPortal::new();
        portal.set_input("  alice@school.edu ".into());
        let request = portal.search().unwrap();
        assert_eq!(request.email, "alice@school.edu");
        assert!(portal.is_searching());
        assert_eq!(portal.render(), PortalPanel::Loading);
    }

    #[test]
    fn not_found_echoes_email() {
        let mut portal = StudentPortal::new();
        let request = portal.open("ghost@school.edu").unwrap();
        assert!(portal.finish_search(
            request.seq,
            Err(AppError::NotFound {
                email: request.email.clone()
            })
        ));
        assert_eq!(
            portal.render(),
            PortalPanel::NotFound {
                email: "ghost@school.edu".into()
            }
        );
    }

    #[test]
    fn server_error_is_generic() {
        let mut portal = StudentPortal::new();
        let request = portal.open("alice@school.edu").unwrap();
        portal.finish_search(request.seq, Err(AppError::Status { status: 500 }));
        assert_eq!(
            portal.render(),
            PortalPanel::Error {
                message: FETCH_FAILED.into()
            }
        );
    }

    #[test]
    fn found_report_view() {
        let mut portal = StudentPortal::new();
        let request = portal.open("alice@school.edu").unwrap();
        portal.finish_search(request.seq, Ok(report()));

        let PortalPanel::Found(view) = portal.render() else {
            panic!("expected a found panel");
        };
        assert_eq!(view.name, "Alice Lee");
        assert_eq!(view.overall_label, "87.5%");
        assert_eq!(view.overall_class, GradeClass::Good);
        assert_eq!(view.letter, 'B');
        assert_eq!(view.total_points, "87.5");
        assert_eq!(view.max_possible, "100");
        assert_eq!(
            view.rows[0],
            ReportRow {
                assignment: "HW1".into(),
                date_label: "Sep 1, 2024".into(),
                score_label: "45 / 50".into(),
                percentage_label: "90.0%".into(),
                class: GradeClass::Good,
            }
        );
        assert_eq!(view.rows[1].date_label, "No date");
        assert_eq!(view.rows[1].percentage_label, "85.0%");
    }

    #[test]
    fn stale_response_is_dropped() {
        let mut portal = StudentPortal::new();
        let first = portal.open("alice@school.edu").unwrap();
        let second = portal.open("bob@school.edu").unwrap();

        assert!(!portal.finish_search(first.seq, Ok(report())));
        assert!(portal.is_searching());

        assert!(portal.finish_search(
            second.seq,
            Err(AppError::NotFound {
                email: "bob@school.edu".into()
            })
        ));
        assert!(matches!(portal.state(), PortalState::NotFound { .. }));
    }

    #[test]
    fn clear_is_reachable_from_every_terminal_state() {
        let outcomes = [
            Ok(report()),
            Err(AppError::NotFound {
                email: "alice@school.edu".into(),
            }),
            Err(AppError::Transport("connection refused".into())),
        ];
        for outcome in outcomes {
            let mut portal = StudentPortal::new();
            let request = portal.open("alice@school.edu").unwrap();
            portal.finish_search(request.seq, outcome);
            portal.clear();
            assert_eq!(portal.state(), &PortalState::Idle);
            assert_eq!(portal.input(), "");
            assert_eq!(portal.render(), PortalPanel::Hidden);
        }
    }

    #[test]
    fn overall_label_rounds_ties_up() {
        let mut tied = report();
        tied.overall_percentage = 87.25;
        let view = ReportView::from_report(&tied);
        assert_eq!(view.overall_label, "87.3%");
        assert_eq!(view.rows[0].percentage_label, "90.0%");
    }
}
