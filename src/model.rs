use serde::{Deserialize, Deserializer, Serialize};

/// Treats an explicit JSON `null` like an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grade {
    pub assignment: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub score: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub max_points: f64,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl Grade {
    pub fn tags(&self) -> &[String] {
        self.tags.as_deref().unwrap_or_default()
    }

    /// Exact `(name, date)` match used to place a grade under its column.
    pub fn belongs_to(&self, name: &str, date: Option<&str>) -> bool {
        self.assignment == name && self.date.as_deref() == date
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    #[serde(default, deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub grades: Vec<Grade>,
}

impl Student {
    /// `"Last, First"`, the label used in the table's first column.
    pub fn sort_name(&self) -> String {
        format!("{}, {}", self.last_name, self.first_name)
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn email(&self) -> Option<&str> {
        Some(self.email.trim()).filter(|e| !e.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradesTableResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub students: Vec<Student>,
}

/// One student's lookup result from `/api/student/{email}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentReport {
    #[serde(default, deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overall_percentage: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_assignments: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_points: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub max_possible: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub grades: Vec<Grade>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

/// Column of the grades table, derived from every grade sharing a
/// `(name, date)` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub name: String,
    pub date: Option<String>,
    pub max_points: f64,
    pub tags: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TABLE_FIXTURE: &str = r#"{
        "students": [
            {
                "first_name": "Alice",
                "last_name": "Lee",
                "email": "alice@school.edu",
                "grades": [
                    {"assignment": "HW1", "date": "2024-09-01", "score": 45, "max_points": 50, "tags": ["algebra"]},
                    {"assignment": "Quiz", "date": null, "score": 8.5, "max_points": 10}
                ]
            },
            {
                "first_name": "Bob",
                "last_name": "Lee",
                "email": "bob@school.edu"
            }
        ]
    }"#;

    #[test]
    fn parses_grades_table() {
        let data: GradesTableResponse = serde_json::from_str(TABLE_FIXTURE).unwrap();
        assert_eq!(data.students.len(), 2);

        let alice = &data.students[0];
        assert_eq!(alice.sort_name(), "Lee, Alice");
        assert_eq!(alice.grades[0].tags().to_vec(), vec!["algebra".to_string()]);
        assert_eq!(alice.grades[1].date, None);
        assert!(alice.grades[1].tags().is_empty());
        assert!(data.students[1].grades.is_empty());
    }

    #[test]
    fn blank_email_counts_as_missing() {
        let student = Student {
            first_name: "No".into(),
            last_name: "Mail".into(),
            email: "  ".into(),
            grades: vec![],
        };
        assert_eq!(student.email(), None);
    }

    #[test]
    fn report_defaults_missing_totals() {
        let report: StudentReport = serde_json::from_str(
            r#"{"first_name": "Alice", "last_name": "Lee", "email": "alice@school.edu"}"#,
        )
        .unwrap();
        assert_eq!(report.overall_percentage, 0.0);
        assert_eq!(report.total_assignments, 0);
        assert!(report.grades.is_empty());
    }

    #[test]
    fn null_email_keeps_the_roster() {
        let data: GradesTableResponse = serde_json::from_str(
            r#"{"students": [
                {"first_name": "Ann", "last_name": "Ng", "email": null, "grades": null},
                {"first_name": "Bo", "last_name": "Ng", "email": "bo@school.edu",
                 "grades": [{"assignment": "HW1", "score": null, "max_points": 10}]}
            ]}"#,
        )
        .unwrap();
        assert_eq!(data.students.len(), 2);
        assert_eq!(data.students[0].email(), None);
        assert!(data.students[0].grades.is_empty());
        assert_eq!(data.students[1].grades[0].score, 0.0);
    }

    #[test]
    fn null_totals_read_as_zero() {
        let report: StudentReport = serde_json::from_str(
            r#"{"first_name": "Alice", "last_name": "Lee", "email": "alice@school.edu",
                "overall_percentage": null, "total_assignments": null,
                "total_points": null, "max_possible": null, "grades": null}"#,
        )
        .unwrap();
        assert_eq!(report.overall_percentage, 0.0);
        assert_eq!(report.total_assignments, 0);
        assert_eq!(report.total_points, 0.0);
        assert_eq!(report.max_possible, 0.0);
        assert!(report.grades.is_empty());
    }
}
