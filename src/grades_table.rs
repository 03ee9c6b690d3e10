//! Student × assignment grade matrix with independent row and column
//! filters.
//!
//! The student filter only ever touches rows and the tag filter only ever
//! touches columns. Hidden columns stay in the layout with a `hidden` flag
//! so that cell `i` of every row always lines up with header `i`.

use std::cmp::Ordering;

use crate::error::AppError;
use crate::format::{self, GradeClass};
use crate::model::{Assignment, Student};

pub const LOADING: &str = "Loading grades...";
pub const LOAD_FAILED: &str = "Failed to load grades. Please refresh the page.";
pub const NO_STUDENTS: &str = "No students found.";
pub const NO_MATCHES: &str = "No students match the current filter.";
pub const NO_GRADE: &str = "—";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Loading,
    Loaded,
    LoadError,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    pub student_query: String,
    pub tag_query: String,
    /// Indices into the student list that pass the student filter.
    pub visible_rows: Vec<usize>,
    /// Indices into the assignment list that pass the tag filter.
    pub visible_columns: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnHeader {
    pub name: String,
    pub date_label: String,
    pub max_points: f64,
    pub tags: Vec<String>,
    pub hidden: bool,
}

impl ColumnHeader {
    /// `"Sep 5, 2024 | 50 pts"`
    pub fn info(&self) -> String {
        format!(
            "{} | {} pts",
            self.date_label,
            format::format_points(self.max_points)
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CellGrade {
    pub score: f64,
    pub max_points: f64,
    pub percentage: i64,
    pub class: GradeClass,
}

impl CellGrade {
    pub fn score_label(&self) -> String {
        format!(
            "{}/{}",
            format::format_points(self.score),
            format::format_points(self.max_points)
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GradeCell {
    pub hidden: bool,
    /// `None` renders as [`NO_GRADE`], never as zero.
    pub grade: Option<CellGrade>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub student_index: usize,
    pub name: String,
    pub email: String,
    pub cells: Vec<GradeCell>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableBody {
    Rows(Vec<TableRow>),
    Message(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableLayout {
    pub columns: Vec<ColumnHeader>,
    pub body: TableBody,
    pub visible_students: usize,
    pub total_students: usize,
    pub visible_columns: usize,
}

impl TableLayout {
    pub fn rows(&self) -> &[TableRow] {
        match &self.body {
            TableBody::Rows(rows) => rows,
            TableBody::Message(_) => &[],
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GradesTable {
    state: LoadState,
    students: Vec<Student>,
    assignments: Vec<Assignment>,
    filter: FilterState,
}

impl GradesTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// Marks a (re)load in flight. Data already on screen stays until the
    /// new dataset arrives.
    pub fn begin_load(&mut self) {
        self.state = LoadState::Loading;
    }

    /// Replaces the dataset and reapplies whatever filter text is current.
    pub fn finish_load(&mut self, result: Result<Vec<Student>, AppError>) {
        match result {
            Ok(students) => {
                self.assignments = derive_assignments(&students);
                self.students = students;
                self.state = LoadState::Loaded;
                self.apply_student_filter();
                self.apply_tag_filter();
            }
            Err(err) => {
                tracing::error!(%err, "error loading grades");
                self.state = LoadState::LoadError;
            }
        }
    }

    pub fn filter_by_student(&mut self, query: &str) {
        self.filter.student_query = query.to_string();
        self.apply_student_filter();
    }

    pub fn filter_by_tag(&mut self, query: &str) {
        self.filter.tag_query = query.to_string();
        self.apply_tag_filter();
    }

    fn apply_student_filter(&mut self) {
        let query = self.filter.student_query.trim().to_lowercase();
        self.filter.visible_rows = self
            .students
            .iter()
            .enumerate()
            .filter(|(_, s)| student_matches(s, &query))
            .map(|(i, _)| i)
            .collect();
        tracing::debug!(
            query = %query,
            visible = self.filter.visible_rows.len(),
            "student filter applied"
        );
    }

    fn apply_tag_filter(&mut self) {
        let query = self.filter.tag_query.trim().to_lowercase();
        self.filter.visible_columns = self
            .assignments
            .iter()
            .enumerate()
            .filter(|(_, a)| assignment_matches(a, &query))
            .map(|(i, _)| i)
            .collect();
        tracing::debug!(
            query = %query,
            visible = self.filter.visible_columns.len(),
            "tag filter applied"
        );
    }

    fn column_hidden(&self, index: usize) -> bool {
        !self.filter.visible_columns.contains(&index)
    }

    pub fn render(&self) -> TableLayout {
        let columns: Vec<ColumnHeader> = self
            .assignments
            .iter()
            .enumerate()
            .map(|(i, a)| ColumnHeader {
                name: a.name.clone(),
                date_label: format::format_date(a.date.as_deref()),
                max_points: a.max_points,
                tags: a.tags.clone(),
                hidden: self.column_hidden(i),
            })
            .collect();

        let body = match self.state {
            LoadState::LoadError => TableBody::Message(LOAD_FAILED),
            LoadState::Loading if self.students.is_empty() => TableBody::Message(LOADING),
            _ if self.students.is_empty() => TableBody::Message(NO_STUDENTS),
            _ if self.filter.visible_rows.is_empty() => TableBody::Message(NO_MATCHES),
            _ => TableBody::Rows(
                self.filter
                    .visible_rows
                    .iter()
                    .map(|&i| self.render_row(i))
                    .collect(),
            ),
        };

        TableLayout {
            columns,
            body,
            visible_students: self.filter.visible_rows.len(),
            total_students: self.students.len(),
            visible_columns: self.filter.visible_columns.len(),
        }
    }

    fn render_row(&self, student_index: usize) -> TableRow {
        let student = &self.students[student_index];
        let cells = self
            .assignments
            .iter()
            .enumerate()
            .map(|(i, a)| GradeCell {
                hidden: self.column_hidden(i),
                grade: student
                    .grades
                    .iter()
                    .find(|g| g.belongs_to(&a.name, a.date.as_deref()))
                    .map(|g| {
                        let pct = format::percentage(g.score, g.max_points);
                        CellGrade {
                            score: g.score,
                            max_points: g.max_points,
                            percentage: pct,
                            class: format::grade_class(pct as f64),
                        }
                    }),
            })
            .collect();

        TableRow {
            student_index,
            name: student.sort_name(),
            email: student.email.clone(),
            cells,
        }
    }

    /// Routing key for a clicked row.
    pub fn student_email(&self, student_index: usize) -> Result<String, AppError> {
        let student = self
            .students
            .get(student_index)
            .ok_or_else(|| AppError::Validation(format!("no student at row {student_index}")))?;
        student
            .email()
            .map(str::to_string)
            .ok_or_else(|| AppError::MissingEmail {
                student: student.full_name(),
            })
    }
}

/// `query` must already be trimmed and lowercased.
pub fn student_matches(student: &Student, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let first_last = student.full_name().to_lowercase();
    let last_first = student.sort_name().to_lowercase();
    first_last.contains(query)
        || last_first.contains(query)
        || student.email.to_lowercase().contains(query)
}

/// `query` must already be trimmed and lowercased.
pub fn assignment_matches(assignment: &Assignment, query: &str) -> bool {
    query.is_empty()
        || assignment.name.to_lowercase().contains(query)
        || assignment
            .tags
            .iter()
            .any(|t| t.to_lowercase().contains(query))
}

/// Distinct `(name, date)` columns in first-seen order, then sorted.
pub fn derive_assignments(students: &[Student]) -> Vec<Assignment> {
    let mut assignments: Vec<Assignment> = Vec::new();
    for grade in students.iter().flat_map(|s| &s.grades) {
        match assignments
            .iter_mut()
            .find(|a| a.name == grade.assignment && a.date == grade.date)
        {
            Some(existing) => {
                for tag in grade.tags() {
                    if !existing.tags.contains(tag) {
                        existing.tags.push(tag.clone());
                    }
                }
            }
            None => {
                let mut tags: Vec<String> = Vec::new();
                for tag in grade.tags() {
                    if !tags.contains(tag) {
                        tags.push(tag.clone());
                    }
                }
                assignments.push(Assignment {
                    name: grade.assignment.clone(),
                    date: grade.date.clone(),
                    max_points: grade.max_points,
                    tags,
                });
            }
        }
    }
    sort_assignments(&mut assignments);
    assignments
}

/// Dates ascending when both sides have one, otherwise case-insensitive name.
fn compare_assignments(a: &Assignment, b: &Assignment) -> Ordering {
    let dated = a
        .date
        .as_deref()
        .and_then(format::parse_date)
        .zip(b.date.as_deref().and_then(format::parse_date));
    match dated {
        Some((da, db)) => da.cmp(&db),
        None => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
    }
}

// The comparator is not transitive once dated and undated columns mix, which
// `slice::sort_by` may reject with a panic. A stable insertion sort accepts it.
fn sort_assignments(assignments: &mut [Assignment]) {
    for i in 1..assignments.len() {
        let mut j = i;
        while j > 0 && compare_assignments(&assignments[j - 1], &assignments[j]) == Ordering::Greater
        {
            assignments.swap(j - 1, j);
            j -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Grade;
    use pretty_assertions::assert_eq;

    fn grade(name: &str, date: Option<&str>, score: f64, max: f64, tags: &[&str]) -> Grade {
        Grade {
            assignment: name.into(),
            date: date.map(str::to_string),
            score,
            max_points: max,
            tags: if tags.is_empty() {
                None
            } else {
                Some(tags.iter().map(|t| t.to_string()).collect())
            },
        }
    }

    fn student(first: &str, last: &str, email: &str, grades: Vec<Grade>) -> Student {
        Student {
            first_name: first.into(),
            last_name: last.into(),
            email: email.into(),
            grades,
        }
    }

    fn roster() -> Vec<Student> {
        vec![
            student(
                "Alice",
                "Lee",
                "alice@school.edu",
                vec![
                    grade("HW1", Some("2024-09-01"), 45.0, 50.0, &["algebra"]),
                    grade("HW2", Some("2024-09-08"), 30.0, 50.0, &["geometry"]),
                ],
            ),
            student(
                "Bob",
                "Lee",
                "bob@school.edu",
                vec![grade("HW1", Some("2024-09-01"), 50.0, 50.0, &["algebra"])],
            ),
        ]
    }

    fn loaded(students: Vec<Student>) -> GradesTable {
        let mut table = GradesTable::new();
        table.finish_load(Ok(students));
        table
    }

    fn visible_names(table: &GradesTable) -> Vec<String> {
        table.render().rows().iter().map(|r| r.name.clone()).collect()
    }

    fn hidden_flags(table: &GradesTable) -> Vec<bool> {
        table.render().columns.iter().map(|c| c.hidden).collect()
    }

    #[test]
    fn derives_distinct_columns_sorted_by_date() {
        let assignments = derive_assignments(&roster());
        let names: Vec<&str> = assignments.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["HW1", "HW2"]);
        assert_eq!(assignments[0].max_points, 50.0);
    }

    #[test]
    fn same_name_different_date_is_two_columns() {
        let students = vec![student(
            "A",
            "B",
            "a@b.c",
            vec![
                grade("Quiz", Some("2024-10-02"), 1.0, 5.0, &[]),
                grade("Quiz", Some("2024-09-02"), 1.0, 5.0, &[]),
            ],
        )];
        let assignments = derive_assignments(&students);
        assert_eq!(assignments.len(), 2);
        assert_eq!(assignments[0].date.as_deref(), Some("2024-09-02"));
    }

    #[test]
    fn keeps_first_seen_max_points_and_unions_tags() {
        let students = vec![
            student("A", "One", "1@x.y", vec![grade("Lab", None, 8.0, 10.0, &["lab", "physics"])]),
            student("B", "Two", "2@x.y", vec![grade("Lab", None, 18.0, 20.0, &["physics", "optics"])]),
        ];
        let assignments = derive_assignments(&students);
        assert_eq!(assignments.len(), 1);
        assert_eq!(assignments[0].max_points, 10.0);
        assert_eq!(assignments[0].tags, vec!["lab", "physics", "optics"]);
    }

    #[test]
    fn undated_columns_sort_by_name_case_insensitively() {
        let students = vec![student(
            "A",
            "B",
            "a@b.c",
            vec![
                grade("essay", None, 1.0, 1.0, &[]),
                grade("Bonus", None, 1.0, 1.0, &[]),
                grade("Attendance", None, 1.0, 1.0, &[]),
            ],
        )];
        let names: Vec<String> = derive_assignments(&students)
            .into_iter()
            .map(|a| a.name)
            .collect();
        assert_eq!(names, vec!["Attendance", "Bonus", "essay"]);
    }

    #[test]
    fn mixed_dated_and_undated_sort_does_not_panic() {
        let students = vec![student(
            "A",
            "B",
            "a@b.c",
            vec![
                grade("Zeta", Some("2024-01-01"), 1.0, 1.0, &[]),
                grade("Alpha", None, 1.0, 1.0, &[]),
                grade("Mid", Some("2023-01-01"), 1.0, 1.0, &[]),
                grade("Beta", None, 1.0, 1.0, &[]),
                grade("Omega", Some("2022-06-01"), 1.0, 1.0, &[]),
            ],
        )];
        assert_eq!(derive_assignments(&students).len(), 5);
    }

    #[test]
    fn student_filter_matches_names_and_email() {
        let mut table = loaded(roster());

        table.filter_by_student("lee");
        assert_eq!(visible_names(&table), vec!["Lee, Alice", "Lee, Bob"]);

        table.filter_by_student("alice");
        assert_eq!(visible_names(&table), vec!["Lee, Alice"]);

        table.filter_by_student("LEE, B");
        assert_eq!(visible_names(&table), vec!["Lee, Bob"]);

        table.filter_by_student("bob@school");
        assert_eq!(visible_names(&table), vec!["Lee, Bob"]);

        table.filter_by_student("   ");
        assert_eq!(table.render().rows().len(), 2);
    }

    #[test]
    fn student_filter_leaves_columns_alone() {
        let mut table = loaded(roster());
        table.filter_by_student("zzz");
        assert_eq!(hidden_flags(&table), vec![false, false]);
        assert_eq!(table.render().body, TableBody::Message(NO_MATCHES));
    }

    #[test]
    fn tag_filter_hides_columns_but_keeps_them() {
        let mut table = loaded(roster());
        table.filter_by_student("alice");

        table.filter_by_tag("algebra");
        assert_eq!(hidden_flags(&table), vec![false, true]);
        assert_eq!(table.filter().visible_columns, vec![0]);
        // a tag filter never hides a student row
        assert_eq!(visible_names(&table), vec!["Lee, Alice"]);
        let layout = table.render();
        assert_eq!(layout.rows()[0].cells.len(), 2);
        assert!(layout.rows()[0].cells[1].hidden);

        table.filter_by_tag("");
        assert_eq!(hidden_flags(&table), vec![false, false]);
        assert_eq!(visible_names(&table), vec!["Lee, Alice"]);
    }

    #[test]
    fn tag_filter_matches_assignment_name() {
        let mut table = loaded(roster());
        table.filter_by_tag("hw2");
        assert_eq!(hidden_flags(&table), vec![true, false]);
    }

    #[test]
    fn missing_grade_is_placeholder_not_zero() {
        let table = loaded(roster());
        let layout = table.render();
        let bob = &layout.rows()[1];
        assert_eq!(bob.name, "Lee, Bob");
        assert_eq!(bob.cells[1].grade, None);

        let alice_hw1 = layout.rows()[0].cells[0].grade.as_ref().unwrap();
        assert_eq!(alice_hw1.percentage, 90);
        assert_eq!(alice_hw1.class, GradeClass::Good);
        assert_eq!(alice_hw1.score_label(), "45/50");
    }

    #[test]
    fn header_info_shows_date_and_points() {
        let table = loaded(roster());
        assert_eq!(table.render().columns[0].info(), "Sep 1, 2024 | 50 pts");
    }

    #[test]
    fn refresh_reapplies_current_filters() {
        let mut table = loaded(roster());
        table.filter_by_student("bob");
        table.filter_by_tag("geometry");

        let mut refreshed = roster();
        refreshed.push(student("Bobby", "Tables", "bobby@school.edu", vec![]));
        table.begin_load();
        table.finish_load(Ok(refreshed));

        assert_eq!(table.filter().student_query, "bob");
        assert_eq!(visible_names(&table), vec!["Lee, Bob", "Tables, Bobby"]);
        assert_eq!(hidden_flags(&table), vec![true, false]);
    }

    #[test]
    fn load_error_shows_generic_message() {
        let mut table = GradesTable::new();
        assert_eq!(table.render().body, TableBody::Message(LOADING));
        table.finish_load(Err(AppError::Status { status: 500 }));
        assert_eq!(table.state(), &LoadState::LoadError);
        assert_eq!(table.render().body, TableBody::Message(LOAD_FAILED));
    }

    #[test]
    fn empty_roster_message() {
        let table = loaded(vec![]);
        assert_eq!(table.render().body, TableBody::Message(NO_STUDENTS));
    }

    #[test]
    fn row_click_requires_email() {
        let mut students = roster();
        students.push(student("Ghost", "Student", "", vec![]));
        let table = loaded(students);

        assert_eq!(table.student_email(0).unwrap(), "alice@school.edu");
        assert_eq!(
            table.student_email(2),
            Err(AppError::MissingEmail {
                student: "Ghost Student".into()
            })
        );
    }
}
