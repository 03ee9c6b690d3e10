//! Formatting and validation helpers shared by both views.

use std::fmt;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate};
use regex::Regex;

pub const NO_DATE: &str = "No date";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

/// Escapes the five HTML-significant characters. Every string that comes
/// from the API or from user input goes through here before it is placed
/// into markup.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    // "2024-09-15T00:00:00" without an offset
    raw.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

/// `"Sep 5, 2024"` for a parseable date, `"No date"` when absent.
/// Unparseable input is shown as-is.
pub fn format_date(raw: Option<&str>) -> String {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => NO_DATE.to_string(),
        Some(s) => parse_date(s)
            .map(|d| d.format("%b %-d, %Y").to_string())
            .unwrap_or_else(|| s.to_string()),
    }
}

/// Permissive `local@domain.tld` check, not RFC validation.
pub fn is_valid_email(text: &str) -> bool {
    EMAIL_RE.is_match(text)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeClass {
    Good,
    Medium,
    Poor,
}

impl GradeClass {
    pub fn css_class(self) -> &'static str {
        match self {
            GradeClass::Good => "grade-good",
            GradeClass::Medium => "grade-medium",
            GradeClass::Poor => "grade-poor",
        }
    }
}

impl fmt::Display for GradeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.css_class())
    }
}

pub fn grade_class(percentage: f64) -> GradeClass {
    if percentage >= 80.0 {
        GradeClass::Good
    } else if percentage >= 60.0 {
        GradeClass::Medium
    } else {
        GradeClass::Poor
    }
}

pub fn grade_letter(percentage: f64) -> char {
    match percentage {
        p if p >= 90.0 => 'A',
        p if p >= 80.0 => 'B',
        p if p >= 70.0 => 'C',
        p if p >= 60.0 => 'D',
        _ => 'F',
    }
}

/// Rounded percentage; a non-positive maximum yields 0 instead of dividing.
pub fn percentage(score: f64, max_points: f64) -> i64 {
    if max_points > 0.0 {
        (score / max_points * 100.0).round() as i64
    } else {
        0
    }
}

/// One-decimal percentage label, `87.25` -> `"87.3%"`. Ties round up.
pub fn percent_label(value: f64) -> String {
    format!("{:.1}%", (value * 10.0).round() / 10.0)
}

/// Point values print the way the API's JSON numbers read: `45`, `45.5`.
pub fn format_points(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn escapes_all_special_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#039;Jerry&#039;&lt;/a&gt;"
        );
    }

    #[rstest]
    #[case("<script>alert(1)</script>")]
    #[case("Robert<script src=x></script>Tables")]
    #[case("<<script>>")]
    fn escaped_script_has_no_raw_angle_bracket(#[case] input: &str) {
        let out = escape_html(input);
        assert!(!out.contains('<'));
        assert!(!out.contains('>'));
    }

    #[test]
    fn escaping_twice_does_not_reintroduce_markup() {
        let once = escape_html("<b>");
        let twice = escape_html(&once);
        assert_eq!(twice, "&amp;lt;b&amp;gt;");
        assert!(!twice.contains('<'));
    }

    #[rstest]
    #[case(None, "No date")]
    #[case(Some(""), "No date")]
    #[case(Some("2024-09-05"), "Sep 5, 2024")]
    #[case(Some("2024-12-25T10:00:00Z"), "Dec 25, 2024")]
    #[case(Some("2025-01-31T00:00:00"), "Jan 31, 2025")]
    #[case(Some("next tuesday"), "next tuesday")]
    fn formats_dates(#[case] input: Option<&str>, #[case] expected: &str) {
        assert_eq!(format_date(input), expected);
    }

    #[rstest]
    #[case("a@b.c", true)]
    #[case("jane.doe@school.edu", true)]
    #[case("a@b", false)]
    #[case("", false)]
    #[case("a b@c.d", false)]
    #[case("a@@b.c", false)]
    #[case("@b.c", false)]
    fn validates_email(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_valid_email(input), expected);
    }

    #[rstest]
    #[case(100.0, GradeClass::Good)]
    #[case(80.0, GradeClass::Good)]
    #[case(79.0, GradeClass::Medium)]
    #[case(60.0, GradeClass::Medium)]
    #[case(59.0, GradeClass::Poor)]
    #[case(0.0, GradeClass::Poor)]
    fn classifies_grades(#[case] pct: f64, #[case] expected: GradeClass) {
        assert_eq!(grade_class(pct), expected);
    }

    #[rstest]
    #[case(87.25, "87.3%")]
    #[case(87.24, "87.2%")]
    #[case(90.0, "90.0%")]
    #[case(66.666, "66.7%")]
    #[case(0.0, "0.0%")]
    fn percent_labels_round_half_up(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(percent_label(value), expected);
    }

    #[rstest]
    #[case(95.0, 'A')]
    #[case(90.0, 'A')]
    #[case(89.9, 'B')]
    #[case(80.0, 'B')]
    #[case(70.0, 'C')]
    #[case(60.0, 'D')]
    #[case(59.5, 'F')]
    fn letters(#[case] pct: f64, #[case] expected: char) {
        assert_eq!(grade_letter(pct), expected);
    }

    #[test]
    fn percentage_guards_zero_max() {
        assert_eq!(percentage(0.0, 0.0), 0);
        assert_eq!(percentage(45.0, 50.0), 90);
        assert_eq!(percentage(50.0, 0.0), 0);
        assert_eq!(percentage(5.0, -10.0), 0);
        assert_eq!(percentage(2.0, 3.0), 67);
        assert_eq!(percentage(12.0, 10.0), 120);
    }

    #[test]
    fn points_print_without_trailing_zero() {
        assert_eq!(format_points(45.0), "45");
        assert_eq!(format_points(45.5), "45.5");
        assert_eq!(format_points(0.0), "0");
    }
}
