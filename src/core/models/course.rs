//! Course model

use super::grade::{grade_to_point, Grade};
use serde::{Deserialize, Serialize};

/// Code fragments that mark administrative entries (co-op, professional
/// development, work reports) rather than academic courses
const ADMINISTRATIVE_CODES: [&str; 3] = ["COOP", "PD", "WKRPT"];

/// One course occurrence read from a transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    /// Department and number separated by one space (e.g., "CS 246")
    pub code: String,

    /// Course title (e.g., "Object-Oriented Software Development")
    pub name: String,

    /// Raw grade token as printed (e.g., "A-", "87", "WD")
    pub grade: String,

    /// Grade point in `[0.0, 4.0]`, fixed when the record is built
    pub grade_point: f64,

    /// Earned credit weight (e.g., 0.50)
    pub credits: f64,

    /// Term label (e.g., "Fall 2022"); empty when no term header was seen
    #[serde(default)]
    pub term: String,

    /// Class standing code (e.g., "2A")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    /// Currently enrolled without a final grade
    #[serde(default)]
    pub is_enrolled: bool,

    /// Declared program active when the course was listed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
}

impl Course {
    /// Create a new course with no term, level, or program
    ///
    /// # Arguments
    /// * `code` - Course code; whitespace is normalized to single spaces
    /// * `name` - Course title
    /// * `grade` - Raw grade token; the grade point is derived from it here
    /// * `credits` - Earned credit weight
    #[must_use]
    pub fn new(code: &str, name: &str, grade: &str, credits: f64) -> Self {
        let grade = grade.trim().to_string();
        Self {
            code: normalize_code(code),
            name: name.trim().to_string(),
            grade_point: grade_to_point(&grade),
            grade,
            credits,
            term: String::new(),
            level: None,
            is_enrolled: false,
            program: None,
        }
    }

    /// Set the term label
    #[must_use]
    pub fn with_term(mut self, term: impl Into<String>) -> Self {
        self.term = term.into();
        self
    }

    /// Set the class standing
    #[must_use]
    pub fn with_level(mut self, level: Option<String>) -> Self {
        self.level = level;
        self
    }

    /// Set the program
    #[must_use]
    pub fn with_program(mut self, program: Option<String>) -> Self {
        self.program = program;
        self
    }

    /// Classified grade token
    #[must_use]
    pub fn parsed_grade(&self) -> Grade {
        Grade::parse(&self.grade)
    }

    /// Whether this course counts toward GPA
    #[must_use]
    pub fn is_countable(&self) -> bool {
        is_countable(&self.code, &self.grade)
    }

    /// Grade points weighted by credits
    #[must_use]
    pub fn weighted_points(&self) -> f64 {
        self.grade_point * self.credits
    }
}

/// Shared exclusion rule for transcript entries.
///
/// `CR` and `IP` grades carry no GPA information, and codes containing
/// `COOP`, `PD` or `WKRPT` are administrative entries.
#[must_use]
pub fn is_countable(code: &str, grade: &str) -> bool {
    Grade::parse(grade).is_graded() && !ADMINISTRATIVE_CODES.iter().any(|c| code.contains(c))
}

/// Collapse internal whitespace so "CS   246 " becomes "CS 246"
#[must_use]
pub fn normalize_code(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}
