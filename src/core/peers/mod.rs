//! Anonymized peer comparison
//!
//! Submissions are one row per (program, term) GPA plus one row per course
//! grade. The aggregates here are plain unweighted means over those rows;
//! where the rows live is up to a [`SubmissionStore`].

pub mod compare;
pub mod store;

use crate::core::gpa::{GpaResult, OVERALL};
use crate::core::models::Course;
use crate::core::percentage::{gpa_to_percentage_with, PercentagePolicy};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

pub use compare::{
    compare_to_peers, term_overlay, ComparisonMode, PeerPosition, PerformanceLevel, TermComparison,
};
pub use store::{JsonFileStore, MemoryStore, SubmissionStore};

/// Peer store failures
#[derive(Error, Debug)]
pub enum PeerError {
    /// Reading or writing the backing file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing document is not valid JSON for the expected rows
    #[error("Invalid submission data: {0}")]
    Json(#[from] serde_json::Error),

    /// A submission was rejected before storing
    #[error("Invalid submission: {0}")]
    InvalidRow(String),
}

/// Stored per-term GPA submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRow {
    /// Generated submission identifier
    pub id: u64,
    /// Program the student declared
    pub program: String,
    /// Term the GPA belongs to
    pub term: String,
    /// Term GPA
    pub gpa: f64,
    /// Number of graded courses behind the GPA
    pub total_courses: usize,
}

/// Stored course grade, linked to its submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseGradeRow {
    /// Submission the grade was sent with
    pub submission_id: u64,
    /// Course code (e.g., "CS 246")
    pub course_code: String,
    /// Course title
    pub course_name: String,
    /// Raw grade token
    pub grade: String,
    /// Grade point on the 4.0 scale
    pub grade_point: f64,
    /// Earned credits
    pub credits: f64,
    /// Term label
    pub term: String,
}

impl CourseGradeRow {
    /// Map a course onto a storable row
    #[must_use]
    pub fn from_course(submission_id: u64, course: &Course) -> Self {
        Self {
            submission_id,
            course_code: course.code.clone(),
            course_name: course.name.clone(),
            grade: course.grade.clone(),
            grade_point: course.grade_point,
            credits: course.credits,
            term: course.term.clone(),
        }
    }
}

/// Payload for one submission, before an identifier is assigned
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    /// Program the student declared
    pub program: String,
    /// Term the GPA belongs to
    pub term: String,
    /// Term GPA
    pub gpa: f64,
    /// Number of countable courses sent
    pub total_courses: usize,
    /// Countable courses of the term
    pub courses: Vec<Course>,
}

impl Submission {
    /// Build a submission, keeping only countable courses
    #[must_use]
    pub fn from_courses(program: &str, term: &str, gpa: f64, courses: &[Course]) -> Self {
        let courses: Vec<Course> = courses.iter().filter(|c| c.is_countable()).cloned().collect();
        Self {
            program: program.trim().to_string(),
            term: term.to_string(),
            gpa,
            total_courses: courses.len(),
            courses,
        }
    }

    /// Check the payload before it is stored
    ///
    /// # Errors
    /// Returns [`PeerError::InvalidRow`] for an empty program or a GPA outside `[0, 4]`.
    pub fn validate(&self) -> Result<(), PeerError> {
        if self.program.is_empty() {
            return Err(PeerError::InvalidRow("program is required".to_string()));
        }
        if !(0.0..=4.0).contains(&self.gpa) {
            return Err(PeerError::InvalidRow(format!(
                "GPA {} is outside 0.0-4.0",
                self.gpa
            )));
        }
        Ok(())
    }
}

/// One submission per term with credits, each carrying that term's courses
#[must_use]
pub fn submissions_for_terms(
    program: &str,
    result: &GpaResult,
    courses: &[Course],
) -> Vec<Submission> {
    result
        .term_gpas
        .iter()
        .map(|term_gpa| {
            let term_courses: Vec<Course> = courses
                .iter()
                .filter(|c| c.term == term_gpa.term)
                .cloned()
                .collect();
            Submission::from_courses(program, &term_gpa.term, term_gpa.gpa, &term_courses)
        })
        .collect()
}

/// Whether a chosen program plausibly matches the one on the transcript.
///
/// Case-insensitive containment either way; "Other" matches anything.
#[must_use]
pub fn programs_match(selected: &str, transcript: &str) -> bool {
    let selected_lc = selected.to_lowercase();
    let transcript_lc = transcript.to_lowercase();
    selected == "Other"
        || selected_lc.contains(&transcript_lc)
        || transcript_lc.contains(&selected_lc)
}

/// Number of students who have shared results
#[must_use]
pub fn submission_count<S: SubmissionStore + ?Sized>(store: &S) -> usize {
    store.count()
}

/// Mean GPA of one term across a program's submissions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermAverage {
    /// Term label
    pub term: String,
    /// Unweighted mean of submitted GPAs
    pub avg_gpa: f64,
    /// Submissions in the group
    pub sample_size: usize,
}

/// Mean grade point of one course across submissions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseAverage {
    /// Course code
    pub course_code: String,
    /// Unweighted mean grade point
    pub avg_gpa: f64,
    /// Mean as a whole percentage
    pub avg_percentage: f64,
    /// Grades in the group
    pub sample_size: usize,
}

/// Spread of submitted GPAs for a program
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GpaStats {
    /// Submissions counted
    pub count: usize,
    /// Mean GPA, two decimals
    pub avg_gpa: f64,
    /// Lowest GPA, two decimals
    pub min_gpa: f64,
    /// Highest GPA, two decimals
    pub max_gpa: f64,
    /// Mean of per-submission percentages, whole percent
    pub avg_percentage: f64,
    /// Lowest percentage
    pub min_percentage: f64,
    /// Highest percentage
    pub max_percentage: f64,
}

/// Group values by key, keeping first-appearance order of keys
fn group_in_order<'a, T: 'a>(
    items: impl IntoIterator<Item = &'a T>,
    key: impl Fn(&T) -> &str,
    value: impl Fn(&T) -> f64,
) -> Vec<(String, Vec<f64>)> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<f64>)> = Vec::new();
    for item in items {
        let k = key(item);
        if let Some(&i) = index.get(k) {
            groups[i].1.push(value(item));
        } else {
            index.insert(k.to_string(), groups.len());
            groups.push((k.to_string(), vec![value(item)]));
        }
    }
    groups
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Per-term GPA averages for a program, ordered by term label
#[must_use]
pub fn faculty_averages(rows: &[SubmissionRow], program: &str) -> Vec<TermAverage> {
    let mut sorted: Vec<&SubmissionRow> = rows.iter().filter(|r| r.program == program).collect();
    sorted.sort_by(|a, b| a.term.cmp(&b.term));

    group_in_order(sorted, |r| &r.term, |r| r.gpa)
        .into_iter()
        .map(|(term, gpas)| TermAverage {
            term,
            avg_gpa: mean(&gpas),
            sample_size: gpas.len(),
        })
        .collect()
}

/// Mean grade point for each requested course code that has grades
#[must_use]
pub fn course_averages(rows: &[CourseGradeRow], codes: &[String]) -> Vec<CourseAverage> {
    let wanted: Vec<&CourseGradeRow> = rows
        .iter()
        .filter(|r| codes.iter().any(|c| c.trim() == r.course_code))
        .collect();

    group_in_order(wanted, |r| &r.course_code, |r| r.grade_point)
        .into_iter()
        .map(|(course_code, points)| {
            let avg_gpa = mean(&points);
            CourseAverage {
                course_code,
                avg_gpa,
                avg_percentage: gpa_to_percentage_with(avg_gpa, PercentagePolicy::ROUNDED),
                sample_size: points.len(),
            }
        })
        .collect()
}

/// GPA spread for a program, optionally narrowed to one term
#[must_use]
pub fn gpa_stats(rows: &[SubmissionRow], program: &str, term: Option<&str>) -> GpaStats {
    let scope = term.filter(|t| *t != OVERALL);
    let gpas: Vec<f64> = rows
        .iter()
        .filter(|r| r.program == program && scope.is_none_or(|t| r.term == t))
        .map(|r| r.gpa)
        .collect();

    if gpas.is_empty() {
        return GpaStats::default();
    }

    let percentages: Vec<f64> = gpas
        .iter()
        .map(|&g| gpa_to_percentage_with(g, PercentagePolicy::ROUNDED))
        .collect();

    let min = |v: &[f64]| v.iter().copied().fold(f64::INFINITY, f64::min);
    let max = |v: &[f64]| v.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    GpaStats {
        count: gpas.len(),
        avg_gpa: round2(mean(&gpas)),
        min_gpa: round2(min(&gpas)),
        max_gpa: round2(max(&gpas)),
        avg_percentage: mean(&percentages).round(),
        min_percentage: min(&percentages).round(),
        max_percentage: max(&percentages).round(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(id: u64, program: &str, term: &str, gpa: f64) -> SubmissionRow {
        SubmissionRow {
            id,
            program: program.to_string(),
            term: term.to_string(),
            gpa,
            total_courses: 5,
        }
    }

    fn grade(code: &str, grade_point: f64) -> CourseGradeRow {
        CourseGradeRow {
            submission_id: 1,
            course_code: code.to_string(),
            course_name: String::new(),
            grade: String::new(),
            grade_point,
            credits: 0.5,
            term: "Fall 2022".to_string(),
        }
    }

    #[test]
    fn test_faculty_averages_grouped_by_term() {
        let rows = vec![
            submission(1, "Computer Science", "Winter 2023", 3.0),
            submission(2, "Computer Science", "Fall 2022", 3.5),
            submission(3, "Computer Science", "Winter 2023", 4.0),
            submission(4, "Mathematics", "Fall 2022", 1.0),
        ];
        let averages = faculty_averages(&rows, "Computer Science");

        assert_eq!(averages.len(), 2);
        assert_eq!(averages[0].term, "Fall 2022");
        assert!((averages[0].avg_gpa - 3.5).abs() < 1e-9);
        assert_eq!(averages[0].sample_size, 1);
        assert_eq!(averages[1].term, "Winter 2023");
        assert!((averages[1].avg_gpa - 3.5).abs() < 1e-9);
        assert_eq!(averages[1].sample_size, 2);
    }

    #[test]
    fn test_course_averages() {
        let rows = vec![grade("CS 246", 4.0), grade("CS 246", 3.0), grade("MATH 135", 2.0)];
        let averages = course_averages(&rows, &["CS 246".to_string(), "CS 999".to_string()]);

        assert_eq!(averages.len(), 1);
        assert_eq!(averages[0].course_code, "CS 246");
        assert!((averages[0].avg_gpa - 3.5).abs() < 1e-9);
        // 3.5 / 4 * 90 + 10 = 88.75
        assert!((averages[0].avg_percentage - 89.0).abs() < 1e-9);
        assert_eq!(averages[0].sample_size, 2);
    }

    #[test]
    fn test_gpa_stats() {
        let rows = vec![
            submission(1, "Computer Science", "Fall 2022", 3.0),
            submission(2, "Computer Science", "Winter 2023", 4.0),
        ];
        let stats = gpa_stats(&rows, "Computer Science", Some(OVERALL));
        assert_eq!(stats.count, 2);
        assert!((stats.avg_gpa - 3.5).abs() < 1e-9);
        assert!((stats.min_gpa - 3.0).abs() < 1e-9);
        assert!((stats.max_gpa - 4.0).abs() < 1e-9);
        // 77.5 rounds to 78; 100
        assert!((stats.min_percentage - 78.0).abs() < 1e-9);
        assert!((stats.max_percentage - 100.0).abs() < 1e-9);
        assert!((stats.avg_percentage - 89.0).abs() < 1e-9);

        let fall = gpa_stats(&rows, "Computer Science", Some("Fall 2022"));
        assert_eq!(fall.count, 1);
    }

    #[test]
    fn test_gpa_stats_empty() {
        assert_eq!(gpa_stats(&[], "Physics", None), GpaStats::default());
    }

    #[test]
    fn test_submission_keeps_countable_courses() {
        let courses = vec![
            Course::new("CS 135", "FP", "A", 0.5).with_term("Fall 2022"),
            Course::new("CS 136", "ADT", "IP", 0.5).with_term("Fall 2022"),
        ];
        let sub = Submission::from_courses(" Computer Science ", "Fall 2022", 4.0, &courses);
        assert_eq!(sub.program, "Computer Science");
        assert_eq!(sub.total_courses, 1);
        assert!(sub.validate().is_ok());

        let bad = Submission::from_courses("", "Fall 2022", 4.0, &courses);
        assert!(matches!(bad.validate(), Err(PeerError::InvalidRow(_))));
        let bad = Submission::from_courses("CS", "Fall 2022", 4.5, &courses);
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_programs_match() {
        assert!(programs_match("Computer Science", "Computer Science/Co-operative Program"));
        assert!(programs_match("mathematics", "Mathematics"));
        assert!(programs_match("Other", "Anything"));
        assert!(!programs_match("Physics", "Computer Science"));
    }
}
