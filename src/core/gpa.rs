//! Credit-weighted GPA aggregation

use crate::core::models::{compare_term_labels, Course};
use serde::{Deserialize, Serialize};

/// Term selector meaning "all terms"
pub const OVERALL: &str = "Overall";

/// GPA for a single term
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermGpa {
    /// Term label (e.g., "Fall 2022")
    pub term: String,
    /// Credit-weighted GPA for the term
    pub gpa: f64,
    /// Countable credits in the term
    pub credits: f64,
}

/// Aggregate GPA figures over a set of courses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GpaResult {
    /// Credit-weighted GPA over the selected scope
    #[serde(rename = "overallGPA")]
    pub overall_gpa: f64,
    /// Credits counted in the selected scope
    pub total_credits: f64,
    /// Courses the overall figure was computed from
    pub courses: Vec<Course>,
    /// One entry per term with countable credits, in first-appearance order
    #[serde(rename = "termGPAs")]
    pub term_gpas: Vec<TermGpa>,
}

impl GpaResult {
    /// Term GPAs ordered oldest first
    #[must_use]
    pub fn chronological_term_gpas(&self) -> Vec<TermGpa> {
        let mut terms = self.term_gpas.clone();
        sort_term_gpas(&mut terms);
        terms
    }

    /// Term GPA values oldest first, as fed to the predictor
    #[must_use]
    pub fn gpa_history(&self) -> Vec<f64> {
        self.chronological_term_gpas()
            .into_iter()
            .map(|t| t.gpa)
            .collect()
    }
}

/// Sum of grade points and credits over countable courses.
fn accumulate<'a>(courses: impl IntoIterator<Item = &'a Course>) -> (f64, f64) {
    courses
        .into_iter()
        .filter(|c| c.is_countable())
        .fold((0.0, 0.0), |(points, credits), c| {
            (points + c.weighted_points(), credits + c.credits)
        })
}

fn mean_or_zero(points: f64, credits: f64) -> f64 {
    if credits > 0.0 {
        points / credits
    } else {
        0.0
    }
}

/// Compute overall and per-term GPA.
///
/// `selected_term` narrows the overall figure to one term; `None` or
/// [`OVERALL`] means every term. In-progress and other non-countable courses
/// never contribute. `term_gpas` always covers every term present in
/// `courses`, regardless of the selection, and omits terms without credits.
#[must_use]
pub fn calculate_gpa(courses: &[Course], selected_term: Option<&str>) -> GpaResult {
    let scope = selected_term.filter(|t| *t != OVERALL);
    let in_scope: Vec<Course> = courses
        .iter()
        .filter(|c| c.is_countable() && scope.is_none_or(|t| c.term == t))
        .cloned()
        .collect();

    let (total_points, total_credits) = accumulate(&in_scope);

    GpaResult {
        overall_gpa: mean_or_zero(total_points, total_credits),
        total_credits,
        courses: in_scope,
        term_gpas: compute_term_gpas(courses),
    }
}

/// Per-term GPA over every distinct term in `courses`, in first-appearance order.
#[must_use]
pub fn compute_term_gpas(courses: &[Course]) -> Vec<TermGpa> {
    let mut terms: Vec<&str> = Vec::new();
    for course in courses {
        if !terms.contains(&course.term.as_str()) {
            terms.push(&course.term);
        }
    }

    terms
        .into_iter()
        .filter_map(|term| {
            let (points, credits) = accumulate(courses.iter().filter(|c| c.term == term));
            (credits > 0.0).then(|| TermGpa {
                term: term.to_string(),
                gpa: points / credits,
                credits,
            })
        })
        .collect()
}

/// Sort term GPAs oldest first
pub fn sort_term_gpas(terms: &mut [TermGpa]) {
    terms.sort_by(|a, b| compare_term_labels(&a.term, &b.term));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(code: &str, grade: &str, credits: f64, term: &str) -> Course {
        Course::new(code, "Test Course", grade, credits).with_term(term)
    }

    #[test]
    fn test_empty_input() {
        let result = calculate_gpa(&[], None);
        assert!(result.overall_gpa.abs() < f64::EPSILON);
        assert!(result.total_credits.abs() < f64::EPSILON);
        assert!(result.term_gpas.is_empty());
        assert!(result.courses.is_empty());
    }

    #[test]
    fn test_weighted_mean() {
        let courses = vec![
            course("CS 135", "A", 0.5, "Fall 2022"),
            course("MATH 135", "B", 1.0, "Fall 2022"),
        ];
        let result = calculate_gpa(&courses, None);
        assert!((result.overall_gpa - (4.0 * 0.5 + 3.0) / 1.5).abs() < 1e-9);
        assert!((result.total_credits - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_selected_term_narrows_overall_only() {
        let courses = vec![
            course("CS 135", "A", 0.5, "Fall 2022"),
            course("CS 136", "C", 0.5, "Winter 2023"),
        ];
        let result = calculate_gpa(&courses, Some("Winter 2023"));
        assert!((result.overall_gpa - 2.0).abs() < 1e-9);
        assert_eq!(result.courses.len(), 1);
        assert_eq!(result.term_gpas.len(), 2);

        let overall = calculate_gpa(&courses, Some(OVERALL));
        assert!((overall.overall_gpa - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_in_progress_never_counts() {
        let courses = vec![
            course("CS 135", "A", 0.5, "Fall 2022"),
            course("CS 136", "IP", 0.5, "Fall 2022"),
            course("CS 246", "IP", 0.5, "Winter 2023"),
        ];
        let result = calculate_gpa(&courses, None);
        assert!((result.overall_gpa - 4.0).abs() < 1e-9);
        assert!((result.total_credits - 0.5).abs() < 1e-9);
        assert_eq!(result.term_gpas.len(), 1);
        assert_eq!(result.term_gpas[0].term, "Fall 2022");

        let winter = calculate_gpa(&courses, Some("Winter 2023"));
        assert!(winter.overall_gpa.abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_credit_term_is_omitted() {
        let courses = vec![
            course("CS 135", "A", 0.5, "Fall 2022"),
            course("MATH 135", "F", 0.0, "Winter 2023"),
        ];
        let result = calculate_gpa(&courses, None);
        assert_eq!(result.term_gpas.len(), 1);
    }

    #[test]
    fn test_history_is_chronological() {
        let courses = vec![
            course("CS 246", "B", 0.5, "Winter 2023"),
            course("CS 135", "A", 0.5, "Fall 2022"),
            course("CS 341", "C", 0.5, "Fall 2023"),
        ];
        let result = calculate_gpa(&courses, None);
        assert_eq!(result.term_gpas[0].term, "Winter 2023");
        assert_eq!(result.gpa_history(), vec![4.0, 3.0, 2.0]);
    }

    #[test]
    fn test_serializes_with_exchange_field_names() {
        let result = calculate_gpa(&[course("CS 135", "A", 0.5, "Fall 2022")], None);
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"overallGPA\""));
        assert!(json.contains("\"totalCredits\""));
        assert!(json.contains("\"termGPAs\""));
    }
}
