//! Integration tests for GPA aggregation and percentage conversion

use grade_lens::core::gpa::{calculate_gpa, OVERALL};
use grade_lens::core::models::Course;
use grade_lens::core::percentage::{gpa_to_percentage, gpa_to_percentage_with, PercentagePolicy};

fn courses() -> Vec<Course> {
    vec![
        Course::new("CS 246", "Object-Oriented Software Development", "A", 0.5)
            .with_term("Winter 2023"),
        Course::new("CS 135", "Designing Functional Programs", "B", 0.5).with_term("Fall 2022"),
        Course::new("MATH 135", "Algebra", "C", 1.0).with_term("Fall 2022"),
        Course::new("CS 341", "Algorithms", "IP", 0.5).with_term("Fall 2023"),
        Course::new("STAT 230", "Probability", "85", 0.5).with_term("Winter 2023"),
    ]
}

#[test]
fn test_overall_gpa_is_credit_weighted() {
    let result = calculate_gpa(&courses(), None);

    // (4.0*0.5 + 3.0*0.5 + 2.0*1.0 + 3.9*0.5) / 2.5
    assert!((result.overall_gpa - 7.45 / 2.5).abs() < 1e-9);
    assert!((result.total_credits - 2.5).abs() < 1e-9);
    assert_eq!(result.courses.len(), 4);
}

#[test]
fn test_overall_selector_matches_no_selector() {
    let all = calculate_gpa(&courses(), None);
    let overall = calculate_gpa(&courses(), Some(OVERALL));
    assert_eq!(all, overall);
}

#[test]
fn test_term_scope() {
    let result = calculate_gpa(&courses(), Some("Fall 2022"));

    assert!((result.overall_gpa - 3.5 / 1.5).abs() < 1e-9);
    assert!((result.total_credits - 1.5).abs() < 1e-9);
    assert!(result.courses.iter().all(|c| c.term == "Fall 2022"));
    // Term breakdown is independent of the selection
    assert_eq!(result.term_gpas.len(), 2);
}

#[test]
fn test_in_progress_never_counts() {
    let result = calculate_gpa(&courses(), Some("Fall 2023"));
    assert!(result.overall_gpa.abs() < f64::EPSILON);
    assert!(result.total_credits.abs() < f64::EPSILON);
    assert!(result.courses.is_empty());

    let all = calculate_gpa(&courses(), None);
    assert!(all.courses.iter().all(|c| c.grade != "IP"));
    assert!(all.term_gpas.iter().all(|t| t.term != "Fall 2023"));
}

#[test]
fn test_empty_input() {
    let result = calculate_gpa(&[], None);
    assert!(result.overall_gpa.abs() < f64::EPSILON);
    assert!(result.total_credits.abs() < f64::EPSILON);
    assert!(result.courses.is_empty());
    assert!(result.term_gpas.is_empty());
}

#[test]
fn test_term_gpas_order() {
    let result = calculate_gpa(&courses(), None);

    let seen: Vec<&str> = result.term_gpas.iter().map(|t| t.term.as_str()).collect();
    assert_eq!(seen, vec!["Winter 2023", "Fall 2022"]);

    let sorted: Vec<String> = result
        .chronological_term_gpas()
        .into_iter()
        .map(|t| t.term)
        .collect();
    assert_eq!(sorted, vec!["Fall 2022", "Winter 2023"]);

    let history = result.gpa_history();
    assert!((history[0] - 3.5 / 1.5).abs() < 1e-9);
    assert!((history[1] - 3.95).abs() < 1e-9);
}

#[test]
fn test_json_field_names() {
    let result = calculate_gpa(&courses(), None);
    let value = serde_json::to_value(&result).expect("Failed to serialize");

    assert!(value.get("overallGPA").is_some());
    assert!(value.get("totalCredits").is_some());
    assert!(value.get("termGPAs").is_some());
    assert!(value["courses"][0].get("gradePoint").is_some());
    assert!(value["courses"][0].get("isEnrolled").is_some());
}

#[test]
fn test_percentage_conversion() {
    assert!((gpa_to_percentage(4.0) - 100.0).abs() < 1e-9);
    assert!((gpa_to_percentage(0.0) - 10.0).abs() < 1e-9);
    assert!((gpa_to_percentage(3.65) - 92.125).abs() < 1e-9);
    assert!((gpa_to_percentage(4.3) - 100.0).abs() < 1e-9);

    assert!(
        (gpa_to_percentage_with(3.65, PercentagePolicy::ROUNDED) - 92.0).abs() < 1e-9
    );
    assert!(
        (gpa_to_percentage_with(0.0, PercentagePolicy::EXACT.with_floor(50.0)) - 50.0).abs()
            < 1e-9
    );
}
