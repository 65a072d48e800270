//! Integration smoke tests for `grade_lens`

use grade_lens::core::courses_export::{CoursesExporter, CsvExporter, JsonExporter};
use grade_lens::core::gpa::calculate_gpa;
use grade_lens::core::percentage::PercentagePolicy;
use grade_lens::core::transcript::process_transcript;
use grade_lens::get_version;
use tempfile::TempDir;

#[test]
fn version_is_not_empty() {
    let v = get_version();
    assert!(!v.trim().is_empty());
}

#[test]
fn sample_transcript_exports() {
    let text = std::fs::read_to_string("samples/transcripts/unofficial_transcript.txt")
        .expect("Failed to read sample transcript");
    let courses = process_transcript(&text).expect("Failed to parse sample");
    let result = calculate_gpa(&courses, None);

    let dir = TempDir::new().expect("Failed to create temp dir");

    let csv_path = dir.path().join("unofficial_transcript_courses.csv");
    CsvExporter {
        policy: PercentagePolicy::ROUNDED,
    }
    .export(&courses, &result, &csv_path)
    .expect("CSV export failed");
    let csv = std::fs::read_to_string(&csv_path).expect("Failed to read CSV");
    assert!(csv.starts_with("Overall GPA,3.50\n"));
    assert!(csv.contains("Code,Name,Grade,Grade Point,Credits,Term,Level,Program"));
    // Summary (7 lines incl. blank), header, one row per course
    assert_eq!(csv.lines().count(), 7 + 1 + courses.len());

    let json_path = dir.path().join("unofficial_transcript.json");
    JsonExporter
        .export(&courses, &result, &json_path)
        .expect("JSON export failed");
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).expect("Failed to read JSON"))
            .expect("Export is not valid JSON");
    assert_eq!(json["courses"].as_array().map(Vec::len), Some(courses.len()));
    assert!((json["gpa"]["overallGPA"].as_f64().unwrap() - 3.5).abs() < 1e-9);
}
