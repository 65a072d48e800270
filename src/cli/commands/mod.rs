//! CLI command handlers for `GradeLens`.
//!
//! Each command is implemented in its own submodule. Handlers return
//! `Result<(), String>`; the message is logged and printed by `main`.

pub mod config;
pub mod gpa;
pub mod parse;
pub mod peers;
pub mod predict;
pub mod submit;

use grade_lens::core::models::Course;
use grade_lens::core::transcript::process_transcript;
use grade_lens::info;
use std::path::Path;

/// Read a transcript text file and extract its course records
pub fn load_courses(input_file: &Path) -> Result<Vec<Course>, String> {
    let text = std::fs::read_to_string(input_file)
        .map_err(|e| format!("Failed to read {}: {e}", input_file.display()))?;
    let courses = process_transcript(&text)
        .map_err(|e| format!("Failed to parse {}: {e}", input_file.display()))?;
    info!(
        "Loaded {} courses from {}",
        courses.len(),
        input_file.display()
    );
    Ok(courses)
}

/// Serialize a value as pretty JSON to stdout
pub fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), String> {
    let text =
        serde_json::to_string_pretty(value).map_err(|e| format!("Failed to encode JSON: {e}"))?;
    println!("{text}");
    Ok(())
}
