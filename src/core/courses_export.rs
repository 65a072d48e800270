//! Export parsed courses and GPA figures to files

use crate::core::gpa::GpaResult;
use crate::core::models::Course;
use crate::core::percentage::{gpa_to_percentage_with, PercentagePolicy};
use serde::Serialize;
use std::error::Error;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Trait for exporting a parsed transcript in different formats
pub trait CoursesExporter {
    /// Write `courses` and their GPA summary to `output_path`
    ///
    /// # Errors
    /// Returns an error if export fails
    fn export(
        &self,
        courses: &[Course],
        result: &GpaResult,
        output_path: &Path,
    ) -> Result<(), Box<dyn Error>>;
}

/// CSV exporter: summary rows, a blank line, then one row per course
pub struct CsvExporter {
    /// Percentage policy for the summary row
    pub policy: PercentagePolicy,
}

impl CoursesExporter for CsvExporter {
    fn export(
        &self,
        courses: &[Course],
        result: &GpaResult,
        output_path: &Path,
    ) -> Result<(), Box<dyn Error>> {
        let mut file = File::create(output_path)?;
        write_courses_csv(&mut file, courses, result, self.policy)?;
        Ok(())
    }
}

/// JSON exporter: `{ "courses": [...], "gpa": {...} }`
pub struct JsonExporter;

#[derive(Serialize)]
struct JsonDocument<'a> {
    courses: &'a [Course],
    gpa: &'a GpaResult,
}

impl CoursesExporter for JsonExporter {
    fn export(
        &self,
        courses: &[Course],
        result: &GpaResult,
        output_path: &Path,
    ) -> Result<(), Box<dyn Error>> {
        let doc = JsonDocument {
            courses,
            gpa: result,
        };
        std::fs::write(output_path, serde_json::to_string_pretty(&doc)?)?;
        Ok(())
    }
}

/// Quote a CSV field if it contains a delimiter, quote, or newline
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Write the CSV body to any writer
///
/// # Errors
/// Returns an error if writing fails
pub fn write_courses_csv<W: Write>(
    out: &mut W,
    courses: &[Course],
    result: &GpaResult,
    policy: PercentagePolicy,
) -> std::io::Result<()> {
    writeln!(out, "Overall GPA,{:.2}", result.overall_gpa)?;
    writeln!(
        out,
        "Percentage,{}",
        gpa_to_percentage_with(result.overall_gpa, policy)
    )?;
    writeln!(out, "Total Credits,{:.2}", result.total_credits)?;
    for term in result.chronological_term_gpas() {
        writeln!(
            out,
            "Term GPA,{},{:.2},{:.2}",
            csv_field(&term.term),
            term.gpa,
            term.credits
        )?;
    }
    writeln!(out)?;

    writeln!(out, "Code,Name,Grade,Grade Point,Credits,Term,Level,Program")?;
    for course in courses {
        writeln!(
            out,
            "{},{},{},{:.1},{:.2},{},{},{}",
            csv_field(&course.code),
            csv_field(&course.name),
            csv_field(&course.grade),
            course.grade_point,
            course.credits,
            csv_field(&course.term),
            csv_field(course.level.as_deref().unwrap_or_default()),
            csv_field(course.program.as_deref().unwrap_or_default()),
        )?;
    }
    Ok(())
}
