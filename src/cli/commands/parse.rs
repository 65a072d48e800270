//! Parse command handler

use grade_lens::config::Config;
use grade_lens::core::courses_export::{CoursesExporter, CsvExporter, JsonExporter};
use grade_lens::core::gpa::calculate_gpa;
use grade_lens::core::models::Course;
use grade_lens::core::transcript::unique_terms;
use grade_lens::{info, verbose};
use std::path::{Path, PathBuf};

/// Run the parse command: print the extracted records and optionally export them.
///
/// # Arguments
/// * `input_file` - Transcript text file
/// * `json` - Print records as JSON instead of a table
/// * `export` - Write the records to the configured export directory
/// * `output` - Explicit export path (implies `export`)
/// * `config` - Configuration providing `out_dir` and the percentage policy
pub fn run(
    input_file: &Path,
    json: bool,
    export: bool,
    output: Option<&Path>,
    config: &Config,
) -> Result<(), String> {
    let courses = super::load_courses(input_file)?;

    if json {
        super::print_json(&courses)?;
    } else {
        print_table(&courses);
    }

    if export || output.is_some() {
        let path = export_path(input_file, output, config)?;
        let result = calculate_gpa(&courses, None);
        let exporter: Box<dyn CoursesExporter> =
            if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json")) {
                Box::new(JsonExporter)
            } else {
                Box::new(CsvExporter {
                    policy: config.percentage.policy(),
                })
            };
        exporter
            .export(&courses, &result, &path)
            .map_err(|e| format!("Failed to export {}: {e}", path.display()))?;
        info!("Exported {} courses to {}", courses.len(), path.display());
        // Keep stdout machine-readable in JSON mode
        if json {
            eprintln!("✓ Exported to: {}", path.display());
        } else {
            println!("✓ Exported to: {}", path.display());
        }
    }
    Ok(())
}

fn export_path(
    input_file: &Path,
    output: Option<&Path>,
    config: &Config,
) -> Result<PathBuf, String> {
    if let Some(path) = output {
        return Ok(path.to_path_buf());
    }
    let out_dir = PathBuf::from(&config.paths.out_dir);
    std::fs::create_dir_all(&out_dir).map_err(|e| {
        format!(
            "Failed to create output directory {}: {e}",
            out_dir.display()
        )
    })?;
    let stem = input_file
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("transcript");
    Ok(out_dir.join(format!("{stem}_courses.csv")))
}

fn print_table(courses: &[Course]) {
    let terms = unique_terms(courses);
    verbose!("Terms found: {}", terms.join(", "));

    for term in &terms {
        println!("\n{term}");
        println!("{:-<72}", "");
        for course in courses.iter().filter(|c| &c.term == term) {
            println!(
                "  {:<10} {:<38} {:>4} {:>4.1} {:>6.2}",
                course.code, course.name, course.grade, course.grade_point, course.credits
            );
        }
    }
    println!("\n✓ {} courses across {} terms", courses.len(), terms.len());
}
