//! Submit command handler

use grade_lens::config::Config;
use grade_lens::core::gpa::calculate_gpa;
use grade_lens::core::models::Course;
use grade_lens::core::peers::{
    programs_match, submissions_for_terms, JsonFileStore, SubmissionStore,
};
use grade_lens::{info, warn};
use std::path::Path;

/// Program printed on the transcript, if the parser saw one
fn transcript_program(courses: &[Course]) -> Option<&str> {
    courses
        .iter()
        .find_map(|c| c.program.as_deref())
        .filter(|p| !p.trim().is_empty())
}

/// Pick the program to submit under: flag, then config default, then transcript.
fn resolve_program<'a>(
    flag: Option<&'a str>,
    config_default: &'a str,
    transcript: Option<&'a str>,
) -> Option<&'a str> {
    flag.map(str::trim)
        .filter(|p| !p.is_empty())
        .or_else(|| Some(config_default.trim()).filter(|p| !p.is_empty()))
        .or(transcript)
}

/// Run the submit command: one submission per term with credits.
pub fn run(
    input_file: &Path,
    program: Option<&str>,
    yes: bool,
    config: &Config,
) -> Result<(), String> {
    let courses = super::load_courses(input_file)?;
    let on_transcript = transcript_program(&courses);

    let program = resolve_program(program, &config.program.default, on_transcript)
        .ok_or_else(|| "No program given; pass --program or set `program` in config".to_string())?;

    if let Some(found) = on_transcript {
        if !programs_match(program, found) {
            warn!("Program '{program}' does not match transcript program '{found}'");
            if !yes {
                return Err(format!(
                    "Program '{program}' does not match '{found}' on the transcript; rerun with --yes to submit anyway"
                ));
            }
        }
    }

    let result = calculate_gpa(&courses, None);
    let submissions = submissions_for_terms(program, &result, &courses);
    if submissions.is_empty() {
        return Err("Transcript has no graded terms to submit".to_string());
    }

    let mut store = JsonFileStore::open(&config.paths.submissions_file)
        .map_err(|e| format!("Failed to open submission store: {e}"))?;

    for submission in submissions {
        let term = submission.term.clone();
        let gpa = submission.gpa;
        let id = store
            .insert(submission)
            .map_err(|e| format!("Failed to submit {term}: {e}"))?;
        info!("Submission {id}: {term} ({gpa:.2})");
        println!("✓ Submitted {term} GPA {gpa:.2} as '{program}'");
    }
    println!(
        "✓ {} submissions stored in {}",
        store.count(),
        store.path().display()
    );
    Ok(())
}
