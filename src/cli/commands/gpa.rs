//! GPA command handler

use grade_lens::config::Config;
use grade_lens::core::gpa::{calculate_gpa, GpaResult, OVERALL};
use grade_lens::core::peers::{
    compare_to_peers, faculty_averages, gpa_stats, term_overlay, ComparisonMode, JsonFileStore,
    PeerPosition, SubmissionStore, TermComparison,
};
use grade_lens::core::percentage::{gpa_to_percentage_with, PercentagePolicy};
use grade_lens::warn;
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct GpaReport<'a> {
    #[serde(flatten)]
    result: &'a GpaResult,
    percentage: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    peers: Option<PeerReport>,
}

/// Placement of the student's figures among one program's submissions
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PeerReport {
    program: String,
    mode: ComparisonMode,
    position: Option<PeerPosition>,
    terms: Vec<TermComparison>,
}

/// Run the gpa command: overall GPA, percentage and per-term breakdown.
///
/// With a program, each term is lined up against that program's faculty
/// average and the overall figure is placed within the submitted range.
pub fn run(
    input_file: &Path,
    term: Option<&str>,
    program: Option<&str>,
    mode: ComparisonMode,
    json: bool,
    config: &Config,
) -> Result<(), String> {
    let courses = super::load_courses(input_file)?;
    let mut result = calculate_gpa(&courses, term);
    result.term_gpas = result.chronological_term_gpas();

    if let Some(t) = term {
        if result.total_credits <= 0.0 {
            warn!("No countable credits in term '{t}'");
        }
    }

    let policy = config.percentage.policy();
    let percentage = gpa_to_percentage_with(result.overall_gpa, policy);
    let peers = program
        .map(|p| peer_report(&result, p, term, mode, config))
        .transpose()?;

    if json {
        return super::print_json(&GpaReport {
            result: &result,
            percentage,
            peers,
        });
    }

    print_summary(&result, term, percentage, policy);
    if let Some(report) = &peers {
        print_peer_report(report);
    }
    Ok(())
}

fn peer_report(
    result: &GpaResult,
    program: &str,
    term: Option<&str>,
    mode: ComparisonMode,
    config: &Config,
) -> Result<PeerReport, String> {
    let store = JsonFileStore::open(&config.paths.submissions_file)
        .map_err(|e| format!("Failed to open submission store: {e}"))?;

    let stats = gpa_stats(store.submissions(), program, term);
    let position = compare_to_peers(result.overall_gpa, &stats, mode);
    if position.is_none() {
        warn!("No submissions for '{program}' to compare against");
    }
    let averages = faculty_averages(store.submissions(), program);

    Ok(PeerReport {
        program: program.to_string(),
        mode,
        position,
        terms: term_overlay(&result.term_gpas, &averages, mode),
    })
}

fn print_summary(
    result: &GpaResult,
    term: Option<&str>,
    percentage: f64,
    policy: PercentagePolicy,
) {
    let scope = term.unwrap_or(OVERALL);
    println!("\n=== GPA ({scope}) ===\n");
    println!("  GPA:        {:.2}", result.overall_gpa);
    println!("  Percentage: {percentage:.1}%");
    println!("  Credits:    {:.2}", result.total_credits);
    println!("  Courses:    {}", result.courses.len());

    if !result.term_gpas.is_empty() {
        println!("\n  {:<14} {:>5} {:>7} {:>8}", "Term", "GPA", "%", "Credits");
        for term_gpa in &result.term_gpas {
            println!(
                "  {:<14} {:>5.2} {:>7.1} {:>8.2}",
                term_gpa.term,
                term_gpa.gpa,
                gpa_to_percentage_with(term_gpa.gpa, policy),
                term_gpa.credits
            );
        }
    }
}

fn print_peer_report(report: &PeerReport) {
    println!("\n=== Compared with {} ===\n", report.program);
    if let Some(position) = &report.position {
        super::peers::print_position(position);
    }

    let (you, faculty) = match report.mode {
        ComparisonMode::Gpa => ("You", "Faculty"),
        ComparisonMode::Percentage => ("You %", "Faculty %"),
    };
    println!("\n  {:<14} {:>7} {:>9}", "Term", you, faculty);
    for row in &report.terms {
        let faculty_avg = row
            .faculty_avg
            .map_or_else(|| "-".to_string(), |avg| format!("{avg:.2}"));
        println!("  {:<14} {:>7.2} {:>9}", row.term, row.value, faculty_avg);
    }
}
