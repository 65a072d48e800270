//! Peers command handler

use crate::args::PeersSubcommand;
use grade_lens::config::Config;
use grade_lens::core::gpa::OVERALL;
use grade_lens::core::models::normalize_code;
use grade_lens::core::peers::{
    compare_to_peers, course_averages, faculty_averages, gpa_stats, submission_count,
    ComparisonMode, JsonFileStore, PeerPosition, SubmissionStore,
};
use grade_lens::warn;
use serde_json::json;

/// Dispatch peers subcommands against the configured submission store
pub fn run(subcommand: PeersSubcommand, json: bool, config: &Config) -> Result<(), String> {
    let store = JsonFileStore::open(&config.paths.submissions_file)
        .map_err(|e| format!("Failed to open submission store: {e}"))?;

    match subcommand {
        PeersSubcommand::Faculty { program } => {
            let averages = faculty_averages(store.submissions(), &program);
            if json {
                return super::print_json(&averages);
            }
            if averages.is_empty() {
                println!("No submissions for '{program}' yet");
                return Ok(());
            }
            println!("\n=== {program} ===\n");
            println!("  {:<14} {:>7} {:>8}", "Term", "Avg GPA", "Samples");
            for avg in &averages {
                println!(
                    "  {:<14} {:>7.2} {:>8}",
                    avg.term, avg.avg_gpa, avg.sample_size
                );
            }
        }
        PeersSubcommand::Courses { codes } => {
            let codes: Vec<String> = codes
                .iter()
                .map(|c| normalize_code(&c.to_uppercase()))
                .collect();
            let averages = course_averages(store.course_grades(), &codes);
            if json {
                return super::print_json(&averages);
            }
            if averages.is_empty() {
                println!("No grades recorded for {}", codes.join(", "));
                return Ok(());
            }
            println!("  {:<10} {:>7} {:>5} {:>8}", "Course", "Avg GPA", "%", "Samples");
            for avg in &averages {
                println!(
                    "  {:<10} {:>7.2} {:>5.0} {:>8}",
                    avg.course_code, avg.avg_gpa, avg.avg_percentage, avg.sample_size
                );
            }
        }
        PeersSubcommand::Stats {
            program,
            term,
            gpa,
            mode,
        } => {
            let stats = gpa_stats(store.submissions(), &program, term.as_deref());
            let mode = ComparisonMode::from(mode);
            let position = gpa.and_then(|g| compare_to_peers(g, &stats, mode));
            if gpa.is_some() && position.is_none() {
                warn!("No submissions for '{program}' to compare against");
            }
            if json {
                return super::print_json(&json!({ "stats": stats, "position": position }));
            }
            let scope = term.as_deref().unwrap_or(OVERALL);
            println!("\n=== {program} ({scope}) ===\n");
            println!("  Submissions: {}", stats.count);
            println!(
                "  GPA:         avg {:.2}  min {:.2}  max {:.2}",
                stats.avg_gpa, stats.min_gpa, stats.max_gpa
            );
            println!(
                "  Percentage:  avg {:.0}  min {:.0}  max {:.0}",
                stats.avg_percentage, stats.min_percentage, stats.max_percentage
            );
            if let Some(position) = position {
                print_position(&position);
            }
        }
        PeersSubcommand::Count => {
            let count = submission_count(&store);
            if json {
                return super::print_json(&json!({ "count": count }));
            }
            println!("{count} results shared so far");
        }
    }
    Ok(())
}

/// Print a peer placement line
pub fn print_position(position: &PeerPosition) {
    println!(
        "  Position:    {:.0}/100 ({})",
        position.percentile, position.level
    );
}
