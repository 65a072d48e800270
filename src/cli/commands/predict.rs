//! Predict command handler

use grade_lens::core::gpa::calculate_gpa;
use grade_lens::core::predict::predict_gpa;
use grade_lens::{debug, verbose};
use std::path::Path;

/// Run the predict command on explicit GPAs or on a transcript's term GPAs.
pub fn run(gpas: &[f64], from: Option<&Path>, json: bool) -> Result<(), String> {
    let history = match from {
        Some(path) => calculate_gpa(&super::load_courses(path)?, None).gpa_history(),
        None => gpas.to_vec(),
    };
    debug!("Prediction history: {history:?}");
    verbose!("Using {} term GPAs", history.len());

    let prediction = predict_gpa(&history)
        .ok_or_else(|| "Need at least one term GPA to make a prediction".to_string())?;

    if json {
        return super::print_json(&prediction);
    }

    println!("Predicted next-term GPA: {:.2}", prediction.prediction);
    println!("Likely range:            {:.2} - {:.2}", prediction.low, prediction.high);
    println!("{}", prediction.explanation.message());
    Ok(())
}
