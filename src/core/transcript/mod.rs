//! Transcript text parsing
//!
//! Input is the line-oriented text produced by an external PDF-to-text step.

pub mod parser;

use crate::core::models::{compare_term_labels, Course};
use thiserror::Error;

pub use parser::{parse_transcript_text, END_MARKER};

/// Shortest text accepted by [`process_transcript`], in characters
pub const MIN_TRANSCRIPT_CHARS: usize = 100;

/// Transcript parsing failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranscriptError {
    /// The scan finished without a single countable course
    #[error("No courses found in transcript. Please ensure you uploaded your complete unofficial transcript.")]
    NoCourses,

    /// Text is too short to be a transcript
    #[error("Transcript text is too short ({len} characters). Please ensure you uploaded a complete transcript.")]
    TooShort {
        /// Character count of the rejected text
        len: usize,
    },
}

/// Upload-step entry point: rejects obviously truncated text, then parses.
///
/// # Errors
/// [`TranscriptError::TooShort`] for text under [`MIN_TRANSCRIPT_CHARS`]
/// characters, otherwise whatever [`parse_transcript_text`] returns.
pub fn process_transcript(text: &str) -> Result<Vec<Course>, TranscriptError> {
    let len = text.chars().count();
    if len < MIN_TRANSCRIPT_CHARS {
        return Err(TranscriptError::TooShort { len });
    }
    parse_transcript_text(text)
}

/// Distinct non-empty terms, oldest first
#[must_use]
pub fn unique_terms(courses: &[Course]) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for course in courses {
        if !course.term.is_empty() && !terms.contains(&course.term) {
            terms.push(course.term.clone());
        }
    }
    terms.sort_by(|a, b| compare_term_labels(a, b));
    terms
}
