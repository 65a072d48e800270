//! Where a student sits relative to peer submissions

use super::{GpaStats, TermAverage};
use crate::core::gpa::{sort_term_gpas, TermGpa};
use crate::core::percentage::gpa_to_percentage;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scale a comparison is made on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonMode {
    /// 4.0 grade point scale
    #[default]
    Gpa,
    /// Estimated percentage, unrounded
    Percentage,
}

impl ComparisonMode {
    /// Express a GPA on this scale
    #[must_use]
    pub fn value_of(self, gpa: f64) -> f64 {
        match self {
            Self::Gpa => gpa,
            Self::Percentage => gpa_to_percentage(gpa),
        }
    }
}

/// Performance tier derived from a percentile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PerformanceLevel {
    /// 90 and up
    Exceptional,
    /// 75 to 90
    AboveAverage,
    /// 50 to 75
    Average,
    /// 25 to 50
    BelowAverage,
    /// Under 25
    NeedsImprovement,
}

impl PerformanceLevel {
    /// Tier for a percentile in `[0, 100]`
    #[must_use]
    pub fn from_percentile(percentile: f64) -> Self {
        if percentile >= 90.0 {
            Self::Exceptional
        } else if percentile >= 75.0 {
            Self::AboveAverage
        } else if percentile >= 50.0 {
            Self::Average
        } else if percentile >= 25.0 {
            Self::BelowAverage
        } else {
            Self::NeedsImprovement
        }
    }
}

impl fmt::Display for PerformanceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Exceptional => "Exceptional",
            Self::AboveAverage => "Above Average",
            Self::Average => "Average",
            Self::BelowAverage => "Below Average",
            Self::NeedsImprovement => "Needs Improvement",
        };
        f.write_str(text)
    }
}

/// A student's position within the peer range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeerPosition {
    /// Position between the lowest (0) and highest (100) submission
    pub percentile: f64,
    /// Tier for the percentile
    pub level: PerformanceLevel,
}

/// Place `gpa` within the min..max range of `stats`.
///
/// The percentile is linear in the range and clamped to `[0, 100]`. When every
/// submission has the same value the range is empty: a value above it is 100,
/// below it 0, and equal to it 50. Returns `None` when there are no submissions.
#[must_use]
pub fn compare_to_peers(gpa: f64, stats: &GpaStats, mode: ComparisonMode) -> Option<PeerPosition> {
    if stats.count == 0 {
        return None;
    }

    let (min, max) = match mode {
        ComparisonMode::Gpa => (stats.min_gpa, stats.max_gpa),
        ComparisonMode::Percentage => (stats.min_percentage, stats.max_percentage),
    };
    let value = mode.value_of(gpa);

    let percentile = if max - min > f64::EPSILON {
        ((value - min) / (max - min) * 100.0).clamp(0.0, 100.0)
    } else if value > max {
        100.0
    } else if value < min {
        0.0
    } else {
        50.0
    };

    Some(PeerPosition {
        percentile,
        level: PerformanceLevel::from_percentile(percentile),
    })
}

/// One term of a student's history next to the program average
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermComparison {
    /// Term label
    pub term: String,
    /// Student's value for the term
    pub value: f64,
    /// Program average for the term, if anyone submitted it
    pub faculty_avg: Option<f64>,
}

/// Pair each term GPA with the faculty average of the same term, oldest first
#[must_use]
pub fn term_overlay(
    term_gpas: &[TermGpa],
    averages: &[TermAverage],
    mode: ComparisonMode,
) -> Vec<TermComparison> {
    let mut terms = term_gpas.to_vec();
    sort_term_gpas(&mut terms);

    terms
        .into_iter()
        .map(|t| TermComparison {
            faculty_avg: averages
                .iter()
                .find(|avg| avg.term == t.term)
                .map(|avg| mode.value_of(avg.avg_gpa)),
            value: mode.value_of(t.gpa),
            term: t.term,
        })
        .collect()
}
