//! GPA to percentage estimate
//!
//! The mapping is linear, `gpa / 4.0 * 90 + 10`, capped at 100. Call sites
//! disagree on rounding, so each one passes a [`PercentagePolicy`].

use serde::{Deserialize, Serialize};

/// Rounding and display floor applied after the linear map
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentagePolicy {
    /// Round to the nearest whole percent
    pub round: bool,
    /// Lowest value returned, if any
    pub floor: Option<f64>,
}

impl PercentagePolicy {
    /// Unrounded, no floor
    pub const EXACT: Self = Self {
        round: false,
        floor: None,
    };

    /// Whole percent, no floor; used for peer statistics and course averages
    pub const ROUNDED: Self = Self {
        round: true,
        floor: None,
    };

    /// Same rounding with a display floor
    #[must_use]
    pub const fn with_floor(self, floor: f64) -> Self {
        Self {
            floor: Some(floor),
            ..self
        }
    }
}

impl Default for PercentagePolicy {
    fn default() -> Self {
        Self::EXACT
    }
}

/// Linear GPA to percentage map, capped at 100
#[must_use]
pub fn gpa_to_percentage(gpa: f64) -> f64 {
    (gpa / 4.0).mul_add(90.0, 10.0).min(100.0)
}

/// [`gpa_to_percentage`] followed by the policy's rounding and floor
#[must_use]
pub fn gpa_to_percentage_with(gpa: f64, policy: PercentagePolicy) -> f64 {
    let pct = gpa_to_percentage(gpa);
    let pct = if policy.round { pct.round() } else { pct };
    policy.floor.map_or(pct, |floor| pct.max(floor))
}
