//! Next-term GPA forecast
//!
//! Two estimates are blended: a recency-weighted mean of past term GPAs and a
//! least-squares line extrapolated one term ahead. The confidence band is half
//! a population standard deviation of the history on either side.

use serde::{Serialize, Serializer};

/// Highest GPA on the scale
pub const MAX_GPA: f64 = 4.0;

/// Weight of the recency-weighted estimate in the blend
const WEIGHTED_SHARE: f64 = 0.5;
/// Weight of the regression estimate in the blend
const REGRESSION_SHARE: f64 = 0.3;
/// Weight of the nudged recency-weighted estimate in the blend
const NUDGED_SHARE: f64 = 0.2;
/// Upward nudge applied to the tertiary term of the blend
const NUDGE: f64 = 0.05;
/// Band half-width as a multiple of the standard deviation
const BAND_SCALE: f64 = 0.5;

/// Why the forecast came out where it did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Explanation {
    /// The regression line sits above the weighted mean
    TrendImproving,
    /// The weighted mean dominates
    RecencyWeighted,
}

impl Explanation {
    /// User-facing message
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::TrendImproving => "Your GPA trend is improving, so the prediction leans higher.",
            Self::RecencyWeighted => "Recent terms are weighted more to keep the estimate realistic.",
        }
    }
}

impl Serialize for Explanation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.message())
    }
}

/// Forecast with a confidence band, all values rounded to two decimals
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    /// Blended forecast in `[0.0, 4.0]`
    pub prediction: f64,
    /// Lower edge of the band, at least 0
    pub low: f64,
    /// Upper edge of the band, at most 4
    pub high: f64,
    /// Which estimate drove the forecast
    pub explanation: Explanation,
}

/// Mean where the i-th GPA (1-based) has weight i. Zero for an empty slice.
#[must_use]
pub fn weighted_estimate(gpas: &[f64]) -> f64 {
    let (sum, weight_total) = gpas
        .iter()
        .zip(1u32..)
        .fold((0.0, 0.0), |(sum, total), (gpa, i)| {
            let w = f64::from(i);
            (gpa.mul_add(w, sum), total + w)
        });
    if weight_total > 0.0 {
        sum / weight_total
    } else {
        0.0
    }
}

/// Least-squares line through `(i, gpa_i)`, evaluated at `n + 1`.
///
/// With fewer than two points the single GPA is returned (zero when empty).
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn regression_estimate(gpas: &[f64]) -> f64 {
    if gpas.len() < 2 {
        return gpas.first().copied().unwrap_or(0.0);
    }

    let xs: Vec<f64> = (1u32..).take(gpas.len()).map(f64::from).collect();
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = gpas.iter().sum::<f64>() / n;

    let (numerator, denominator) = xs.iter().zip(gpas).fold((0.0, 0.0), |(num, den), (x, y)| {
        let dx = x - mean_x;
        (dx.mul_add(y - mean_y, num), dx.mul_add(dx, den))
    });

    let slope = numerator / denominator;
    let intercept = slope.mul_add(-mean_x, mean_y);
    slope.mul_add(n + 1.0, intercept)
}

/// Population standard deviation. Zero for an empty slice.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

/// `(low, high)` band around `prediction`, clipped to the GPA scale
#[must_use]
pub fn confidence_range(gpas: &[f64], prediction: f64) -> (f64, f64) {
    let half_width = population_std_dev(gpas) * BAND_SCALE;
    (
        (prediction - half_width).max(0.0),
        (prediction + half_width).min(MAX_GPA),
    )
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Forecast the next term GPA from a chronological GPA history.
///
/// Returns `None` for an empty history.
#[must_use]
pub fn predict_gpa(gpas: &[f64]) -> Option<Prediction> {
    if gpas.is_empty() {
        return None;
    }

    let weighted = weighted_estimate(gpas);
    let regression = regression_estimate(gpas);

    let blended = NUDGED_SHARE.mul_add(
        weighted + NUDGE,
        WEIGHTED_SHARE.mul_add(weighted, REGRESSION_SHARE * regression),
    );
    let prediction = blended.clamp(0.0, MAX_GPA);
    let (low, high) = confidence_range(gpas, prediction);

    let explanation = if regression > weighted {
        Explanation::TrendImproving
    } else {
        Explanation::RecencyWeighted
    };

    Some(Prediction {
        prediction: round2(prediction),
        low: round2(low),
        high: round2(high),
        explanation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_history() {
        assert!(predict_gpa(&[]).is_none());
        assert!(weighted_estimate(&[]).abs() < f64::EPSILON);
        assert!(regression_estimate(&[]).abs() < f64::EPSILON);
    }

    #[test]
    fn test_weighted_estimate_favors_recent_terms() {
        // (3.0*1 + 4.0*2) / 3
        assert!((weighted_estimate(&[3.0, 4.0]) - 11.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_regression_extrapolates_line() {
        assert!((regression_estimate(&[2.0, 2.5, 3.0]) - 3.5).abs() < 1e-9);
        assert!((regression_estimate(&[3.2]) - 3.2).abs() < 1e-9);
        assert!((regression_estimate(&[3.0, 3.0, 3.0]) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_value_has_zero_width_band() {
        let p = predict_gpa(&[3.5]).unwrap();
        assert!((p.prediction - 3.51).abs() < 1e-9);
        assert!((p.low - p.high).abs() < f64::EPSILON);
        assert!((p.low - p.prediction).abs() < f64::EPSILON);
        assert_eq!(p.explanation, Explanation::RecencyWeighted);
    }

    #[test]
    fn test_improving_trend() {
        let p = predict_gpa(&[2.0, 2.5, 3.0]).unwrap();
        // weighted = 16/6, regression = 3.5
        let weighted = 16.0 / 6.0;
        let expected = 0.5 * weighted + 0.3 * 3.5 + 0.2 * (weighted + 0.05);
        assert!((p.prediction - round2(expected)).abs() < 1e-9);
        assert_eq!(p.explanation, Explanation::TrendImproving);
        assert!(p.low < p.prediction && p.prediction < p.high);
    }

    #[test]
    fn test_clamped_to_scale() {
        let p = predict_gpa(&[3.0, 3.5, 4.0]).unwrap();
        assert!(p.prediction <= MAX_GPA);
        assert!(p.high <= MAX_GPA);

        let p = predict_gpa(&[1.0, 0.5, 0.0]).unwrap();
        assert!(p.prediction >= 0.0);
        assert!(p.low >= 0.0);
    }

    #[test]
    fn test_population_std_dev() {
        assert!((population_std_dev(&[2.0, 4.0]) - 1.0).abs() < 1e-9);
        assert!(population_std_dev(&[]).abs() < f64::EPSILON);
    }

    #[test]
    fn test_explanation_serializes_as_message() {
        let p = predict_gpa(&[3.0]).unwrap();
        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains("Recent terms are weighted more"));
    }
}
