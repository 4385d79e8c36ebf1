//! Numeric statistics over salary observations.
//!
//! Every statistic is `Option<f64>`: `None` means "unavailable" (empty input)
//! and serializes as `null`. No NaN or infinity ever leaves this module.

use serde::{Deserialize, Serialize};

/// Descriptive statistics for a numeric sequence. `mean` is unrounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
}

/// Parses a numeric field from free text.
///
/// Trims whitespace and strips thousands separators (`,`). Empty input,
/// garbage, and non-finite results (`"inf"`, `"NaN"`) are all `None`.
pub fn parse_numeric(raw: &str) -> Option<f64> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Arithmetic mean. Falls back to summing pre-divided values when the plain
/// sum overflows, so any finite input yields a finite mean.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let sum: f64 = values.iter().sum();
    if sum.is_finite() {
        Some(sum / n)
    } else {
        Some(values.iter().map(|v| v / n).sum())
    }
}

/// Median with numeric ordering. Even-length input averages the two central values.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some(sorted[mid - 1] / 2.0 + sorted[mid] / 2.0)
    }
}

pub fn min(values: &[f64]) -> Option<f64> {
    values.iter().copied().min_by(f64::total_cmp)
}

pub fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().max_by(f64::total_cmp)
}

pub fn summarize(values: &[f64]) -> Summary {
    Summary {
        min: min(values),
        max: max(values),
        mean: mean(values),
        median: median(values),
    }
}
