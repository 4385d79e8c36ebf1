//! Equal-width histogram bucketing for salary distributions.
//!
//! Policy for empty input: `bucketize` returns an empty sequence. Callers that
//! need placeholder bins for rendering build them themselves.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::analytics::numeric;

pub const CURRENCY_SYMBOL: &str = "₹";

/// One bin of a histogram. All bins but the last are half-open `[lower, upper)`;
/// the last is closed so that it holds the maximum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub label: String,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub count: usize,
}

/// Partitions `values` into `bucket_count` equal-width bins spanning `[min, max]`.
///
/// When every value is identical the range falls back to `1.0`, so all values
/// land in bucket 0 instead of dividing by zero.
pub fn bucketize(values: &[f64], bucket_count: NonZeroUsize) -> Vec<Bucket> {
    let (Some(min), Some(max)) = (numeric::min(values), numeric::max(values)) else {
        return Vec::new();
    };

    let n = bucket_count.get();
    // Work in halves so that `max - min` cannot overflow for extreme inputs.
    let half_range = if max > min { max / 2.0 - min / 2.0 } else { 0.5 };
    let half_width = half_range / n as f64;
    let top = if max > min { max } else { min + 1.0 };

    let mut buckets: Vec<Bucket> = (0..n)
        .map(|i| {
            let lower = 2.0 * (min / 2.0 + i as f64 * half_width);
            let upper = if i == n - 1 {
                top
            } else {
                2.0 * (min / 2.0 + (i + 1) as f64 * half_width)
            };
            Bucket {
                label: format!("{} - {}", format_currency(lower), format_currency(upper)),
                lower_bound: lower,
                upper_bound: upper,
                count: 0,
            }
        })
        .collect();

    for &value in values {
        let idx = (((value / 2.0 - min / 2.0) / half_width).floor() as usize).min(n - 1);
        buckets[idx].count += 1;
    }

    buckets
}

/// Rounds to the nearest whole unit and renders with thousands separators: `₹1,250,000`.
pub fn format_currency(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded < 0 { "-" } else { "" };
    format!("{sign}{CURRENCY_SYMBOL}{grouped}")
}
