//! Per-source bias learned from resolved snapshots.
//!
//! Snapshots do not carry the rows that produced them, so every resolved
//! snapshot is paired with every row of the *current* row set. A source's bias
//! is its mean signed error `actual - forecast` over those pairs.

use std::collections::HashMap;

use crate::core::domain::{Snapshot, SourceRow};

/// Default bound on the bias applied to a forecast.
pub const DEFAULT_BIAS_CLAMP: f64 = 5.0;

/// Estimate the bias of each source.
///
/// Only snapshots with a numeric `actual` are considered. When `window > 0`
/// the first `window` of them are used (the newest, since collections are kept
/// newest first); `window == 0` means all of them. Rows without a name or
/// with a non-finite forecast are ignored.
///
/// Sources with no data are absent from the result; callers treat them as 0.
///
/// # Examples
///
/// ```
/// use bracketcast::algorithms::bias::estimate_bias;
/// use bracketcast::core::domain::SourceRow;
///
/// let rows = vec![SourceRow::new(1, "NWS", 95.0, 1.0)];
/// assert!(estimate_bias(&[], &rows, 0).is_empty());
/// ```
pub fn estimate_bias(snapshots: &[Snapshot], rows: &[SourceRow], window: usize) -> HashMap<String, f64> {
    let resolved = snapshots.iter().filter_map(Snapshot::actual_value);
    let actuals: Vec<f64> = if window > 0 {
        resolved.take(window).collect()
    } else {
        resolved.collect()
    };

    let mut sums: HashMap<&str, (f64, usize)> = HashMap::new();
    for actual in &actuals {
        for row in rows {
            let Some(key) = row.source_key() else { continue };
            if !row.forecast.is_finite() {
                continue;
            }
            let entry = sums.entry(key).or_insert((0.0, 0));
            entry.0 += actual - row.forecast;
            entry.1 += 1;
        }
    }

    let biases: HashMap<String, f64> = sums
        .into_iter()
        .map(|(key, (sum, count))| (key.to_string(), sum / count as f64))
        .collect();

    log::debug!(
        "Estimated bias for {} sources from {} resolved snapshots",
        biases.len(),
        actuals.len()
    );
    biases
}

/// Bias to add to a source's forecast, clamped to `[-clamp, clamp]`.
///
/// Missing and non-finite estimates count as 0. A NaN `clamp` falls back to
/// [`DEFAULT_BIAS_CLAMP`].
pub fn applied_bias(biases: &HashMap<String, f64>, source: &str, clamp: f64) -> f64 {
    let bias = biases.get(source.trim()).copied().unwrap_or(0.0);
    if !bias.is_finite() {
        return 0.0;
    }
    let limit = if clamp.is_nan() { DEFAULT_BIAS_CLAMP } else { clamp.abs() };
    bias.clamp(-limit, limit)
}

/// A row's applied bias and the forecast it produces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiasCorrection {
    pub bias: f64,
    pub adj_forecast: f64,
}

/// Bias-corrected forecast for each row, in row order.
///
/// Unusable rows (no source name, blank forecast) get no correction; a blank
/// forecast stays NaN.
pub fn apply_bias(rows: &[SourceRow], biases: &HashMap<String, f64>, clamp: f64) -> Vec<BiasCorrection> {
    rows.iter()
        .map(|row| {
            let bias = match row.source_key() {
                Some(key) if row.is_usable() => applied_bias(biases, key, clamp),
                _ => 0.0,
            };
            BiasCorrection {
                bias,
                adj_forecast: row.forecast + bias,
            }
        })
        .collect()
}
