//! Source accuracy statistics and weight resolution.
//!
//! Weights are either the manual ones entered per row or "auto" weights
//! derived from each source's historical mean absolute error. Either way they
//! are normalized so the usable rows sum to 1 before reaching the engine.

use serde::Serialize;
use std::collections::HashMap;

use crate::algorithms::bias::apply_bias;
use crate::core::domain::{AdjustedRow, Snapshot, SourceRow};

/// Default smoothing term in the auto-weight score `1 / (mae + epsilon)`.
pub const DEFAULT_AUTO_WEIGHT_EPSILON: f64 = 0.5;

/// Historical accuracy of one source.
///
/// # Fields
///
/// * `source` - Trimmed source name
/// * `n` - Number of (snapshot, row) pairs scored
/// * `mae` - Mean absolute error
/// * `p1`, `p2`, `p3` - Percentage of errors within 1, 2 and 3 units
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceStats {
    pub source: String,
    pub n: usize,
    pub mae: f64,
    pub p1: f64,
    pub p2: f64,
    pub p3: f64,
}

/// Score every source of the current row set against resolved snapshots.
///
/// Each snapshot with a numeric `actual` is paired with each usable row. The
/// result is sorted by ascending `mae`, so the best source comes first.
pub fn source_stats(snapshots: &[Snapshot], rows: &[SourceRow]) -> Vec<SourceStats> {
    let mut errors: HashMap<&str, Vec<f64>> = HashMap::new();

    for actual in snapshots.iter().filter_map(Snapshot::actual_value) {
        for row in rows {
            let Some(key) = row.source_key() else { continue };
            if !row.forecast.is_finite() {
                continue;
            }
            errors.entry(key).or_default().push((actual - row.forecast).abs());
        }
    }

    let mut stats: Vec<SourceStats> = errors
        .into_iter()
        .map(|(source, errs)| {
            let n = errs.len();
            let pct = |limit: f64| errs.iter().filter(|e| **e <= limit).count() as f64 / n as f64 * 100.0;
            SourceStats {
                source: source.to_string(),
                n,
                mae: errs.iter().sum::<f64>() / n as f64,
                p1: pct(1.0),
                p2: pct(2.0),
                p3: pct(3.0),
            }
        })
        .collect();

    stats.sort_by(|a, b| {
        a.mae
            .partial_cmp(&b.mae)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.source.cmp(&b.source))
    });
    stats
}

/// Inverse-error weights per source, normalized to sum to 1.
///
/// Returns `None` (use manual weights) when disabled, when there are no
/// stats, or when the scores do not sum to a positive finite number.
///
/// # Examples
///
/// ```
/// use bracketcast::algorithms::weights::{auto_weights, SourceStats};
///
/// let stats = vec![
///     SourceStats { source: "A".into(), n: 4, mae: 0.0, p1: 100.0, p2: 100.0, p3: 100.0 },
///     SourceStats { source: "B".into(), n: 4, mae: 1.5, p1: 50.0, p2: 75.0, p3: 100.0 },
/// ];
/// let weights = auto_weights(&stats, true, 0.5).unwrap();
/// assert!((weights["A"] - 0.8333).abs() < 1e-4);
/// assert!((weights["B"] - 0.1667).abs() < 1e-4);
/// ```
pub fn auto_weights(stats: &[SourceStats], enabled: bool, epsilon: f64) -> Option<HashMap<String, f64>> {
    if !enabled || stats.is_empty() {
        return None;
    }

    let scores: Vec<(&str, f64)> = stats
        .iter()
        .map(|s| (s.source.as_str(), 1.0 / (s.mae + epsilon)))
        .collect();
    let total: f64 = scores.iter().map(|(_, score)| score).sum();
    if !total.is_finite() || total <= 0.0 {
        log::warn!("Auto-weight scores sum to {}; falling back to manual weights", total);
        return None;
    }

    Some(
        scores
            .into_iter()
            .map(|(source, score)| (source.to_string(), score / total))
            .collect(),
    )
}

/// Apply bias corrections and weights to the live rows.
///
/// Each row gets its clamped bias added to its forecast. Its raw weight is
/// the auto weight for its source when `auto` is given (0 for sources with no
/// history), otherwise its manual weight. Unusable rows, and rows whose weight
/// is negative or non-finite, get weight 0. Weights are then divided by their
/// sum; if that sum is 0 the usable rows share equal weight.
pub fn resolve_weights(
    rows: &[SourceRow],
    biases: &HashMap<String, f64>,
    bias_clamp: f64,
    auto: Option<&HashMap<String, f64>>,
) -> Vec<AdjustedRow> {
    let corrections = apply_bias(rows, biases, bias_clamp);
    let mut adjusted: Vec<AdjustedRow> = rows
        .iter()
        .zip(corrections)
        .map(|(row, correction)| {
            let usable = row.is_usable();
            let raw = match auto {
                Some(map) => map.get(row.source.trim()).copied().unwrap_or(0.0),
                None => row.weight,
            };
            let weight = if usable && raw.is_finite() && raw > 0.0 { raw } else { 0.0 };

            AdjustedRow {
                id: row.id,
                source: row.source.trim().to_string(),
                forecast: row.forecast,
                bias: correction.bias,
                adj_forecast: correction.adj_forecast,
                weight,
                n_weight: 0.0,
            }
        })
        .collect();

    let total: f64 = adjusted.iter().map(|r| r.weight).sum();
    if total > 0.0 && total.is_finite() {
        for row in &mut adjusted {
            row.n_weight = row.weight / total;
        }
    } else {
        let usable: Vec<bool> = rows.iter().map(SourceRow::is_usable).collect();
        let count = usable.iter().filter(|u| **u).count();
        if count > 0 {
            log::debug!("All weights are zero; spreading evenly over {} rows", count);
            for (row, ok) in adjusted.iter_mut().zip(usable) {
                if ok {
                    row.n_weight = 1.0 / count as f64;
                }
            }
        }
    }

    adjusted
}
