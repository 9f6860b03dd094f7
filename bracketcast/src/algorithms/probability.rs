//! Soft bracket assignment with neighbour bleed.
//!
//! Each row puts `(1 - bleed)` of its normalized weight into the bracket that
//! holds its adjusted forecast and spreads the remaining `bleed` share over the
//! immediate neighbours. Point forecasts understate uncertainty near bracket
//! edges; the bleed acts as a crude smoothing kernel.

use crate::algorithms::brackets::{clamp_index, find_bracket};
use crate::core::domain::{AdjustedRow, BracketScheme};

/// Default fraction of weight spread to neighbouring brackets.
pub const DEFAULT_BLEED: f64 = 0.3;

/// Compute the probability mass per bracket.
///
/// The output has one entry per bracket. Its sum equals the total `n_weight`
/// of the rows that resolve to a bracket, so it sums to 1 when the weights are
/// normalized and every forecast falls inside the scheme.
///
/// Rows with a non-finite adjusted forecast, or one above a finite last
/// threshold, contribute nothing.
///
/// # Examples
///
/// ```
/// use bracketcast::algorithms::probability::{compute_distribution, DEFAULT_BLEED};
/// use bracketcast::core::domain::{AdjustedRow, BracketScheme};
///
/// let scheme = BracketScheme::from_pairs(&[("<=91", 91.0), ("92-93", 93.0), ("94-95", 95.0)]);
/// let row = AdjustedRow {
///     id: 1,
///     source: "NWS".into(),
///     forecast: 92.5,
///     bias: 0.0,
///     adj_forecast: 92.5,
///     weight: 1.0,
///     n_weight: 1.0,
/// };
/// let probs = compute_distribution(&[row], &scheme, DEFAULT_BLEED);
/// assert!((probs[0] - 0.15).abs() < 1e-12);
/// assert!((probs[1] - 0.70).abs() < 1e-12);
/// assert!((probs[2] - 0.15).abs() < 1e-12);
/// ```
pub fn compute_distribution(rows: &[AdjustedRow], scheme: &BracketScheme, bleed: f64) -> Vec<f64> {
    let n = scheme.len();
    let mut probs = vec![0.0; n];
    if n == 0 {
        return probs;
    }
    let bleed = if bleed.is_nan() { DEFAULT_BLEED } else { bleed.clamp(0.0, 1.0) };

    for row in rows {
        if !row.adj_forecast.is_finite() {
            continue;
        }
        let Some(b) = find_bracket(scheme, row.adj_forecast) else {
            log::debug!(
                "Forecast {} from '{}' is above every bracket; skipped",
                row.adj_forecast,
                row.source
            );
            continue;
        };
        let w = row.n_weight;
        let b = clamp_index(b, n);

        probs[b] += (1.0 - bleed) * w;

        let share = bleed * w;
        let left = b.checked_sub(1);
        let right = (b + 1 < n).then_some(b + 1);
        match (left, right) {
            (Some(l), Some(r)) => {
                probs[l] += share / 2.0;
                probs[r] += share / 2.0;
            }
            (Some(l), None) => probs[l] += share,
            (None, Some(r)) => probs[r] += share,
            (None, None) => probs[b] += share,
        }
    }

    probs
}
