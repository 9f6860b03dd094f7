//! Accuracy of saved distributions against realized outcomes.
//!
//! A snapshot counts as correct when the bracket it gave the highest
//! probability contains the attached `actual`.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::algorithms::brackets::bracket_contains_actual;
use crate::core::domain::Snapshot;

/// Aggregate hit rate over all scorable snapshots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccuracySummary {
    pub correct: usize,
    pub total: usize,
    /// `correct / total * 100`, or 0 when nothing is scorable.
    pub percent: f64,
}

/// One point of the cumulative accuracy curve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    /// Display timestamp, `YYYY-MM-DD HH:MM` (UTC).
    pub t: String,
    pub saved_at: DateTime<Utc>,
    /// Cumulative accuracy in percent, rounded to one decimal.
    pub acc: f64,
}

/// Index of the largest probability; the first occurrence wins on ties.
///
/// Returns `None` for an empty slice. NaN entries never win.
///
/// # Examples
///
/// ```
/// use bracketcast::algorithms::accuracy::argmax_first;
///
/// assert_eq!(argmax_first(&[0.1, 0.6, 0.3]), Some(1));
/// assert_eq!(argmax_first(&[0.4, 0.2, 0.4]), Some(0));
/// assert_eq!(argmax_first(&[]), None);
/// ```
pub fn argmax_first(probs: &[f64]) -> Option<usize> {
    if probs.is_empty() {
        return None;
    }
    let mut best = 0;
    for (idx, &p) in probs.iter().enumerate().skip(1) {
        // strict comparison keeps the earliest index on ties
        if p > probs[best] || (probs[best].is_nan() && !p.is_nan()) {
            best = idx;
        }
    }
    Some(best)
}

fn is_scorable(snapshot: &Snapshot) -> bool {
    snapshot.has_actual() && !snapshot.probs.is_empty() && !snapshot.scheme.is_empty()
}

fn is_correct(snapshot: &Snapshot) -> bool {
    match (argmax_first(&snapshot.probs), snapshot.actual_value()) {
        (Some(idx), Some(actual)) => bracket_contains_actual(&snapshot.scheme, idx, actual),
        _ => false,
    }
}

/// Share of resolved snapshots whose most likely bracket held the outcome.
pub fn accuracy_summary(snapshots: &[Snapshot]) -> AccuracySummary {
    let scored: Vec<bool> = snapshots
        .iter()
        .filter(|s| is_scorable(s))
        .map(is_correct)
        .collect();

    let total = scored.len();
    let correct = scored.iter().filter(|hit| **hit).count();
    let percent = if total > 0 {
        correct as f64 / total as f64 * 100.0
    } else {
        0.0
    };

    AccuracySummary {
        correct,
        total,
        percent,
    }
}

/// Cumulative accuracy over time.
///
/// Scorable snapshots are walked in ascending `saved_at` order; each step
/// emits the running percentage of correct calls so far. The denominator only
/// grows, so this is not a sliding window.
pub fn accuracy_trend(snapshots: &[Snapshot]) -> Vec<TrendPoint> {
    let mut scorable: Vec<&Snapshot> = snapshots.iter().filter(|s| is_scorable(s)).collect();
    scorable.sort_by_key(|s| s.saved_at);

    let mut correct = 0usize;
    scorable
        .into_iter()
        .enumerate()
        .map(|(idx, snapshot)| {
            if is_correct(snapshot) {
                correct += 1;
            }
            let pct = correct as f64 / (idx + 1) as f64 * 100.0;
            TrendPoint {
                t: snapshot.saved_at.format("%Y-%m-%d %H:%M").to_string(),
                saved_at: snapshot.saved_at,
                acc: (pct * 10.0).round() / 10.0,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::{Bracket, BracketScheme, SnapshotId, WeightMode};
    use chrono::TimeZone;

    fn scheme() -> BracketScheme {
        BracketScheme::new(vec![
            Bracket::new("<=91", 91.0),
            Bracket::new("92-93", 93.0),
            Bracket::unbounded("94+"),
        ])
    }

    fn snap(day: u32, probs: Vec<f64>, actual: Option<f64>) -> Snapshot {
        Snapshot {
            id: SnapshotId(format!("snap-{}", day)),
            saved_at: Utc.with_ymd_and_hms(2024, 7, day, 15, 30, 0).unwrap(),
            name: format!("day {}", day),
            scheme: scheme(),
            probs,
            weight_mode: WeightMode::Manual,
            actual,
        }
    }

    #[test]
    fn test_argmax_ties_and_nan() {
        assert_eq!(argmax_first(&[0.3, 0.3, 0.3]), Some(0));
        assert_eq!(argmax_first(&[f64::NAN, 0.2, 0.5]), Some(2));
        assert_eq!(argmax_first(&[f64::NAN]), Some(0));
    }

    #[test]
    fn test_upper_boundary_actual_is_correct() {
        let s = snap(1, vec![0.1, 0.6, 0.3], Some(93.0));
        let summary = accuracy_summary(&[s]);
        assert_eq!(summary.correct, 1);
        assert_eq!(summary.total, 1);
        assert_eq!(summary.percent, 100.0);
    }

    #[test]
    fn test_summary_skips_unscorable() {
        let mut empty_scheme = snap(4, vec![1.0], Some(90.0));
        empty_scheme.scheme = BracketScheme::default();
        let snaps = vec![
            snap(1, vec![0.1, 0.6, 0.3], Some(95.0)),
            snap(2, vec![0.7, 0.2, 0.1], Some(88.0)),
            snap(3, vec![0.7, 0.2, 0.1], None),
            snap(5, vec![], Some(90.0)),
            empty_scheme,
        ];
        let summary = accuracy_summary(&snaps);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.correct, 1);
        assert_eq!(summary.percent, 50.0);
    }

    #[test]
    fn test_summary_of_nothing_is_zero() {
        let summary = accuracy_summary(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.percent, 0.0);
    }

    #[test]
    fn test_trend_is_cumulative_and_chronological() {
        // Stored newest first, as the collection is kept.
        let snaps = vec![
            snap(4, vec![0.1, 0.8, 0.1], Some(92.0)),
            snap(3, vec![0.1, 0.8, 0.1], Some(99.0)),
            snap(2, vec![0.8, 0.1, 0.1], Some(85.0)),
            snap(1, vec![0.8, 0.1, 0.1], Some(99.0)),
        ];
        let trend = accuracy_trend(&snaps);
        let accs: Vec<f64> = trend.iter().map(|p| p.acc).collect();
        assert_eq!(accs, vec![0.0, 50.0, 33.3, 50.0]);
        assert_eq!(trend[0].t, "2024-07-01 15:30");
        assert_eq!(trend[3].t, "2024-07-04 15:30");
    }
}
