//! Blending a fresh distribution with a previously saved one.

use crate::core::domain::{BracketScheme, Snapshot, SnapshotId};

/// Default share of the blend taken from the prior.
pub const DEFAULT_PRIOR_WEIGHT: f64 = 0.5;

/// Result of a prior blend.
#[derive(Debug, Clone, PartialEq)]
pub struct BlendOutcome {
    pub probs: Vec<f64>,
    /// False when the fresh distribution was returned untouched.
    pub applied: bool,
}

impl BlendOutcome {
    fn unchanged(fresh: &[f64]) -> Self {
        Self {
            probs: fresh.to_vec(),
            applied: false,
        }
    }
}

/// Mix `fresh` with the distribution of the snapshot `prior_id`.
///
/// The fresh distribution is returned as-is when blending is disabled, no id
/// is given, the snapshot does not exist, or its scheme differs from `scheme`
/// in length or labels. Otherwise the result is
/// `(1 - prior_weight) * fresh + prior_weight * prior`, re-normalized to sum to 1.
pub fn blend_with_prior(
    enabled: bool,
    prior_id: Option<&SnapshotId>,
    fresh: &[f64],
    snapshots: &[Snapshot],
    scheme: &BracketScheme,
    prior_weight: f64,
) -> BlendOutcome {
    if !enabled {
        return BlendOutcome::unchanged(fresh);
    }
    let Some(prior_id) = prior_id else {
        return BlendOutcome::unchanged(fresh);
    };
    let Some(prior) = snapshots.iter().find(|s| &s.id == prior_id) else {
        log::debug!("Prior snapshot {} not found; using fresh distribution", prior_id);
        return BlendOutcome::unchanged(fresh);
    };
    if !prior.scheme.labels_match(scheme) || prior.probs.len() != fresh.len() {
        log::debug!(
            "Prior snapshot {} uses a different bracket scheme; ignored",
            prior_id
        );
        return BlendOutcome::unchanged(fresh);
    }

    let mixed: Vec<f64> = fresh
        .iter()
        .zip(&prior.probs)
        .map(|(f, p)| (1.0 - prior_weight) * f + prior_weight * p)
        .collect();
    let sum: f64 = mixed.iter().sum();
    let divisor = if sum != 0.0 { sum } else { 1.0 };

    BlendOutcome {
        probs: mixed.into_iter().map(|v| v / divisor).collect(),
        applied: true,
    }
}
