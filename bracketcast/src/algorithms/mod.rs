//! Forecast algorithms and calibration statistics.
//!
//! This module provides the numeric core: bracket assignment, the soft-bleed
//! probability engine, bias and weight estimation from resolved snapshots,
//! prior blending, and accuracy scoring. Every function is pure and returns a
//! best-effort value for missing or invalid input.
//!
//! # Components
//!
//! - [`brackets`]: Value to bracket mapping
//! - [`probability`]: Soft assignment with neighbour bleed
//! - [`bias`]: Per-source mean signed error
//! - [`weights`]: Source accuracy stats, auto-weights, weight normalization
//! - [`prior`]: Blending with a saved distribution
//! - [`accuracy`]: Aggregate and cumulative accuracy of saved distributions
//!
//! # Example
//!
//! ```
//! use bracketcast::algorithms::{compute_distribution, resolve_weights, DEFAULT_BLEED};
//! use bracketcast::core::domain::{BracketScheme, SourceRow};
//! use std::collections::HashMap;
//!
//! let scheme = BracketScheme::from_pairs(&[("<=91", 91.0), ("92-93", 93.0), ("94-95", 95.0)]);
//! let rows = vec![SourceRow::new(1, "NWS", 92.0, 1.0)];
//! let adjusted = resolve_weights(&rows, &HashMap::new(), 5.0, None);
//! let probs = compute_distribution(&adjusted, &scheme, DEFAULT_BLEED);
//! assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-12);
//! ```

pub mod accuracy;
pub mod bias;
pub mod brackets;
pub mod prior;
pub mod probability;
pub mod weights;

pub use accuracy::{accuracy_summary, accuracy_trend, argmax_first, AccuracySummary, TrendPoint};
pub use bias::{apply_bias, applied_bias, estimate_bias, BiasCorrection, DEFAULT_BIAS_CLAMP};
pub use brackets::{bracket_contains_actual, clamp_index, find_bracket, lower_bound};
pub use prior::{blend_with_prior, BlendOutcome, DEFAULT_PRIOR_WEIGHT};
pub use probability::{compute_distribution, DEFAULT_BLEED};
pub use weights::{
    auto_weights, resolve_weights, source_stats, SourceStats, DEFAULT_AUTO_WEIGHT_EPSILON,
};
