//! Forecast pipeline orchestration.
//!
//! Runs the full computation for one row set: bias estimation, weight
//! resolution, the probability engine, and the optional prior blend. The
//! caller owns every input; nothing here touches storage.

use serde::Serialize;
use std::collections::HashMap;

use crate::algorithms::{
    accuracy_summary, accuracy_trend, auto_weights, blend_with_prior, compute_distribution,
    estimate_bias, resolve_weights, source_stats, AccuracySummary, SourceStats, TrendPoint,
};
use crate::config::EngineConfig;
use crate::core::domain::{AdjustedRow, BracketScheme, Snapshot, SnapshotId, SourceRow, WeightMode};

/// User-facing switches for a forecast run.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastOptions {
    /// Correct forecasts by each source's learned bias.
    pub apply_bias: bool,
    /// Derive weights from historical error instead of the manual weights.
    pub auto_weights: bool,
    /// Blend the result with the snapshot named by `prior_id`.
    pub use_prior: bool,
    pub prior_id: Option<SnapshotId>,
}

impl Default for ForecastOptions {
    fn default() -> Self {
        Self {
            apply_bias: true,
            auto_weights: false,
            use_prior: false,
            prior_id: None,
        }
    }
}

/// Everything a forecast run produced, for display and for saving.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastReport {
    pub rows: Vec<AdjustedRow>,
    pub biases: HashMap<String, f64>,
    pub auto_weights: Option<HashMap<String, f64>>,
    /// `Auto` only when auto-weights were requested *and* available.
    pub weight_mode: WeightMode,
    /// Distribution straight from the engine.
    pub raw: Vec<f64>,
    /// Distribution after the optional prior blend.
    pub probs: Vec<f64>,
    pub prior_applied: bool,
}

/// Compute the bracket distribution for the live rows.
///
/// # Arguments
/// * `rows` - Live forecast rows
/// * `scheme` - Current bracket scheme
/// * `snapshots` - Saved history (newest first), read only
/// * `options` - Bias/auto-weight/prior switches
/// * `config` - Engine constants
pub fn run_forecast(
    rows: &[SourceRow],
    scheme: &BracketScheme,
    snapshots: &[Snapshot],
    options: &ForecastOptions,
    config: &EngineConfig,
) -> ForecastReport {
    let problems = scheme.validate();
    if !problems.is_empty() {
        log::warn!("Bracket scheme has problems: {}", problems.join("; "));
    }

    let biases = if options.apply_bias {
        estimate_bias(snapshots, rows, config.bias_window)
    } else {
        HashMap::new()
    };

    let stats = source_stats(snapshots, rows);
    let auto = auto_weights(&stats, options.auto_weights, config.auto_weight_epsilon);
    let weight_mode = if auto.is_some() {
        WeightMode::Auto
    } else {
        WeightMode::Manual
    };
    if options.auto_weights && auto.is_none() {
        log::info!("No resolved history for auto-weights; using manual weights");
    }

    let adjusted = resolve_weights(rows, &biases, config.bias_clamp, auto.as_ref());
    let raw = compute_distribution(&adjusted, scheme, config.bleed);
    let blend = blend_with_prior(
        options.use_prior,
        options.prior_id.as_ref(),
        &raw,
        snapshots,
        scheme,
        config.prior_weight,
    );

    log::debug!(
        "Forecast over {} rows and {} brackets (mode={}, prior={})",
        adjusted.len(),
        scheme.len(),
        weight_mode,
        blend.applied
    );

    ForecastReport {
        rows: adjusted,
        biases,
        auto_weights: auto,
        weight_mode,
        raw,
        probs: blend.probs,
        prior_applied: blend.applied,
    }
}

/// Calibration view over a group's history: per-source stats, biases, and
/// accuracy of the saved distributions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalibrationReport {
    pub stats: Vec<SourceStats>,
    pub biases: HashMap<String, f64>,
    pub accuracy: AccuracySummary,
    pub trend: Vec<TrendPoint>,
}

/// Build the calibration view for the given history and live rows.
pub fn calibration_report(
    snapshots: &[Snapshot],
    rows: &[SourceRow],
    config: &EngineConfig,
) -> CalibrationReport {
    CalibrationReport {
        stats: source_stats(snapshots, rows),
        biases: estimate_bias(snapshots, rows, config.bias_window),
        accuracy: accuracy_summary(snapshots),
        trend: accuracy_trend(snapshots),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn scheme() -> BracketScheme {
        BracketScheme::from_pairs(&[("<=91", 91.0), ("92-93", 93.0), ("94-95", 95.0)])
    }

    fn resolved(id: &str, day: u32, probs: Vec<f64>, actual: f64) -> Snapshot {
        Snapshot {
            id: SnapshotId::from(id),
            saved_at: Utc.with_ymd_and_hms(2024, 7, day, 9, 0, 0).unwrap(),
            name: id.to_string(),
            scheme: scheme(),
            probs,
            weight_mode: WeightMode::Manual,
            actual: Some(actual),
        }
    }

    #[test]
    fn test_nan_engine_constants_do_not_panic() {
        let snaps = vec![resolved("s1", 1, vec![0.1, 0.8, 0.1], 99.0)];
        // Bias 9 is cut to the default bound, landing on the last bracket edge.
        let rows = vec![SourceRow::new(1, "NWS", 90.0, 1.0)];
        let config = EngineConfig {
            bias_clamp: f64::NAN,
            bleed: f64::NAN,
            ..EngineConfig::default()
        };

        let report = run_forecast(&rows, &scheme(), &snaps, &ForecastOptions::default(), &config);
        assert_eq!(report.rows[0].bias, 5.0);
        assert!((report.probs.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_plain_forecast_without_history() {
        let rows = vec![SourceRow::new(1, "NWS", 92.5, 1.0)];
        let report = run_forecast(&rows, &scheme(), &[], &ForecastOptions::default(), &EngineConfig::default());

        assert_eq!(report.weight_mode, WeightMode::Manual);
        assert!(report.biases.is_empty());
        assert!(!report.prior_applied);
        assert_eq!(report.raw, report.probs);
        let expected = [0.15, 0.70, 0.15];
        for (p, e) in report.probs.iter().zip(expected) {
            assert!((p - e).abs() < 1e-12);
        }
    }

    #[test]
    fn test_bias_shifts_forecast() {
        // NWS ran 2 degrees cold: 91 becomes 93.
        let history = vec![resolved("s1", 1, vec![0.7, 0.3, 0.0], 93.0)];
        let rows = vec![SourceRow::new(1, "NWS", 91.0, 1.0)];
        let report = run_forecast(&rows, &scheme(), &history, &ForecastOptions::default(), &EngineConfig::default());

        assert!((report.rows[0].bias - 2.0).abs() < 1e-12);
        assert!((report.rows[0].adj_forecast - 93.0).abs() < 1e-12);
        assert!((report.probs[1] - 0.7).abs() < 1e-12);

        let no_bias = ForecastOptions {
            apply_bias: false,
            ..ForecastOptions::default()
        };
        let report = run_forecast(&rows, &scheme(), &history, &no_bias, &EngineConfig::default());
        assert!((report.probs[0] - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_auto_weights_switch_mode() {
        let history = vec![resolved("s1", 1, vec![0.2, 0.6, 0.2], 93.0)];
        let rows = vec![
            SourceRow::new(1, "Good", 93.0, 1.0),
            SourceRow::new(2, "Bad", 91.5, 1.0),
        ];
        let options = ForecastOptions {
            apply_bias: false,
            auto_weights: true,
            ..ForecastOptions::default()
        };
        let report = run_forecast(&rows, &scheme(), &history, &options, &EngineConfig::default());

        assert_eq!(report.weight_mode, WeightMode::Auto);
        let weights = report.auto_weights.as_ref().unwrap();
        // scores 1/0.5 = 2 and 1/2 = 0.5
        assert!((weights["Good"] - 0.8).abs() < 1e-12);
        assert!((report.rows[0].n_weight - 0.8).abs() < 1e-12);
        assert!((report.probs.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_auto_weights_without_history_fall_back() {
        let rows = vec![SourceRow::new(1, "A", 92.0, 1.0)];
        let options = ForecastOptions {
            auto_weights: true,
            ..ForecastOptions::default()
        };
        let report = run_forecast(&rows, &scheme(), &[], &options, &EngineConfig::default());
        assert_eq!(report.weight_mode, WeightMode::Manual);
        assert!(report.auto_weights.is_none());
    }

    #[test]
    fn test_prior_blend_applied() {
        let mut prior = resolved("prior", 1, vec![1.0, 0.0, 0.0], 90.0);
        prior.actual = None;
        let rows = vec![SourceRow::new(1, "A", 92.0, 1.0)];
        let options = ForecastOptions {
            use_prior: true,
            prior_id: Some(SnapshotId::from("prior")),
            ..ForecastOptions::default()
        };
        let report = run_forecast(&rows, &scheme(), &[prior], &options, &EngineConfig::default());
        assert!(report.prior_applied);
        assert!((report.probs[0] - 0.575).abs() < 1e-12);
        assert!((report.probs[1] - 0.35).abs() < 1e-12);
        assert!((report.probs[2] - 0.075).abs() < 1e-12);
    }

    #[test]
    fn test_calibration_report() {
        let history = vec![
            resolved("s2", 2, vec![0.1, 0.8, 0.1], 92.0),
            resolved("s1", 1, vec![0.8, 0.1, 0.1], 94.0),
        ];
        let rows = vec![SourceRow::new(1, "A", 93.0, 1.0)];
        let report = calibration_report(&history, &rows, &EngineConfig::default());

        assert_eq!(report.stats.len(), 1);
        assert_eq!(report.stats[0].n, 2);
        assert!((report.stats[0].mae - 1.0).abs() < 1e-12);
        assert!((report.biases["A"] - 0.0).abs() < 1e-12);
        assert_eq!(report.accuracy.total, 2);
        assert_eq!(report.accuracy.correct, 1);
        assert_eq!(report.trend.len(), 2);
        assert_eq!(report.trend[1].acc, 50.0);
    }
}
