//! End-to-end forecast workflow: compute, save, resolve, recompute.

use bracketcast::config::{AppConfig, EngineConfig};
use bracketcast::core::{BracketScheme, SourceRow, WeightMode, Workspace};
use bracketcast::db::{load_workspace, persist, LocalStore};
use bracketcast::services::{
    attach_actual, calibration_report, clear_actual, run_forecast, save_snapshot, ForecastOptions,
};
use chrono::{Duration, TimeZone, Utc};

fn scheme() -> BracketScheme {
    BracketScheme::from_pairs(&[("<=91", 91.0), ("92-93", 93.0), ("94-95", 95.0), ("96+", f64::INFINITY)])
}

#[test]
fn test_save_resolve_and_recalibrate() {
    let config = EngineConfig::default();
    let rows = vec![SourceRow::new(1, "NWS", 95.0, 1.0), SourceRow::new(2, "GFS", 96.0, 1.0)];
    let start = Utc.with_ymd_and_hms(2024, 7, 1, 6, 0, 0).unwrap();

    let mut ws = Workspace::default();
    for day in 0..3 {
        let report = run_forecast(&rows, &scheme(), &ws.active().snapshots, &ForecastOptions::default(), &config);
        let total: f64 = report.probs.iter().sum();
        assert!((total - 1.0).abs() < 1e-9);

        let now = start + Duration::days(day);
        let (snaps, id) = save_snapshot(&ws.active().snapshots, "", &scheme(), &report.probs, report.weight_mode, now);
        ws.active_mut().snapshots = attach_actual(&snaps, &id, 97.0);
    }

    // Both sources ran cold: NWS by 2, GFS by 1.
    let calibration = calibration_report(&ws.active().snapshots, &rows, &config);
    assert!((calibration.biases["NWS"] - 2.0).abs() < 1e-9);
    assert!((calibration.biases["GFS"] - 1.0).abs() < 1e-9);
    assert_eq!(calibration.stats[0].source, "GFS");
    assert_eq!(calibration.accuracy.total, 3);
    assert_eq!(calibration.trend.len(), 3);

    // With bias applied both rows move into the top bracket; its bleed goes left.
    let corrected = run_forecast(&rows, &scheme(), &ws.active().snapshots, &ForecastOptions::default(), &config);
    assert!(corrected.rows.iter().all(|r| r.adj_forecast >= 97.0));
    assert!((corrected.probs[3] - 0.7).abs() < 1e-9);
    let best = bracketcast::algorithms::argmax_first(&corrected.probs);
    assert_eq!(best, Some(3));
}

#[test]
fn test_auto_weights_and_prior_blend() {
    let config = EngineConfig::default();
    let rows = vec![SourceRow::new(1, "Good", 93.0, 1.0), SourceRow::new(2, "Bad", 90.0, 5.0)];
    let now = Utc.with_ymd_and_hms(2024, 7, 1, 6, 0, 0).unwrap();

    let (snaps, id) = save_snapshot(&[], "Mon", &scheme(), &[0.0, 0.0, 1.0, 0.0], WeightMode::Manual, now);
    let snaps = attach_actual(&snaps, &id, 93.0);

    let options = ForecastOptions {
        apply_bias: false,
        auto_weights: true,
        use_prior: true,
        prior_id: Some(id.clone()),
    };
    let report = run_forecast(&rows, &scheme(), &snaps, &options, &config);

    assert_eq!(report.weight_mode, WeightMode::Auto);
    let weights = report.auto_weights.as_ref().unwrap();
    assert!(weights["Good"] > weights["Bad"]);
    assert!(report.prior_applied);
    for (blended, raw) in report.probs.iter().zip(&report.raw).take(2) {
        assert!((blended - raw * 0.5).abs() < 1e-9);
    }

    // Clearing the outcome removes the history auto-weights depend on.
    let snaps = clear_actual(&snaps, &id);
    let report = run_forecast(&rows, &scheme(), &snaps, &options, &config);
    assert_eq!(report.weight_mode, WeightMode::Manual);
    assert!(report.auto_weights.is_none());
}

#[test]
fn test_config_drives_engine_and_store() {
    let config = AppConfig::from_toml_str(
        r#"
        [engine]
        bleed = 0.0

        [storage]
        type = "local"
        "#,
    )
    .unwrap();

    let rows = vec![SourceRow::new(1, "NWS", 92.0, 1.0)];
    let report = run_forecast(&rows, &scheme(), &[], &ForecastOptions::default(), &config.engine);
    assert_eq!(report.probs, vec![0.0, 1.0, 0.0, 0.0]);

    let mut store = LocalStore::new();
    let mut ws = Workspace::default();
    let now = Utc.with_ymd_and_hms(2024, 7, 1, 6, 0, 0).unwrap();
    ws.active_mut().snapshots = save_snapshot(&[], "x", &scheme(), &report.probs, report.weight_mode, now).0;
    assert!(persist(&mut store, &ws).is_saved());
    assert_eq!(load_workspace(&store).workspace, ws);
}
