//! Service layer for forecasting workflows.
//!
//! Services compose the pure algorithms into the operations a caller needs:
//! running a forecast over the live rows, building the calibration report,
//! and editing snapshot collections. Persisting the result is left to
//! [`crate::db::services`].

pub mod forecast;
pub mod snapshots;

pub use forecast::{
    calibration_report, run_forecast, CalibrationReport, ForecastOptions, ForecastReport,
};
pub use snapshots::{
    attach_actual, clear_actual, delete_snapshot, find_snapshot, next_snapshot_id, save_snapshot,
};
