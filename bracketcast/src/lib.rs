//! Bracketcast: probability distributions over outcome brackets from
//! weighted forecast sources.
//!
//! The engine turns a set of forecast rows into a distribution over a bracket
//! scheme, corrects each source by its historical bias, optionally weights
//! sources by accuracy and blends with an earlier snapshot, and scores saved
//! snapshots once the real outcome is known.
//!
//! - [`algorithms`]: pure numeric functions (distribution, bias, weights, prior, accuracy)
//! - [`services`]: forecast pipeline and snapshot collection operations
//! - [`db`]: snapshot store trait and backends
//! - [`parsing`]: document parsing, legacy migration and validation
//! - [`io`]: import and export
//! - [`config`]: TOML configuration
//!
//! # Example
//!
//! ```
//! use bracketcast::config::EngineConfig;
//! use bracketcast::core::{BracketScheme, SourceRow};
//! use bracketcast::services::{run_forecast, ForecastOptions};
//!
//! let scheme = BracketScheme::from_pairs(&[("<=91", 91.0), ("92-93", 93.0), ("94+", f64::INFINITY)]);
//! let rows = vec![SourceRow::new(1, "NWS", 92.5, 1.0)];
//!
//! let report = run_forecast(&rows, &scheme, &[], &ForecastOptions::default(), &EngineConfig::default());
//! assert!((report.probs[1] - 0.7).abs() < 1e-9);
//! ```

pub mod algorithms;
pub mod config;
pub mod core;
pub mod db;
pub mod io;
pub mod parsing;
pub mod services;
