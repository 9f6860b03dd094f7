//! Engine and storage configuration file support.
//!
//! This module reads tuning constants and storage settings from a TOML file.
//! Every field has a default, so an empty file (or no file at all, via
//! [`AppConfig::default`]) yields the stock behaviour.
//!
//! ```toml
//! [engine]
//! bleed = 0.3
//! bias_clamp = 5.0
//! auto_weight_epsilon = 0.5
//! prior_weight = 0.5
//! bias_window = 0
//!
//! [storage]
//! type = "file"
//! path = "bracketcast-snapshots.json"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("No bracketcast.toml found in standard locations")]
    NotFound,
}

/// Top-level configuration file layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub storage: StorageSettings,
}

/// Tuning constants for the probability engine and the calibration statistics.
///
/// None of these encode a calibrated statistical model; they are heuristics
/// with sensible defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Fraction of each row's weight spread to neighbouring brackets.
    #[serde(default = "default_bleed")]
    pub bleed: f64,
    /// Applied bias is clamped to `[-bias_clamp, bias_clamp]`.
    #[serde(default = "default_bias_clamp")]
    pub bias_clamp: f64,
    /// Smoothing term in the auto-weight score `1 / (mae + epsilon)`.
    #[serde(default = "default_auto_weight_epsilon")]
    pub auto_weight_epsilon: f64,
    /// Share of the blended distribution taken from the prior snapshot.
    #[serde(default = "default_prior_weight")]
    pub prior_weight: f64,
    /// Number of most recent resolved snapshots used for bias (0 = all).
    #[serde(default)]
    pub bias_window: usize,
}

/// Storage backend selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageSettings {
    #[serde(rename = "type", default = "default_storage_type")]
    pub store_type: String,
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

fn default_bleed() -> f64 {
    0.3
}

fn default_bias_clamp() -> f64 {
    5.0
}

fn default_auto_weight_epsilon() -> f64 {
    0.5
}

fn default_prior_weight() -> f64 {
    0.5
}

fn default_storage_type() -> String {
    "local".to_string()
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("bracketcast-snapshots.json")
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bleed: default_bleed(),
            bias_clamp: default_bias_clamp(),
            auto_weight_epsilon: default_auto_weight_epsilon(),
            prior_weight: default_prior_weight(),
            bias_window: 0,
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            store_type: default_storage_type(),
            path: default_storage_path(),
        }
    }
}

impl EngineConfig {
    /// Check that every constant lies in its meaningful range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.bleed) {
            return Err(ConfigError::Invalid(format!(
                "engine.bleed must be within [0, 1], got {}",
                self.bleed
            )));
        }
        if !self.bias_clamp.is_finite() || self.bias_clamp < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "engine.bias_clamp must be a non-negative number, got {}",
                self.bias_clamp
            )));
        }
        if !self.auto_weight_epsilon.is_finite() || self.auto_weight_epsilon <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "engine.auto_weight_epsilon must be positive, got {}",
                self.auto_weight_epsilon
            )));
        }
        if !(0.0..=1.0).contains(&self.prior_weight) {
            return Err(ConfigError::Invalid(format!(
                "engine.prior_weight must be within [0, 1], got {}",
                self.prior_weight
            )));
        }
        Ok(())
    }
}

impl AppConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)?;
        config.engine.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(AppConfig)` if successful
    /// * `Err(ConfigError)` if the file cannot be read, parsed, or validated
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `bracketcast.toml` in:
    /// 1. Current directory
    /// 2. `bracketcast/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> Result<Self, ConfigError> {
        let search_paths = [
            PathBuf::from("bracketcast.toml"),
            PathBuf::from("bracketcast/bracketcast.toml"),
            PathBuf::from("../bracketcast.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                log::info!("Loading configuration from {}", path.display());
                return Self::from_file(&path);
            }
        }

        Err(ConfigError::NotFound)
    }
}
