//! Domain models for bracket schemes, forecast sources, and saved snapshots.
//!
//! This module provides the core data structures shared by the probability
//! engine, the calibration statistics, and the storage boundary. All persisted
//! types serialize with camelCase field names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::serde_helpers::{
    deserialize_max, deserialize_number_or_nan, deserialize_optional_actual, deserialize_probs,
    deserialize_timestamp, serialize_finite_or_null,
};

/// Name of the group that always exists in a [`Workspace`].
pub const DEFAULT_GROUP: &str = "Default";

fn unbounded() -> f64 {
    f64::INFINITY
}

fn nan() -> f64 {
    f64::NAN
}

fn default_weight() -> f64 {
    1.0
}

/// One outcome category: everything above the previous bracket's `max` and up
/// to (and including) this bracket's `max`.
///
/// # Examples
///
/// ```
/// use bracketcast::core::domain::Bracket;
///
/// let b = Bracket::new("92-93", 93.0);
/// assert_eq!(b.label, "92-93");
/// assert!(Bracket::unbounded("94+").max.is_infinite());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    pub label: String,
    #[serde(
        default = "unbounded",
        deserialize_with = "deserialize_max",
        serialize_with = "serialize_finite_or_null"
    )]
    pub max: f64,
}

impl Bracket {
    pub fn new(label: impl Into<String>, max: f64) -> Self {
        Self {
            label: label.into(),
            max,
        }
    }

    /// A bracket with no upper threshold.
    pub fn unbounded(label: impl Into<String>) -> Self {
        Self::new(label, f64::INFINITY)
    }
}

/// Ordered set of brackets partitioning the outcome space.
///
/// Thresholds are expected to be strictly increasing; the last one may be
/// `+∞`. Bracket `i` covers `(scheme[i-1].max, scheme[i].max]`, with `-∞` as
/// the lower bound of bracket 0.
///
/// # Examples
///
/// ```
/// use bracketcast::core::domain::{Bracket, BracketScheme};
///
/// let scheme = BracketScheme::new(vec![
///     Bracket::new("<=91", 91.0),
///     Bracket::new("92-93", 93.0),
///     Bracket::unbounded("94+"),
/// ]);
/// assert_eq!(scheme.len(), 3);
/// assert!(scheme.validate().is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BracketScheme {
    brackets: Vec<Bracket>,
}

impl BracketScheme {
    pub fn new(brackets: Vec<Bracket>) -> Self {
        Self { brackets }
    }

    /// Build a scheme from `(label, max)` pairs.
    pub fn from_pairs(pairs: &[(&str, f64)]) -> Self {
        Self::new(
            pairs
                .iter()
                .map(|(label, max)| Bracket::new(*label, *max))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.brackets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brackets.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Bracket> {
        self.brackets.get(idx)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bracket> {
        self.brackets.iter()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.brackets.iter().map(|b| b.label.as_str())
    }

    /// True when both schemes have the same length and the same labels in order.
    ///
    /// Thresholds are not compared; labels are what a reader sees, and two
    /// distributions over identically labelled brackets are considered
    /// compatible.
    pub fn labels_match(&self, other: &BracketScheme) -> bool {
        self.len() == other.len() && self.labels().eq(other.labels())
    }

    /// Check the structural invariants and return a description of each
    /// violation. An empty result means the scheme is well formed.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.brackets.is_empty() {
            problems.push("Scheme has no brackets".to_string());
            return problems;
        }

        for (idx, bracket) in self.brackets.iter().enumerate() {
            if bracket.max.is_nan() {
                problems.push(format!("Bracket {} ('{}') has no threshold", idx, bracket.label));
            }
            if bracket.max.is_infinite() && idx + 1 != self.brackets.len() {
                problems.push(format!(
                    "Bracket {} ('{}') is unbounded but is not the last bracket",
                    idx, bracket.label
                ));
            }
        }

        for (idx, pair) in self.brackets.windows(2).enumerate() {
            if !(pair[0].max < pair[1].max) {
                problems.push(format!(
                    "Thresholds not strictly increasing at bracket {}: {} then {}",
                    idx + 1,
                    pair[0].max,
                    pair[1].max
                ));
            }
        }

        problems
    }
}

impl From<Vec<Bracket>> for BracketScheme {
    fn from(brackets: Vec<Bracket>) -> Self {
        Self::new(brackets)
    }
}

/// A named forecast source in the live row set.
///
/// `source` is the join key for statistics (after trimming); `id` only
/// distinguishes rows within one row set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRow {
    pub id: i64,
    #[serde(default)]
    pub source: String,
    #[serde(
        default = "nan",
        deserialize_with = "deserialize_number_or_nan",
        serialize_with = "serialize_finite_or_null"
    )]
    pub forecast: f64,
    #[serde(
        default = "default_weight",
        deserialize_with = "deserialize_number_or_nan",
        serialize_with = "serialize_finite_or_null"
    )]
    pub weight: f64,
}

impl SourceRow {
    pub fn new(id: i64, source: impl Into<String>, forecast: f64, weight: f64) -> Self {
        Self {
            id,
            source: source.into(),
            forecast,
            weight,
        }
    }

    /// Trimmed source name, or `None` when the name is blank.
    pub fn source_key(&self) -> Option<&str> {
        let key = self.source.trim();
        if key.is_empty() {
            None
        } else {
            Some(key)
        }
    }

    /// A row takes part in statistics and weighting only with a name and a
    /// finite forecast.
    pub fn is_usable(&self) -> bool {
        self.source_key().is_some() && self.forecast.is_finite()
    }
}

/// How the weights behind a saved distribution were chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightMode {
    #[default]
    Manual,
    Auto,
}

impl fmt::Display for WeightMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeightMode::Manual => write!(f, "manual"),
            WeightMode::Auto => write!(f, "auto"),
        }
    }
}

/// Unique, time-derived snapshot identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnapshotId(pub String);

impl SnapshotId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SnapshotId {
    fn from(s: &str) -> Self {
        SnapshotId(s.to_string())
    }
}

/// A saved probability computation.
///
/// Everything except `actual` is frozen at save time. `actual` is attached or
/// cleared once the real outcome is known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub id: SnapshotId,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub saved_at: DateTime<Utc>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub scheme: BracketScheme,
    #[serde(default, deserialize_with = "deserialize_probs")]
    pub probs: Vec<f64>,
    #[serde(default)]
    pub weight_mode: WeightMode,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_actual",
        skip_serializing_if = "Option::is_none"
    )]
    pub actual: Option<f64>,
}

impl Snapshot {
    /// True once a finite outcome has been attached.
    pub fn has_actual(&self) -> bool {
        self.actual.is_some_and(f64::is_finite)
    }

    /// The attached outcome, if it is a usable number.
    pub fn actual_value(&self) -> Option<f64> {
        self.actual.filter(|v| v.is_finite())
    }
}

/// A named set of forecast sources together with the snapshots computed from it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
    #[serde(default)]
    pub rows: Vec<SourceRow>,
    #[serde(default)]
    pub snapshots: Vec<Snapshot>,
}

/// Everything the storage boundary persists: named groups and the active one.
///
/// A workspace always contains [`DEFAULT_GROUP`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub active_group: String,
    pub groups: BTreeMap<String, Group>,
}

impl Default for Workspace {
    fn default() -> Self {
        let mut groups = BTreeMap::new();
        groups.insert(DEFAULT_GROUP.to_string(), Group::default());
        Self {
            active_group: DEFAULT_GROUP.to_string(),
            groups,
        }
    }
}

impl Workspace {
    /// Restore the workspace invariants: the default group exists and the
    /// active group names an existing group.
    pub fn normalized(mut self) -> Self {
        self.groups.entry(DEFAULT_GROUP.to_string()).or_default();
        if !self.groups.contains_key(&self.active_group) {
            self.active_group = DEFAULT_GROUP.to_string();
        }
        self
    }

    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.get(name)
    }

    /// Get a group, creating it empty when missing.
    pub fn group_mut(&mut self, name: &str) -> &mut Group {
        self.groups.entry(name.to_string()).or_default()
    }

    pub fn active(&self) -> &Group {
        // normalized() guarantees presence; fall back to an empty view otherwise
        static EMPTY: Group = Group {
            rows: Vec::new(),
            snapshots: Vec::new(),
        };
        self.groups.get(&self.active_group).unwrap_or(&EMPTY)
    }

    pub fn active_mut(&mut self) -> &mut Group {
        let name = self.active_group.clone();
        self.group_mut(&name)
    }

    /// Total number of snapshots across all groups.
    pub fn snapshot_count(&self) -> usize {
        self.groups.values().map(|g| g.snapshots.len()).sum()
    }
}

/// A live row after bias correction and weight resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustedRow {
    pub id: i64,
    pub source: String,
    pub forecast: f64,
    /// Bias added to the forecast, already clamped.
    pub bias: f64,
    pub adj_forecast: f64,
    /// Weight before normalization (manual or auto).
    pub weight: f64,
    /// Normalized weight; sums to 1 across usable rows.
    pub n_weight: f64,
}
