//! Core domain models for bracket forecasting.
//!
//! This module defines the fundamental data structures used throughout the crate,
//! representing bracket schemes, forecast source rows, saved snapshots, and the
//! grouped workspace that the storage boundary persists.

pub mod domain;
pub mod serde_helpers;

pub use domain::{
    AdjustedRow, Bracket, BracketScheme, Group, Snapshot, SnapshotId, SourceRow, WeightMode,
    Workspace, DEFAULT_GROUP,
};
