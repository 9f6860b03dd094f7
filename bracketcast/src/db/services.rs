//! High-level storage service layer.
//!
//! Store-agnostic functions that hold the rules every backend must share:
//! loading never fails (it degrades to the default workspace), and a failed
//! write is a notice for the user, not an error for the caller.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  Callers (forecast pipeline, import/export)  │
//! └──────────────────────┬───────────────────────┘
//!                        │
//! ┌──────────────────────▼───────────────────────┐
//! │  Service layer (services.rs)                 │
//! │  load degrades, persist reports              │
//! └──────────────────────┬───────────────────────┘
//!                        │
//! ┌──────────────────────▼───────────────────────┐
//! │  SnapshotStore trait (repository/)           │
//! └──────────────┬────────────────┬──────────────┘
//!                │                │
//!        ┌───────▼──────┐  ┌──────▼───────┐
//!        │  LocalStore  │  │  FileStore   │
//!        └──────────────┘  └──────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use bracketcast::core::Workspace;
//! use bracketcast::db::repositories::LocalStore;
//! use bracketcast::db::services::{self, PersistOutcome};
//!
//! let mut store = LocalStore::new();
//! let outcome = services::persist(&mut store, &Workspace::default());
//! assert!(matches!(outcome, PersistOutcome::Saved { .. }));
//!
//! let loaded = services::load_workspace(&store);
//! assert!(loaded.report.is_clean());
//! ```

use log::{debug, info, warn};

use super::repository::SnapshotStore;
use crate::core::domain::Workspace;
use crate::parsing::document::{parse_document_str, workspace_to_json};
use crate::parsing::validator::ValidationReport;

/// Result of loading a workspace from a store.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutcome {
    pub workspace: Workspace,
    pub report: ValidationReport,
}

/// Result of persisting a workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOutcome {
    Saved { bytes: usize },
    /// The write failed; the in-memory workspace is still authoritative.
    Failed { notice: String },
}

impl PersistOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, PersistOutcome::Saved { .. })
    }
}

/// Load the workspace from a store.
///
/// An empty store, a read error, invalid JSON or a document of the wrong
/// shape all yield [`Workspace::default`]. Legacy snapshot arrays are
/// migrated into the default group.
pub fn load_workspace<S: SnapshotStore + ?Sized>(store: &S) -> LoadOutcome {
    let mut report = ValidationReport::new();

    let document = match store.read_document() {
        Ok(Some(document)) => document,
        Ok(None) => {
            debug!("No stored document in {}; starting empty", store.describe());
            return LoadOutcome {
                workspace: Workspace::default(),
                report,
            };
        }
        Err(e) => {
            report.add_warning(format!("Could not read {}: {}", store.describe(), e));
            return LoadOutcome {
                workspace: Workspace::default(),
                report,
            };
        }
    };

    match parse_document_str(&document) {
        Ok(parsed) => {
            report.merge(parsed.report);
            let workspace = parsed.payload.into_workspace();
            info!(
                "Loaded {} snapshots in {} groups from {}",
                workspace.snapshot_count(),
                workspace.groups.len(),
                store.describe()
            );
            LoadOutcome { workspace, report }
        }
        Err(e) => {
            report.add_warning(format!(
                "Discarded unreadable document in {}: {:#}",
                store.describe(),
                e
            ));
            LoadOutcome {
                workspace: Workspace::default(),
                report,
            }
        }
    }
}

/// Persist the whole workspace, replacing the stored document.
///
/// Never fails: a serialization or write error is logged and returned as a
/// [`PersistOutcome::Failed`] notice.
pub fn persist<S: SnapshotStore + ?Sized>(store: &mut S, workspace: &Workspace) -> PersistOutcome {
    let document = match workspace_to_json(workspace) {
        Ok(document) => document,
        Err(e) => return failed(format!("Could not serialize snapshots: {:#}", e)),
    };

    match store.write_document(&document) {
        Ok(()) => {
            info!(
                "Saved {} snapshots ({} bytes) to {}",
                workspace.snapshot_count(),
                document.len(),
                store.describe()
            );
            PersistOutcome::Saved {
                bytes: document.len(),
            }
        }
        Err(e) => failed(format!(
            "Snapshots were not saved to {}: {}. Changes are kept in memory.",
            store.describe(),
            e
        )),
    }
}

fn failed(notice: String) -> PersistOutcome {
    warn!("{}", notice);
    PersistOutcome::Failed { notice }
}
