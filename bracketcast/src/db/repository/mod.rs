//! Store trait definition for snapshot persistence.
//!
//! The store holds a single document: the whole workspace (groups, rows and
//! snapshot collections). There are no partial updates. Every write replaces
//! the document, and the last writer wins.
//!
//! Implementations only move text in and out; parsing, migration and
//! validation happen once in [`crate::parsing`], and the degrade-to-empty
//! rules live in [`crate::db::services`].
//!
//! ```
//! use bracketcast::core::Workspace;
//! use bracketcast::db::repositories::LocalStore;
//! use bracketcast::db::repository::SnapshotStore;
//!
//! let mut store = LocalStore::new();
//! store.replace(&Workspace::default()).unwrap();
//! let loaded = store.load();
//! assert_eq!(loaded.workspace, Workspace::default());
//! ```

pub mod error;

pub use error::{StoreError, StoreResult};

use crate::core::domain::Workspace;
use crate::db::services::{self, LoadOutcome};

/// Whole-document persistence backend.
pub trait SnapshotStore {
    /// Read the stored document, or `None` when nothing has been written yet.
    fn read_document(&self) -> StoreResult<Option<String>>;

    /// Replace the stored document. Must be all-or-nothing: on error the
    /// previous document is still intact.
    fn write_document(&mut self, document: &str) -> StoreResult<()>;

    /// Whether the backend currently accepts writes.
    fn health_check(&self) -> bool {
        true
    }

    /// Short human-readable description, used in log messages.
    fn describe(&self) -> String;

    /// Load the workspace. Missing or unreadable documents degrade to the
    /// default workspace; the outcome reports what was dropped.
    fn load(&self) -> LoadOutcome {
        services::load_workspace(self)
    }

    /// Serialize and store the whole workspace, replacing what was there.
    fn replace(&mut self, workspace: &Workspace) -> StoreResult<()> {
        let document = crate::parsing::workspace_to_json(workspace)?;
        self.write_document(&document)
    }
}
