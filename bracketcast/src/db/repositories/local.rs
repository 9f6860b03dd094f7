//! In-memory local store implementation.
//!
//! This module provides a local implementation of [`SnapshotStore`] suitable
//! for unit testing and for embedding where persistence is handled elsewhere.
//! The document is kept as text, exactly as a browser key-value slot would
//! hold it.

use crate::db::repository::{SnapshotStore, StoreError, StoreResult};

/// In-memory local store.
///
/// # Example
/// ```
/// use bracketcast::db::repositories::LocalStore;
/// use bracketcast::db::repository::SnapshotStore;
///
/// let mut store = LocalStore::new();
/// assert!(store.read_document().unwrap().is_none());
///
/// store.write_document("[]").unwrap();
/// assert_eq!(store.read_document().unwrap().as_deref(), Some("[]"));
/// ```
#[derive(Debug, Clone)]
pub struct LocalStore {
    document: Option<String>,
    is_healthy: bool,
    write_count: usize,
}

impl LocalStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            document: None,
            is_healthy: true,
            write_count: 0,
        }
    }

    /// Create a store pre-populated with a raw document.
    ///
    /// The text is not validated, which makes this useful for exercising the
    /// degrade-to-empty load path.
    pub fn with_document(document: impl Into<String>) -> Self {
        Self {
            document: Some(document.into()),
            ..Self::new()
        }
    }

    /// Set the health status for simulating write failures (quota, etc.).
    pub fn set_healthy(&mut self, healthy: bool) {
        self.is_healthy = healthy;
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.write_count
    }

    /// Clear the stored document.
    pub fn clear(&mut self) {
        self.document = None;
    }
}

impl Default for LocalStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotStore for LocalStore {
    fn read_document(&self) -> StoreResult<Option<String>> {
        Ok(self.document.clone())
    }

    fn write_document(&mut self, document: &str) -> StoreResult<()> {
        if !self.is_healthy {
            return Err(StoreError::Unavailable(
                "Local store is not accepting writes".to_string(),
            ));
        }
        self.document = Some(document.to_string());
        self.write_count += 1;
        Ok(())
    }

    fn health_check(&self) -> bool {
        self.is_healthy
    }

    fn describe(&self) -> String {
        "local (in-memory)".to_string()
    }
}
