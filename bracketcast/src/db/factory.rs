//! Store factory for dependency injection.
//!
//! This module provides utilities for creating store instances based on
//! runtime configuration.

use std::str::FromStr;

use super::repositories::LocalStore;
#[cfg(feature = "file-store")]
use super::repositories::FileStore;
use super::repository::{SnapshotStore, StoreError, StoreResult};
use crate::config::StorageSettings;

/// Store type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreType {
    /// In-memory store
    Local,
    /// JSON file on disk
    File,
}

impl FromStr for StoreType {
    type Err = StoreError;

    /// Parse store type from string ("local", "memory", "file").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" | "memory" => Ok(Self::Local),
            "file" => Ok(Self::File),
            _ => Err(StoreError::Configuration(format!("Unknown store type: {}", s))),
        }
    }
}

/// Store factory for creating store instances.
///
/// # Example
/// ```
/// use bracketcast::config::StorageSettings;
/// use bracketcast::db::factory::StoreFactory;
///
/// let settings = StorageSettings::default();
/// let store = StoreFactory::create(&settings).unwrap();
/// assert!(store.health_check());
/// ```
pub struct StoreFactory;

impl StoreFactory {
    /// Create a store from storage settings.
    ///
    /// # Returns
    /// * `Ok(Box<dyn SnapshotStore>)` - Boxed store instance
    /// * `Err(StoreError::Configuration)` - Unknown type, or a file store
    ///   without a path (or with the `file-store` feature disabled)
    pub fn create(settings: &StorageSettings) -> StoreResult<Box<dyn SnapshotStore>> {
        let store_type: StoreType = settings.store_type.parse()?;
        let store: Box<dyn SnapshotStore> = match store_type {
            StoreType::Local => Box::new(Self::create_local()),
            StoreType::File => Self::create_file(settings)?,
        };
        log::info!("Using {} snapshot store", store.describe());
        Ok(store)
    }

    /// Create an in-memory store.
    pub fn create_local() -> LocalStore {
        LocalStore::new()
    }

    #[cfg(feature = "file-store")]
    fn create_file(settings: &StorageSettings) -> StoreResult<Box<dyn SnapshotStore>> {
        if settings.path.as_os_str().is_empty() {
            return Err(StoreError::Configuration(
                "File store requires a non-empty path".to_string(),
            ));
        }
        Ok(Box::new(FileStore::new(settings.path.clone())))
    }

    #[cfg(not(feature = "file-store"))]
    fn create_file(_settings: &StorageSettings) -> StoreResult<Box<dyn SnapshotStore>> {
        Err(StoreError::Configuration(
            "File store support is disabled (enable the 'file-store' feature)".to_string(),
        ))
    }
}
