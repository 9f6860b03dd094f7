//! Snapshot storage.
//!
//! The workspace is persisted as one JSON document through the
//! [`SnapshotStore`](repository::SnapshotStore) trait, so backends can be
//! swapped without touching the engine.
//!
//! - `services`: load and persist with the shared degrade/notice rules (use these!)
//! - `repository`: trait definition and error types
//! - `repositories::local`: in-memory implementation for tests and embedding
//! - `repositories::file`: JSON file implementation (feature `file-store`)
//! - `factory`: build a store from [`StorageSettings`](crate::config::StorageSettings)
//!
//! # Recommended Usage
//!
//! ```no_run
//! use bracketcast::config::AppConfig;
//! use bracketcast::db::{factory::StoreFactory, services};
//!
//! let config = AppConfig::from_default_location().unwrap_or_default();
//! let mut store = StoreFactory::create(&config.storage).expect("bad storage settings");
//!
//! let mut loaded = services::load_workspace(store.as_ref());
//! loaded.workspace.active_mut().snapshots.clear();
//! let outcome = services::persist(store.as_mut(), &loaded.workspace);
//! println!("{:?}", outcome);
//! ```

pub mod factory;
pub mod repositories;
pub mod repository;
pub mod services;

pub use factory::{StoreFactory, StoreType};
pub use repositories::LocalStore;
#[cfg(feature = "file-store")]
pub use repositories::FileStore;
pub use repository::{SnapshotStore, StoreError, StoreResult};
pub use services::{load_workspace, persist, LoadOutcome, PersistOutcome};
