//! Store implementations module.
//!
//! This module contains different implementations of the `SnapshotStore` trait:
//! - `local`: In-memory implementation for unit testing and embedding
//! - `file`: Single JSON file on disk, replaced atomically on every write

#[cfg(feature = "file-store")]
pub mod file;
pub mod local;

#[cfg(feature = "file-store")]
pub use file::FileStore;
pub use local::LocalStore;
