//! Import and export of snapshot documents.
//!
//! Exports are pretty-printed JSON with every `savedAt` refreshed to the
//! export time. Imports accept anything the document parser does and never
//! fail: a bad file yields an [`ImportOutcome`] without a payload and with a
//! message for the user.
//!
//! # Example
//!
//! ```no_run
//! use bracketcast::core::Workspace;
//! use bracketcast::io::{apply_import, import_file};
//! use std::path::Path;
//!
//! let outcome = import_file(Path::new("bracketcast-2024-07-01.json"));
//! println!("{}", outcome.message);
//! if let Some(payload) = outcome.payload {
//!     let workspace = apply_import(&Workspace::default(), payload);
//!     println!("{} snapshots", workspace.snapshot_count());
//! }
//! ```

pub mod export;
pub mod import;

#[cfg(test)]
mod import_tests;

pub use export::{
    export_document, export_file_name, export_snapshots, export_workspace, write_export, ExportScope,
};
pub use import::{apply_import, import_file, import_str, ImportOutcome};
