//! Parsers for persisted and imported snapshot documents.
//!
//! Documents come in three shapes: a bare snapshot array, a legacy snapshot
//! array whose records still embed the rows that produced them, and a grouped
//! object whose `config` entry holds named groups. All of them are validated
//! and normalized here, once, so the rest of the crate only sees well-formed
//! collections.
//!
//! # Parsers
//!
//! - [`document`]: Parse and serialize snapshot documents
//! - [`validator`]: Drop records that break collection invariants
//!
//! # Example
//!
//! ```no_run
//! use bracketcast::parsing::document::parse_document_file;
//! use std::path::Path;
//!
//! let parsed = parse_document_file(Path::new("bracketcast-2024-07-01.json"))
//!     .expect("Failed to parse document");
//! println!("{} snapshots", parsed.payload.snapshot_count());
//! ```

pub mod document;
pub mod validator;


pub use document::{
    parse_document_file, parse_document_str, snapshots_to_json, workspace_to_json,
    DocumentPayload, ParsedDocument,
};
pub use validator::{ValidationReport, ValidationStats};
