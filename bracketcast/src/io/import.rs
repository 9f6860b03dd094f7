use anyhow::{Context, Result};
use std::path::Path;

use crate::core::domain::{Workspace, DEFAULT_GROUP};
use crate::parsing::document::{parse_document_str, DocumentPayload};
use crate::parsing::validator::ValidationReport;

/// Result of an import attempt.
///
/// A failed import carries no payload and a message for the user; it is never
/// an error for the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportOutcome {
    pub payload: Option<DocumentPayload>,
    pub message: String,
    pub report: ValidationReport,
}

impl ImportOutcome {
    pub fn is_success(&self) -> bool {
        self.payload.is_some()
    }

    fn failed(error: anyhow::Error) -> Self {
        let message = format!("Import failed: {:#}", error);
        log::warn!("{}", message);
        Self {
            payload: None,
            message,
            report: ValidationReport::new(),
        }
    }
}

/// Import a document from a string.
pub fn import_str(json_str: &str) -> ImportOutcome {
    match parse_document_str(json_str) {
        Ok(parsed) => {
            let count = parsed.payload.snapshot_count();
            let mut message = match &parsed.payload {
                DocumentPayload::Snapshots(_) => format!("Imported {} snapshots", count),
                DocumentPayload::Legacy(_) => format!(
                    "Imported {} snapshots from an older format into group '{}'",
                    count, DEFAULT_GROUP
                ),
                DocumentPayload::Workspace(ws) => format!(
                    "Imported {} snapshots in {} groups",
                    count,
                    ws.groups.len()
                ),
            };
            if !parsed.report.is_clean() {
                message.push_str(&format!(" ({} skipped records)", parsed.report.warnings.len()));
            }
            log::info!("{}", message);
            ImportOutcome {
                payload: Some(parsed.payload),
                message,
                report: parsed.report,
            }
        }
        Err(e) => ImportOutcome::failed(e),
    }
}

/// Import a document from a file.
pub fn import_file(path: &Path) -> ImportOutcome {
    match read_file(path) {
        Ok(content) => import_str(&content),
        Err(e) => ImportOutcome::failed(e),
    }
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read import file: {}", path.display()))
}

/// Apply an imported payload to a workspace, returning the new workspace.
///
/// A plain snapshot array replaces the active group's snapshots, a legacy
/// array replaces the default group's snapshots, and a grouped document
/// replaces the workspace outright. Rows are kept unless the whole
/// workspace is replaced.
pub fn apply_import(workspace: &Workspace, payload: DocumentPayload) -> Workspace {
    match payload {
        DocumentPayload::Snapshots(snapshots) => {
            let mut next = workspace.clone();
            next.active_mut().snapshots = snapshots;
            next
        }
        DocumentPayload::Legacy(snapshots) => {
            let mut next = workspace.clone();
            next.group_mut(DEFAULT_GROUP).snapshots = snapshots;
            next
        }
        DocumentPayload::Workspace(imported) => imported.normalized(),
    }
}
