use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

use crate::core::domain::{Snapshot, Workspace};
use crate::parsing::document::{snapshots_to_json, workspace_to_json};

/// Prefix of generated export file names.
pub const EXPORT_FILE_PREFIX: &str = "bracketcast";

/// What an export should contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportScope {
    /// The active group's snapshot array.
    ActiveGroup,
    /// Every group, rows included.
    Workspace,
}

fn stamped(snapshots: &[Snapshot], now: DateTime<Utc>) -> Vec<Snapshot> {
    snapshots
        .iter()
        .map(|s| Snapshot {
            saved_at: now,
            ..s.clone()
        })
        .collect()
}

/// Export one snapshot collection as a pretty-printed JSON array, with every
/// `savedAt` refreshed to `now`.
pub fn export_snapshots(snapshots: &[Snapshot], now: DateTime<Utc>) -> Result<String> {
    snapshots_to_json(&stamped(snapshots, now)).context("Failed to export snapshots")
}

/// Export the whole workspace as a grouped document, with every `savedAt`
/// refreshed to `now`.
pub fn export_workspace(workspace: &Workspace, now: DateTime<Utc>) -> Result<String> {
    let mut exported = workspace.clone();
    for group in exported.groups.values_mut() {
        group.snapshots = stamped(&group.snapshots, now);
    }
    workspace_to_json(&exported).context("Failed to export workspace")
}

/// Export according to `scope`.
pub fn export_document(workspace: &Workspace, scope: ExportScope, now: DateTime<Utc>) -> Result<String> {
    match scope {
        ExportScope::ActiveGroup => export_snapshots(&workspace.active().snapshots, now),
        ExportScope::Workspace => export_workspace(workspace, now),
    }
}

/// Date-stamped export file name, e.g. `bracketcast-2024-07-01.json`.
pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("{}-{}.json", EXPORT_FILE_PREFIX, now.format("%Y-%m-%d"))
}

/// Write an export into `dir` under [`export_file_name`]; returns the path.
pub fn write_export(
    dir: &Path,
    workspace: &Workspace,
    scope: ExportScope,
    now: DateTime<Utc>,
) -> Result<PathBuf> {
    let content = export_document(workspace, scope, now)?;
    let path = dir.join(export_file_name(now));
    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write export: {}", path.display()))?;
    log::info!("Exported {:?} to {}", scope, path.display());
    Ok(path)
}
