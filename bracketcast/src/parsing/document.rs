use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

use crate::core::domain::{Group, Snapshot, SourceRow, Workspace, DEFAULT_GROUP};
use crate::parsing::validator::{normalize_group, normalize_snapshots, ValidationReport};

/// Version tag written into grouped documents.
pub const DOCUMENT_VERSION: u32 = 2;

/// Key of the grouped configuration inside a document object.
pub const CONFIG_KEY: &str = "config";

/// What a document contained, after migration and validation.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentPayload {
    /// A plain snapshot array.
    Snapshots(Vec<Snapshot>),
    /// A snapshot array in the old format, with per-snapshot row data
    /// already stripped. Belongs to the default group.
    Legacy(Vec<Snapshot>),
    /// A grouped workspace.
    Workspace(Workspace),
}

impl DocumentPayload {
    /// Interpret the payload as a complete workspace. Bare snapshot arrays
    /// become the default group's history.
    pub fn into_workspace(self) -> Workspace {
        match self {
            DocumentPayload::Workspace(ws) => ws.normalized(),
            DocumentPayload::Snapshots(snapshots) | DocumentPayload::Legacy(snapshots) => {
                let mut ws = Workspace::default();
                ws.group_mut(DEFAULT_GROUP).snapshots = snapshots;
                ws
            }
        }
    }

    pub fn snapshot_count(&self) -> usize {
        match self {
            DocumentPayload::Snapshots(s) | DocumentPayload::Legacy(s) => s.len(),
            DocumentPayload::Workspace(ws) => ws.snapshot_count(),
        }
    }
}

/// A parsed document together with its validation report.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument {
    pub payload: DocumentPayload,
    pub report: ValidationReport,
}

#[derive(Serialize)]
struct WorkspaceDocument<'a> {
    version: u32,
    config: &'a Workspace,
}

/// Parse a snapshot document from a file.
pub fn parse_document_file(path: &Path) -> Result<ParsedDocument> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read document: {}", path.display()))?;
    parse_document_str(&content)
}

/// Parse a snapshot document from a string.
///
/// Accepts either a JSON array of snapshots (current or legacy shape) or an
/// object whose `config` entry holds the grouped workspace. The `config`
/// entry may itself be a JSON-encoded string. Individual records that cannot
/// be read are dropped and reported; only a wrong top-level shape or invalid
/// JSON is an error.
pub fn parse_document_str(json_str: &str) -> Result<ParsedDocument> {
    let value: Value = serde_json::from_str(json_str).with_context(|| {
        let preview: String = json_str.chars().take(200).collect();
        format!("Invalid JSON syntax. First 200 chars: {}", preview)
    })?;

    let mut report = ValidationReport::new();
    let payload = match value {
        Value::Array(items) => {
            let (snapshots, legacy) = parse_snapshot_array(items, "snapshots", &mut report);
            let snapshots = normalize_snapshots(snapshots, &mut report);
            if legacy {
                log::info!("Migrating legacy snapshot array with embedded rows");
                DocumentPayload::Legacy(snapshots)
            } else {
                DocumentPayload::Snapshots(snapshots)
            }
        }
        Value::Object(mut map) => {
            let config = map.remove(CONFIG_KEY).with_context(|| {
                format!(
                    "Document object must contain a '{}' entry. Found keys: {:?}",
                    CONFIG_KEY,
                    map.keys().collect::<Vec<_>>()
                )
            })?;
            DocumentPayload::Workspace(parse_config(config, &mut report)?)
        }
        other => anyhow::bail!(
            "Expected a JSON array of snapshots or an object with a '{}' entry, found {}",
            CONFIG_KEY,
            json_type(&other)
        ),
    };

    Ok(ParsedDocument { payload, report })
}

/// Serialize a workspace as a grouped document (pretty-printed).
pub fn workspace_to_json(workspace: &Workspace) -> Result<String> {
    serde_json::to_string_pretty(&WorkspaceDocument {
        version: DOCUMENT_VERSION,
        config: workspace,
    })
    .context("Failed to serialize workspace")
}

/// Serialize a snapshot collection as a bare array (pretty-printed).
pub fn snapshots_to_json(snapshots: &[Snapshot]) -> Result<String> {
    serde_json::to_string_pretty(snapshots).context("Failed to serialize snapshots")
}

fn parse_config(config: Value, report: &mut ValidationReport) -> Result<Workspace> {
    let config = match config {
        Value::String(encoded) => serde_json::from_str::<Value>(&encoded)
            .context("The 'config' entry is a string but not valid JSON")?,
        other => other,
    };
    let mut config = match config {
        Value::Object(map) => map,
        other => anyhow::bail!("The 'config' entry must be an object, found {}", json_type(&other)),
    };

    let active_group = config
        .remove("activeGroup")
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_else(|| DEFAULT_GROUP.to_string());

    let mut workspace = Workspace {
        active_group,
        groups: Default::default(),
    };

    match config.remove("groups") {
        Some(Value::Object(groups)) => {
            for (name, group) in groups {
                let group = parse_group(&name, group, report);
                workspace.groups.insert(name, group);
            }
        }
        Some(other) => report.add_warning(format!(
            "Ignored 'groups' entry of type {}; expected an object",
            json_type(&other)
        )),
        None => {}
    }

    Ok(workspace.normalized())
}

fn parse_group(name: &str, value: Value, report: &mut ValidationReport) -> Group {
    let Value::Object(mut map) = value else {
        report.add_warning(format!("Group '{}' is not an object; replaced by an empty group", name));
        return Group::default();
    };

    let rows: Vec<SourceRow> = match map.remove("rows") {
        Some(Value::Array(items)) => items
            .into_iter()
            .enumerate()
            .filter_map(|(idx, item)| {
                read_record(item, &format!("group '{}' row {}", name, idx), report)
            })
            .collect(),
        _ => Vec::new(),
    };
    let snapshots = match map.remove("snapshots") {
        Some(Value::Array(items)) => {
            parse_snapshot_array(items, &format!("group '{}'", name), report).0
        }
        _ => Vec::new(),
    };

    normalize_group(name, Group { rows, snapshots }, report)
}

/// Read snapshot records, stripping legacy embedded rows. Returns the
/// snapshots and whether any legacy record was seen.
fn parse_snapshot_array(items: Vec<Value>, context: &str, report: &mut ValidationReport) -> (Vec<Snapshot>, bool) {
    let mut legacy = false;
    let snapshots = items
        .into_iter()
        .enumerate()
        .filter_map(|(idx, mut item)| {
            if let Some(obj) = item.as_object_mut() {
                if obj.remove("rows").is_some() {
                    legacy = true;
                    report.stats.legacy_rows_stripped += 1;
                }
            }
            read_record(item, &format!("{} snapshot {}", context, idx), report)
        })
        .collect();
    (snapshots, legacy)
}

fn read_record<T: DeserializeOwned>(item: Value, what: &str, report: &mut ValidationReport) -> Option<T> {
    match serde_path_to_error::deserialize::<_, T>(item) {
        Ok(record) => Some(record),
        Err(err) => {
            report.stats.unreadable_records += 1;
            report.add_warning(format!("Skipped unreadable {} at '{}': {}", what, err.path(), err.inner()));
            None
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
