#[cfg(test)]
mod tests {
    use crate::core::domain::{BracketScheme, Snapshot, SourceRow, WeightMode, Workspace, DEFAULT_GROUP};
    use crate::io::export::{export_snapshots, export_workspace, write_export, ExportScope};
    use crate::io::import::{apply_import, import_file, import_str};
    use crate::parsing::document::DocumentPayload;
    use crate::services::snapshots::{attach_actual, save_snapshot};
    use chrono::{DateTime, TimeZone, Utc};
    use tempfile::TempDir;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 1, hour, 0, 0).unwrap()
    }

    fn scheme() -> BracketScheme {
        BracketScheme::from_pairs(&[("<=91", 91.0), ("92-93", 93.0), ("94+", f64::INFINITY)])
    }

    fn collection() -> Vec<Snapshot> {
        let (snaps, first) = save_snapshot(&[], "Mon", &scheme(), &[0.2, 0.5, 0.3], WeightMode::Manual, at(8));
        let snaps = attach_actual(&snaps, &first, 92.0);
        let (snaps, _) = save_snapshot(&snaps, "Tue", &scheme(), &[0.1, 0.3, 0.6], WeightMode::Auto, at(9));
        snaps
    }

    fn without_saved_at(snapshots: &[Snapshot]) -> Vec<Snapshot> {
        snapshots
            .iter()
            .map(|s| Snapshot {
                saved_at: at(0),
                ..s.clone()
            })
            .collect()
    }

    /// Test that exported snapshots import back with equal content
    #[test]
    fn test_snapshot_export_import_roundtrip() {
        let original = collection();
        let json = export_snapshots(&original, at(18)).unwrap();

        let outcome = import_str(&json);
        assert!(outcome.is_success(), "{}", outcome.message);
        let Some(DocumentPayload::Snapshots(imported)) = outcome.payload else {
            panic!("expected a snapshot array");
        };
        assert!(imported.iter().all(|s| s.saved_at == at(18)));
        assert_eq!(without_saved_at(&imported), without_saved_at(&original));
    }

    /// Test that a whole-workspace export imports back as a workspace
    #[test]
    fn test_workspace_export_import_roundtrip() {
        let mut ws = Workspace::default();
        ws.group_mut("Austin").snapshots = collection();
        ws.group_mut("Austin").rows = vec![SourceRow::new(1, "NWS", 93.0, 1.5)];
        ws.active_group = "Austin".to_string();

        let json = export_workspace(&ws, at(18)).unwrap();
        let outcome = import_str(&json);
        let Some(DocumentPayload::Workspace(imported)) = outcome.payload else {
            panic!("expected a workspace");
        };
        assert_eq!(imported.active_group, "Austin");
        assert_eq!(imported.active().rows, ws.active().rows);
        assert_eq!(
            without_saved_at(&imported.active().snapshots),
            without_saved_at(&ws.active().snapshots)
        );
    }

    /// Test that a plain array replaces only the active group's snapshots
    #[test]
    fn test_apply_plain_array_to_active_group() {
        let mut ws = Workspace::default();
        ws.group_mut("Austin").rows = vec![SourceRow::new(1, "NWS", 93.0, 1.0)];
        ws.group_mut(DEFAULT_GROUP).snapshots = collection();
        ws.active_group = "Austin".to_string();

        let payload = DocumentPayload::Snapshots(collection()[..1].to_vec());
        let next = apply_import(&ws, payload);

        assert_eq!(next.active().snapshots.len(), 1);
        assert_eq!(next.active().rows.len(), 1);
        assert_eq!(next.group(DEFAULT_GROUP).unwrap().snapshots.len(), 2);
        assert!(ws.active().snapshots.is_empty());
    }

    /// Test that a legacy array always lands in the default group
    #[test]
    fn test_apply_legacy_array_to_default_group() {
        let mut ws = Workspace::default();
        ws.group_mut("Austin");
        ws.active_group = "Austin".to_string();

        let next = apply_import(&ws, DocumentPayload::Legacy(collection()));
        assert!(next.active().snapshots.is_empty());
        assert_eq!(next.group(DEFAULT_GROUP).unwrap().snapshots.len(), 2);
    }

    /// Test that a workspace payload without the default group is normalized
    #[test]
    fn test_apply_workspace_payload_normalizes() {
        let mut imported = Workspace::default();
        imported.groups.clear();
        imported.group_mut("Denver");
        imported.active_group = "Nowhere".to_string();

        let next = apply_import(&Workspace::default(), DocumentPayload::Workspace(imported));
        assert!(next.group(DEFAULT_GROUP).is_some());
        assert!(next.group("Denver").is_some());
        assert_eq!(next.active_group, DEFAULT_GROUP);
    }

    /// Test that bad payloads are a no-op with a message
    #[test]
    fn test_bad_payloads_are_noops() {
        for doc in ["{ broken", "\"just a string\"", r#"{"groups": {}}"#] {
            let outcome = import_str(doc);
            assert!(!outcome.is_success());
            assert!(outcome.message.starts_with("Import failed"), "{}", outcome.message);
        }
    }

    /// Test that skipped records are mentioned in the message
    #[test]
    fn test_import_message_counts_skipped_records() {
        let json = r#"[
            {"id": "a", "savedAt": 0, "scheme": [{"label": "x", "max": null}], "probs": [1.0]},
            {"id": "a", "savedAt": 0, "scheme": [{"label": "x", "max": null}], "probs": [1.0]}
        ]"#;
        let outcome = import_str(json);
        assert!(outcome.is_success());
        assert!(outcome.message.contains("1 skipped"), "{}", outcome.message);
    }

    /// Test file export followed by file import
    #[test]
    fn test_write_export_and_import_file() {
        let dir = TempDir::new().unwrap();
        let mut ws = Workspace::default();
        ws.active_mut().snapshots = collection();

        let path = write_export(dir.path(), &ws, ExportScope::ActiveGroup, at(18)).unwrap();
        assert!(path.ends_with("bracketcast-2024-07-01.json"));

        let outcome = import_file(&path);
        assert_eq!(outcome.payload.map(|p| p.snapshot_count()), Some(2));
    }

    /// Test importing a missing file
    #[test]
    fn test_import_missing_file() {
        let outcome = import_file(std::path::Path::new("/nonexistent/bracketcast.json"));
        assert!(!outcome.is_success());
        assert!(outcome.message.contains("Failed to read"));
    }
}
