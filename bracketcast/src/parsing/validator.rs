//! Snapshot and row validation at the storage boundary.
//!
//! Persisted and imported documents are loosely shaped. This module checks
//! them once, drops records that would break collection invariants, and
//! records every drop as a warning so the caller can surface it.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::core::domain::{Group, Snapshot, SourceRow};

/// Outcome of normalizing a document.
///
/// Warnings are informational: a document with warnings still loads, minus
/// the records that were dropped.
///
/// # Examples
///
/// ```
/// use bracketcast::parsing::validator::ValidationReport;
///
/// let mut report = ValidationReport::new();
/// assert!(report.is_clean());
/// report.add_warning("Dropped snapshot with empty id".to_string());
/// assert!(!report.is_clean());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub warnings: Vec<String>,
    pub stats: ValidationStats,
}

/// Counts gathered while validating.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationStats {
    pub total_snapshots: usize,
    pub kept_snapshots: usize,
    pub missing_ids: usize,
    pub duplicate_ids: usize,
    pub shape_mismatches: usize,
    pub unreadable_records: usize,
    pub legacy_rows_stripped: usize,
    pub total_rows: usize,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_warning(&mut self, warning: String) {
        log::warn!("{}", warning);
        self.warnings.push(warning);
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Fold another report into this one.
    pub fn merge(&mut self, other: ValidationReport) {
        self.warnings.extend(other.warnings);
        let s = &mut self.stats;
        let o = other.stats;
        s.total_snapshots += o.total_snapshots;
        s.kept_snapshots += o.kept_snapshots;
        s.missing_ids += o.missing_ids;
        s.duplicate_ids += o.duplicate_ids;
        s.shape_mismatches += o.shape_mismatches;
        s.unreadable_records += o.unreadable_records;
        s.legacy_rows_stripped += o.legacy_rows_stripped;
        s.total_rows += o.total_rows;
    }
}

/// Drop snapshots that would break collection invariants.
///
/// Removed: snapshots with a blank id, later duplicates of an id (the first
/// occurrence wins), and snapshots whose `probs` length differs from their
/// scheme length. Order of the survivors is preserved.
pub fn normalize_snapshots(snapshots: Vec<Snapshot>, report: &mut ValidationReport) -> Vec<Snapshot> {
    report.stats.total_snapshots += snapshots.len();
    let mut seen: HashSet<String> = HashSet::new();
    let mut kept = Vec::with_capacity(snapshots.len());

    for (idx, snapshot) in snapshots.into_iter().enumerate() {
        if snapshot.id.as_str().trim().is_empty() {
            report.stats.missing_ids += 1;
            report.add_warning(format!("Dropped snapshot at index {} with empty id", idx));
            continue;
        }
        if !seen.insert(snapshot.id.as_str().to_string()) {
            report.stats.duplicate_ids += 1;
            report.add_warning(format!("Dropped duplicate snapshot id '{}'", snapshot.id));
            continue;
        }
        if snapshot.probs.len() != snapshot.scheme.len() {
            report.stats.shape_mismatches += 1;
            report.add_warning(format!(
                "Dropped snapshot '{}': {} probabilities for {} brackets",
                snapshot.id,
                snapshot.probs.len(),
                snapshot.scheme.len()
            ));
            continue;
        }
        kept.push(snapshot);
    }

    report.stats.kept_snapshots += kept.len();
    kept
}

/// Check a row set. Rows are kept as-is; only problems are reported.
pub fn check_rows(rows: &[SourceRow], group: &str, report: &mut ValidationReport) {
    report.stats.total_rows += rows.len();
    let mut ids = HashSet::new();
    for row in rows {
        if !ids.insert(row.id) {
            report.add_warning(format!("Group '{}' has duplicate row id {}", group, row.id));
        }
    }
}

/// Normalize one group in place.
pub fn normalize_group(name: &str, group: Group, report: &mut ValidationReport) -> Group {
    check_rows(&group.rows, name, report);
    Group {
        snapshots: normalize_snapshots(group.snapshots, report),
        rows: group.rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::{BracketScheme, SnapshotId, WeightMode};
    use chrono::{TimeZone, Utc};

    fn snap(id: &str, probs: Vec<f64>) -> Snapshot {
        Snapshot {
            id: SnapshotId::from(id),
            saved_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            name: id.to_string(),
            scheme: BracketScheme::from_pairs(&[("a", 1.0), ("b", 2.0)]),
            probs,
            weight_mode: WeightMode::Manual,
            actual: None,
        }
    }

    #[test]
    fn test_normalize_drops_bad_snapshots() {
        let mut report = ValidationReport::new();
        let kept = normalize_snapshots(
            vec![
                snap("a", vec![0.5, 0.5]),
                snap("", vec![0.5, 0.5]),
                snap("a", vec![0.9, 0.1]),
                snap("b", vec![1.0]),
                snap("c", vec![0.2, 0.8]),
            ],
            &mut report,
        );

        let ids: Vec<&str> = kept.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(kept[0].probs, vec![0.5, 0.5]);
        assert_eq!(report.stats.missing_ids, 1);
        assert_eq!(report.stats.duplicate_ids, 1);
        assert_eq!(report.stats.shape_mismatches, 1);
        assert_eq!(report.stats.total_snapshots, 5);
        assert_eq!(report.stats.kept_snapshots, 2);
        assert_eq!(report.warnings.len(), 3);
    }

    #[test]
    fn test_duplicate_row_ids_reported() {
        let mut report = ValidationReport::new();
        let rows = vec![
            SourceRow::new(1, "A", 90.0, 1.0),
            SourceRow::new(1, "B", 91.0, 1.0),
        ];
        check_rows(&rows, "Default", &mut report);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.stats.total_rows, 2);
    }

    #[test]
    fn test_merge_sums_stats() {
        let mut a = ValidationReport::new();
        a.stats.total_snapshots = 2;
        let mut b = ValidationReport::new();
        b.stats.total_snapshots = 3;
        b.warnings.push("x".to_string());
        a.merge(b);
        assert_eq!(a.stats.total_snapshots, 5);
        assert_eq!(a.warnings.len(), 1);
    }
}
