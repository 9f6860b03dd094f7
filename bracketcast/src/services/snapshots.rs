//! Snapshot collection operations.
//!
//! Collections are values: each operation takes the current collection and
//! returns a new one, which the caller then persists wholesale. Collections
//! are kept newest first.

use chrono::{DateTime, Utc};

use crate::core::domain::{BracketScheme, Snapshot, SnapshotId, WeightMode};

/// Derive a unique id from the save time, suffixing `-<n>` on collision.
pub fn next_snapshot_id(existing: &[Snapshot], now: DateTime<Utc>) -> SnapshotId {
    let base = format!("snap-{}", now.timestamp_millis());
    let taken = |candidate: &str| existing.iter().any(|s| s.id.as_str() == candidate);

    if !taken(&base) {
        return SnapshotId(base);
    }
    let mut n = 1;
    loop {
        let candidate = format!("{}-{}", base, n);
        if !taken(&candidate) {
            return SnapshotId(candidate);
        }
        n += 1;
    }
}

/// Save a computed distribution as a new snapshot at the front of the collection.
///
/// The scheme is copied so later scheme edits do not alter the saved record.
/// Non-finite probabilities are stored as 0, since JSON cannot hold them.
/// Returns the new collection and the id assigned.
pub fn save_snapshot(
    collection: &[Snapshot],
    name: &str,
    scheme: &BracketScheme,
    probs: &[f64],
    weight_mode: WeightMode,
    now: DateTime<Utc>,
) -> (Vec<Snapshot>, SnapshotId) {
    let id = next_snapshot_id(collection, now);
    let name = if name.trim().is_empty() {
        now.format("%Y-%m-%d %H:%M").to_string()
    } else {
        name.trim().to_string()
    };

    let non_finite = probs.iter().filter(|p| !p.is_finite()).count();
    if non_finite > 0 {
        log::warn!("Stored {} non-finite probabilities as 0 in snapshot {}", non_finite, id);
    }

    let snapshot = Snapshot {
        id: id.clone(),
        saved_at: now,
        name,
        scheme: scheme.clone(),
        probs: probs.iter().map(|p| if p.is_finite() { *p } else { 0.0 }).collect(),
        weight_mode,
        actual: None,
    };
    log::info!("Saved snapshot {} ('{}')", snapshot.id, snapshot.name);

    let mut next = Vec::with_capacity(collection.len() + 1);
    next.push(snapshot);
    next.extend_from_slice(collection);
    (next, id)
}

/// Attach the realized outcome to a snapshot.
///
/// A non-finite value is treated as empty input and leaves the collection
/// unchanged, as does an unknown id.
pub fn attach_actual(collection: &[Snapshot], id: &SnapshotId, value: f64) -> Vec<Snapshot> {
    if !value.is_finite() {
        log::warn!("Ignoring non-numeric outcome for snapshot {}", id);
        return collection.to_vec();
    }
    update(collection, id, |s| s.actual = Some(value))
}

/// Remove the realized outcome from a snapshot.
pub fn clear_actual(collection: &[Snapshot], id: &SnapshotId) -> Vec<Snapshot> {
    update(collection, id, |s| s.actual = None)
}

/// Remove a snapshot from the collection.
pub fn delete_snapshot(collection: &[Snapshot], id: &SnapshotId) -> Vec<Snapshot> {
    let next: Vec<Snapshot> = collection.iter().filter(|s| &s.id != id).cloned().collect();
    if next.len() == collection.len() {
        log::debug!("Delete of unknown snapshot {} ignored", id);
    }
    next
}

/// Look a snapshot up by id.
pub fn find_snapshot<'a>(collection: &'a [Snapshot], id: &SnapshotId) -> Option<&'a Snapshot> {
    collection.iter().find(|s| &s.id == id)
}

fn update(collection: &[Snapshot], id: &SnapshotId, apply: impl Fn(&mut Snapshot)) -> Vec<Snapshot> {
    let mut found = false;
    let next: Vec<Snapshot> = collection
        .iter()
        .cloned()
        .map(|mut s| {
            if &s.id == id {
                apply(&mut s);
                found = true;
            }
            s
        })
        .collect();
    if !found {
        log::debug!("Snapshot {} not found; collection unchanged", id);
    }
    next
}
