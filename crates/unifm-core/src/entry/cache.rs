//! The entry cache: every entry ever observed, keyed by entry key.
//!
//! Incoming records are merged rather than overwritten (see
//! [`EntryCache::upsert`]). Entries leave the cache only through the
//! reachability collector, which [`EntryCache::retain`] serves. Every
//! insertion marks a sweep as pending; the flag is a single boolean, so any
//! number of upserts between two sweeps leaves exactly one sweep pending.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::entry::record::{EntryKind, EntryRecord};

/// Key → record map plus the pending-sweep flag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryCache {
    entries: BTreeMap<String, EntryRecord>,
    sweep_pending: bool,
}

impl EntryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&EntryRecord> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over all records in key order.
    pub fn iter(&self) -> impl Iterator<Item = &EntryRecord> {
        self.entries.values()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    /// Returns `true` if a reachability sweep has been scheduled and has
    /// not run yet.
    pub fn sweep_pending(&self) -> bool {
        self.sweep_pending
    }

    /// Merges `incoming` into the cache.
    ///
    /// New fields overwrite old ones, except:
    /// - metadata maps are merged key by key;
    /// - `expanded`, `is_ejectable`, `should_delay_loading_children` and
    ///   `children` keep the stored value unless `incoming` carries a
    ///   non-default one.
    ///
    /// A native record never replaces a stored volume root with the same
    /// key; such an upsert is a no-op and returns `false`.
    pub fn upsert(&mut self, incoming: EntryRecord) -> bool {
        self.sweep_pending = true;
        let merged = match self.entries.get(&incoming.key) {
            Some(existing)
                if existing.kind == EntryKind::VolumeRoot
                    && incoming.kind == EntryKind::Native =>
            {
                tracing::debug!(
                    "ignoring native upsert over volume root: {}",
                    incoming.key
                );
                return false;
            }
            Some(existing) => merge(existing, incoming),
            None => incoming,
        };
        self.entries.insert(merged.key.clone(), merged);
        true
    }

    /// Stores `record` as-is, replacing any existing record.
    ///
    /// Used by composition rules that explicitly recompute the fields the
    /// read-merge would otherwise preserve.
    pub fn put(&mut self, record: EntryRecord) {
        self.sweep_pending = true;
        self.entries.insert(record.key.clone(), record);
    }

    /// Replaces the record under `key` with `f(record)`.
    ///
    /// Returns `false` (and does nothing) when `key` is not cached.
    pub fn update(&mut self, key: &str, f: impl FnOnce(EntryRecord) -> EntryRecord) -> bool {
        let Some(existing) = self.entries.get(key).cloned() else {
            return false;
        };
        let mut next = f(existing);
        next.key = key.to_string();
        self.entries.insert(next.key.clone(), next);
        true
    }

    /// Removes a record outright. Only composition rules dropping their own
    /// synthetic containers call this; everything else is left to sweeps.
    pub fn remove(&mut self, key: &str) -> Option<EntryRecord> {
        self.entries.remove(key)
    }

    /// Keeps only the records whose key is in `keep` and clears the
    /// pending-sweep flag. Returns the number of evicted records.
    pub fn retain(&mut self, keep: &HashSet<String>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| keep.contains(key));
        self.sweep_pending = false;
        before - self.entries.len()
    }
}

fn merge(existing: &EntryRecord, incoming: EntryRecord) -> EntryRecord {
    let mut metadata = existing.metadata.clone();
    metadata.extend(incoming.metadata);

    let children = if incoming.children.is_empty() {
        existing.children.clone()
    } else {
        incoming.children
    };

    EntryRecord {
        metadata,
        children,
        expanded: existing.expanded || incoming.expanded,
        is_ejectable: existing.is_ejectable || incoming.is_ejectable,
        should_delay_loading_children: existing.should_delay_loading_children
            || incoming.should_delay_loading_children,
        ..incoming
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::record::props;
    use serde_json::json;

    fn native(key: &str) -> EntryRecord {
        EntryRecord::new(key, EntryKind::Native, key)
    }

    fn volume_root(key: &str) -> EntryRecord {
        EntryRecord {
            is_root_entry: true,
            ..EntryRecord::new(key, EntryKind::VolumeRoot, "Root")
        }
    }

    // --- upsert ---

    #[test]
    fn upsert_inserts_new_record() {
        let mut cache = EntryCache::new();
        assert!(cache.upsert(native("a")));
        assert_eq!(cache.len(), 1);
        assert!(cache.contains("a"));
    }

    #[test]
    fn upsert_overwrites_plain_fields() {
        let mut cache = EntryCache::new();
        cache.upsert(native("a"));
        cache.upsert(EntryRecord {
            label: "renamed".into(),
            ..native("a")
        });
        assert_eq!(cache.get("a").unwrap().label, "renamed");
    }

    #[test]
    fn upsert_preserves_expanded_and_children() {
        let mut cache = EntryCache::new();
        cache.upsert(EntryRecord {
            expanded: true,
            is_ejectable: true,
            should_delay_loading_children: true,
            children: vec!["a/b".into()],
            ..native("a")
        });
        cache.upsert(native("a"));

        let record = cache.get("a").unwrap();
        assert!(record.expanded);
        assert!(record.is_ejectable);
        assert!(record.should_delay_loading_children);
        assert_eq!(record.children, vec!["a/b"]);
    }

    #[test]
    fn upsert_takes_new_children_when_given() {
        let mut cache = EntryCache::new();
        cache.upsert(native("a").with_children(vec!["x".into()]));
        cache.upsert(native("a").with_children(vec!["y".into()]));
        assert_eq!(cache.get("a").unwrap().children, vec!["y"]);
    }

    #[test]
    fn upsert_merges_metadata() {
        let mut cache = EntryCache::new();
        let mut first = native("a");
        first.metadata.insert(props::HOSTED.into(), json!(true));
        cache.upsert(first);

        let mut second = native("a");
        second.metadata.insert(props::PINNED.into(), json!(false));
        cache.upsert(second);

        let record = cache.get("a").unwrap();
        assert_eq!(record.metadata_bool(props::HOSTED), Some(true));
        assert_eq!(record.metadata_bool(props::PINNED), Some(false));
    }

    #[test]
    fn native_upsert_never_downgrades_volume_root() {
        let mut cache = EntryCache::new();
        cache.upsert(volume_root("fs://usb/"));
        assert!(!cache.upsert(native("fs://usb/")));
        assert_eq!(cache.get("fs://usb/").unwrap().kind, EntryKind::VolumeRoot);
    }

    #[test]
    fn volume_root_may_replace_native() {
        let mut cache = EntryCache::new();
        cache.upsert(native("fs://usb/"));
        assert!(cache.upsert(volume_root("fs://usb/")));
        assert_eq!(cache.get("fs://usb/").unwrap().kind, EntryKind::VolumeRoot);
    }

    // --- sweep flag ---

    #[test]
    fn repeated_upserts_leave_one_pending_sweep() {
        let mut cache = EntryCache::new();
        assert!(!cache.sweep_pending());
        cache.upsert(native("a"));
        cache.upsert(native("b"));
        cache.upsert(native("c"));
        assert!(cache.sweep_pending());

        cache.retain(&HashSet::new());
        assert!(!cache.sweep_pending());
    }

    #[test]
    fn retain_evicts_unlisted_keys() {
        let mut cache = EntryCache::new();
        cache.upsert(native("a"));
        cache.upsert(native("b"));
        let keep: HashSet<String> = ["a".to_string()].into_iter().collect();
        assert_eq!(cache.retain(&keep), 1);
        assert!(cache.contains("a"));
        assert!(!cache.contains("b"));
    }

    // --- update / put ---

    #[test]
    fn update_can_reset_preserved_fields() {
        let mut cache = EntryCache::new();
        cache.upsert(EntryRecord {
            is_ejectable: true,
            ..native("a")
        });
        assert!(cache.update("a", |r| EntryRecord {
            is_ejectable: false,
            ..r
        }));
        assert!(!cache.get("a").unwrap().is_ejectable);
    }

    #[test]
    fn update_missing_key_is_noop() {
        let mut cache = EntryCache::new();
        assert!(!cache.update("nope", |r| r));
        assert!(cache.is_empty());
    }

    #[test]
    fn put_replaces_wholesale() {
        let mut cache = EntryCache::new();
        cache.upsert(native("a").with_children(vec!["x".into()]));
        cache.put(native("a"));
        assert!(cache.get("a").unwrap().children.is_empty());
    }
}
