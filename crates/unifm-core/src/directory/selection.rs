//! Selection and its derived aggregates.
//!
//! Aggregates over metadata follow an "unknown beats false" rule: as soon as
//! one selected entry has not had the relevant property fetched, the
//! aggregate is `None`. A count of `Some(0)` therefore always means every
//! selected entry is known not to have the property.

use serde::{Deserialize, Serialize};

use crate::directory::tasks::FileTasks;
use crate::entry::cache::EntryCache;
use crate::entry::record::{props, EntryRecord};

/// The active selection in the current directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub keys: Vec<String>,
    pub dir_count: usize,
    pub file_count: usize,
    pub hosted_count: Option<usize>,
    pub offline_cached_count: Option<usize>,
    pub pinned_count: Option<usize>,
    pub any_restricted: Option<bool>,
    pub file_tasks: Option<FileTasks>,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            keys: Vec::new(),
            dir_count: 0,
            file_count: 0,
            hosted_count: Some(0),
            offline_cached_count: Some(0),
            pinned_count: Some(0),
            any_restricted: Some(false),
            file_tasks: None,
        }
    }
}

/// Adds one entry's property to a count aggregate.
fn tally(acc: Option<usize>, value: Option<bool>) -> Option<usize> {
    match (acc, value) {
        (Some(n), Some(true)) => Some(n + 1),
        (Some(n), Some(false)) => Some(n),
        _ => None,
    }
}

/// Adds one entry's property to an "any" aggregate.
fn any(acc: Option<bool>, value: Option<bool>) -> Option<bool> {
    match (acc, value) {
        (Some(a), Some(v)) => Some(a || v),
        _ => None,
    }
}

impl Selection {
    /// Computes a fresh selection over `keys`. Duplicate keys are dropped
    /// keeping the first occurrence; keys missing from the cache stay in
    /// `keys` but are skipped by every aggregate.
    pub fn compute(keys: &[String], cache: &EntryCache) -> Self {
        let mut unique: Vec<String> = Vec::with_capacity(keys.len());
        for key in keys {
            if !unique.contains(key) {
                unique.push(key.clone());
            }
        }

        let entries: Vec<&EntryRecord> = unique
            .iter()
            .filter_map(|key| {
                let entry = cache.get(key);
                if entry.is_none() {
                    tracing::warn!("selected entry not cached, skipping: {key}");
                }
                entry
            })
            .collect();

        let dir_count = entries.iter().filter(|e| e.is_directory).count();
        let base = Self::default();
        entries.iter().fold(
            Self {
                keys: unique.clone(),
                dir_count,
                file_count: entries.len() - dir_count,
                ..base
            },
            |acc, entry| Self {
                hosted_count: tally(acc.hosted_count, entry.metadata_bool(props::HOSTED)),
                offline_cached_count: tally(
                    acc.offline_cached_count,
                    entry.metadata_bool(props::AVAILABLE_OFFLINE),
                ),
                pinned_count: tally(acc.pinned_count, entry.metadata_bool(props::PINNED)),
                any_restricted: any(
                    acc.any_restricted,
                    entry.metadata_bool(props::IS_DLP_RESTRICTED),
                ),
                ..acc
            },
        )
    }

    /// Recomputes the aggregates from the cache, keeping the task record.
    #[must_use]
    pub fn recomputed(self, cache: &EntryCache) -> Self {
        Self {
            file_tasks: self.file_tasks,
            ..Self::compute(&self.keys, cache)
        }
    }

    /// Returns a copy with the task record replaced and everything else kept.
    #[must_use]
    pub fn with_file_tasks(self, file_tasks: Option<FileTasks>) -> Self {
        Self { file_tasks, ..self }
    }

    /// Returns a copy restricted to keys that satisfy `keep`.
    #[must_use]
    pub fn retaining(self, cache: &EntryCache, keep: impl Fn(&str) -> bool) -> Self {
        if self.keys.iter().all(|k| keep(k)) {
            return self;
        }
        let keys: Vec<String> = self.keys.iter().filter(|k| keep(k)).cloned().collect();
        Self {
            file_tasks: None,
            ..Self::compute(&keys, cache)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
