//! The complete core state and read accessors over it.

use serde::{Deserialize, Serialize};

use crate::directory::current::CurrentDirectory;
use crate::entry::cache::EntryCache;
use crate::entry::record::EntryRecord;
use crate::error::{CoreError, CoreResult};
use crate::lookup::LookupSequencer;
use crate::nav::apps::AndroidApp;
use crate::nav::roots::NavigationRoot;
use crate::nav::shortcuts::Shortcuts;
use crate::volume::compose::my_files_placeholder;
use crate::volume::registry::{Volume, VolumeRegistry};

/// One immutable snapshot of everything the core knows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub all_entries: EntryCache,
    pub volumes: VolumeRegistry,
    pub current_directory: Option<CurrentDirectory>,
    /// Keys of registered virtual entries (Recent, Trash, placeholders), in
    /// registration order.
    pub ui_entries: Vec<String>,
    pub shortcuts: Shortcuts,
    pub android_apps: Vec<AndroidApp>,
    pub navigation: Vec<NavigationRoot>,
    pub lookups: LookupSequencer,
}

impl State {
    /// Initial state: no volumes, only the placeholder My files container.
    pub fn new() -> Self {
        let mut all_entries = EntryCache::new();
        all_entries.put(my_files_placeholder());
        Self {
            all_entries,
            volumes: VolumeRegistry::new(),
            current_directory: None,
            ui_entries: Vec::new(),
            shortcuts: Shortcuts::new(),
            android_apps: Vec::new(),
            navigation: Vec::new(),
            lookups: LookupSequencer::new(),
        }
    }

    /// Serializes the snapshot as JSON.
    pub fn to_json(&self) -> CoreResult<String> {
        serde_json::to_string(self).map_err(|e| CoreError::Io(e.into()))
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

pub fn get_entry<'a>(state: &'a State, key: &str) -> Option<&'a EntryRecord> {
    state.all_entries.get(key)
}

pub fn get_volume<'a>(state: &'a State, volume_id: &str) -> Option<&'a Volume> {
    state.volumes.get(volume_id)
}

pub fn get_navigation_roots(state: &State) -> &[NavigationRoot] {
    &state.navigation
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::record::MY_FILES_PLACEHOLDER_KEY;

    #[test]
    fn new_state_has_placeholder() {
        let state = State::new();
        assert!(get_entry(&state, MY_FILES_PLACEHOLDER_KEY).is_some());
        assert!(get_volume(&state, "downloads").is_none());
        assert!(get_navigation_roots(&state).is_empty());
    }

    #[test]
    fn json_snapshot_round_trips() {
        let state = State::new();
        let json = state.to_json().unwrap();
        let back: State = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
