//! Reachability sweep over the entry cache.
//!
//! The keep set starts from the roots the UI can currently reach: the open
//! directory with its breadcrumb, listing and selection, every volume root
//! and prefix parent, registered virtual entries, shortcuts and the
//! navigation list. Each seed keeps its direct children; beyond that,
//! children are followed only through entries flagged `expanded`.
//! Everything else is evicted. Evicted entries come back the next time an
//! action carries them.

use std::collections::{HashSet, VecDeque};

use crate::state::State;

/// Keys the sweep always keeps.
pub fn seed_keys(state: &State) -> Vec<String> {
    let mut seeds: Vec<String> = Vec::new();

    if let Some(dir) = &state.current_directory {
        seeds.push(dir.key.clone());
        seeds.extend(dir.path_components.iter().map(|c| c.key.clone()));
        seeds.extend(dir.content.iter().cloned());
        seeds.extend(dir.selection.keys.iter().cloned());
    }
    for volume in state.volumes.iter() {
        seeds.extend(volume.root_key.iter().cloned());
        seeds.extend(volume.prefix_key.iter().cloned());
    }
    seeds.extend(state.ui_entries.iter().cloned());
    seeds.extend(state.shortcuts.keys().iter().cloned());
    seeds.extend(state.navigation.iter().map(|n| n.key.clone()));
    seeds
}

/// Computes the set of keys reachable from the seeds.
pub fn mark(state: &State) -> HashSet<String> {
    let cache = &state.all_entries;
    let seeds = seed_keys(state);
    let mut keep: HashSet<String> = seeds.iter().cloned().collect();
    let mut queue: VecDeque<String> = VecDeque::new();

    for seed in &seeds {
        let Some(entry) = cache.get(seed) else {
            continue;
        };
        for child in &entry.children {
            if keep.insert(child.clone()) {
                queue.push_back(child.clone());
            }
        }
        if entry.expanded {
            queue.push_back(seed.clone());
        }
    }

    let mut visited: HashSet<String> = HashSet::new();
    while let Some(key) = queue.pop_front() {
        if !visited.insert(key.clone()) {
            continue;
        }
        let Some(entry) = cache.get(&key) else {
            continue;
        };
        if !entry.expanded {
            continue;
        }
        for child in &entry.children {
            keep.insert(child.clone());
            queue.push_back(child.clone());
        }
    }
    keep
}

/// Evicts every unreachable entry and clears the pending-sweep flag.
pub fn sweep(mut state: State) -> State {
    let keep = mark(&state);
    let evicted = state.all_entries.retain(&keep);
    if evicted > 0 {
        tracing::debug!(
            "sweep evicted {evicted} entries, {} kept",
            state.all_entries.len()
        );
    }
    let cache = &state.all_entries;
    state.lookups.retain_metadata_scopes(|scope| cache.contains(scope));
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::current::CurrentDirectory;
    use crate::entry::record::{EntryKind, EntryRecord, MY_FILES_PLACEHOLDER_KEY};

    fn dir(key: &str, children: &[&str], expanded: bool) -> EntryRecord {
        EntryRecord {
            expanded,
            children: children.iter().map(|c| c.to_string()).collect(),
            ..EntryRecord::new(key, EntryKind::Native, key)
        }
    }

    fn state_with(records: Vec<EntryRecord>, current: Option<&str>) -> State {
        let mut state = State::new();
        for record in records {
            state.all_entries.put(record);
        }
        state.current_directory = current.map(CurrentDirectory::started);
        state.navigation = crate::nav::roots::compose_navigation(&state, &Default::default());
        state
    }

    #[test]
    fn unreachable_entries_are_evicted() {
        let state = state_with(
            vec![
                dir("cur", &["a"], false),
                dir("a", &["a1"], false),
                dir("a1", &[], false),
                dir("orphan", &[], false),
            ],
            Some("cur"),
        );
        let swept = sweep(state);
        assert!(swept.all_entries.contains("cur"));
        assert!(swept.all_entries.contains("a"));
        assert!(!swept.all_entries.contains("a1"));
        assert!(!swept.all_entries.contains("orphan"));
        assert!(swept.all_entries.contains(MY_FILES_PLACEHOLDER_KEY));
        assert!(!swept.all_entries.sweep_pending());
    }

    #[test]
    fn expanded_chains_are_followed() {
        let state = state_with(
            vec![
                dir("cur", &["a"], false),
                dir("a", &["b"], true),
                dir("b", &["c"], true),
                dir("c", &["d"], false),
                dir("d", &[], false),
            ],
            Some("cur"),
        );
        let swept = sweep(state);
        for key in ["cur", "a", "b", "c"] {
            assert!(swept.all_entries.contains(key), "{key} should be kept");
        }
        assert!(!swept.all_entries.contains("d"));
    }

    #[test]
    fn expanded_seed_keeps_grandchildren() {
        let state = state_with(
            vec![dir("cur", &["a"], true), dir("a", &["b"], true), dir("b", &[], false)],
            Some("cur"),
        );
        let swept = sweep(state);
        assert!(swept.all_entries.contains("b"));
    }

    #[test]
    fn sweep_is_idempotent() {
        let state = state_with(
            vec![
                dir("cur", &["a"], false),
                dir("a", &["x"], false),
                dir("x", &[], false),
                dir("z", &[], false),
            ],
            Some("cur"),
        );
        let once = sweep(state);
        let twice = sweep(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn sweep_forgets_lookups_for_evicted_scopes() {
        use crate::lookup::LookupTarget;

        let mut state = state_with(
            vec![dir("cur", &[], false), dir("gone", &[], false)],
            Some("cur"),
        );
        let kept = state.lookups.issue(LookupTarget::Metadata("cur".into()));
        for i in 0..50 {
            state.lookups.issue(LookupTarget::Metadata(format!("dir{i}")));
        }
        state.lookups.issue(LookupTarget::Metadata("gone".into()));
        let tasks = state.lookups.issue(LookupTarget::FileTasks);

        let state = sweep(state);
        assert_eq!(state.lookups.len(), 2);
        assert!(state.lookups.is_current(&kept));
        assert!(state.lookups.is_current(&tasks));
    }

    #[test]
    fn cycles_terminate() {
        let state = state_with(
            vec![dir("cur", &["a"], true), dir("a", &["cur"], true)],
            Some("cur"),
        );
        let swept = sweep(state);
        assert_eq!(swept.all_entries.len(), 3);
    }

    #[test]
    fn seeds_include_shortcuts_and_virtual_entries() {
        let mut state = state_with(Vec::new(), None);
        state.shortcuts = state.shortcuts.with_shortcut("short");
        state.ui_entries.push("fake://recent".into());
        let seeds = seed_keys(&state);
        assert!(seeds.contains(&"short".to_string()));
        assert!(seeds.contains(&"fake://recent".to_string()));
    }
}
