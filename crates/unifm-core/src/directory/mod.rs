//! Directory and selection state.
//!
//! The functions here are the directory sub-reducers. Each takes the state
//! by value and returns the next one; entries referenced by the action are
//! already in the cache by the time they run.

pub mod current;
pub mod selection;
pub mod tasks;

use crate::directory::current::{
    has_restricted_files, path_components, CurrentDirectory, DirectoryStatus,
};
use crate::directory::selection::Selection;
use crate::directory::tasks::FileTasks;
use crate::state::State;

/// Applies a directory change transition.
pub fn change_directory(state: State, key: &str, status: DirectoryStatus) -> State {
    let current = state.current_directory.clone();
    let same_key = current.as_ref().is_some_and(|c| c.key == key);

    let next = match status {
        DirectoryStatus::Started => match current {
            Some(dir) if same_key => dir.with_status(DirectoryStatus::Started),
            _ => CurrentDirectory::started(key),
        },
        DirectoryStatus::Succeeded => {
            let Some(entry) = state.all_entries.get(key) else {
                tracing::debug!("directory change to uncached {key} dropped");
                return state;
            };
            let base = match current {
                Some(dir) if same_key => dir,
                _ => CurrentDirectory::started(key),
            };
            CurrentDirectory {
                status: DirectoryStatus::Succeeded,
                root_category: entry.root_category,
                path_components: path_components(entry, &state.all_entries, &state.volumes),
                ..base
            }
        }
        DirectoryStatus::Failed => match current {
            Some(dir) => dir.with_status(DirectoryStatus::Failed),
            None => CurrentDirectory::started(key).with_status(DirectoryStatus::Failed),
        },
    };

    State {
        current_directory: Some(next),
        ..state
    }
}

/// Replaces the listing of the current directory with `keys`.
///
/// Selected keys that are no longer listed drop out of the selection.
pub fn update_content(state: State, keys: Vec<String>) -> State {
    let Some(dir) = state.current_directory.clone() else {
        tracing::debug!("content update without a current directory dropped");
        return state;
    };
    let mut content: Vec<String> = Vec::with_capacity(keys.len());
    for key in keys {
        if !content.contains(&key) {
            content.push(key);
        }
    }
    let selection = dir
        .selection
        .retaining(&state.all_entries, |k| content.iter().any(|c| c == k));
    let has_restricted = has_restricted_files(&content, &state.all_entries);

    State {
        current_directory: Some(CurrentDirectory {
            content,
            selection,
            has_restricted_files: has_restricted,
            ..dir
        }),
        ..state
    }
}

/// Replaces the selection with `keys`.
pub fn change_selection(state: State, keys: &[String]) -> State {
    let Some(dir) = state.current_directory.clone() else {
        tracing::debug!("selection change without a current directory dropped");
        return state;
    };
    let selection = Selection::compute(keys, &state.all_entries);
    State {
        current_directory: Some(CurrentDirectory { selection, ..dir }),
        ..state
    }
}

/// Recomputes derived values after metadata for `keys` changed.
pub fn metadata_changed(state: State, keys: &[String]) -> State {
    let Some(dir) = state.current_directory.clone() else {
        return state;
    };
    let touches = |list: &[String]| keys.iter().any(|k| list.contains(k));

    let selection = if touches(&dir.selection.keys) {
        dir.selection.clone().recomputed(&state.all_entries)
    } else {
        dir.selection.clone()
    };
    let has_restricted = if touches(&dir.content) {
        has_restricted_files(&dir.content, &state.all_entries)
    } else {
        dir.has_restricted_files
    };

    State {
        current_directory: Some(CurrentDirectory {
            selection,
            has_restricted_files: has_restricted,
            ..dir
        }),
        ..state
    }
}

/// Overlays resolved file tasks onto the selection.
pub fn set_file_tasks(state: State, tasks: FileTasks) -> State {
    let Some(dir) = state.current_directory.clone() else {
        tracing::debug!("file tasks without a current directory dropped");
        return state;
    };
    let selection = dir.selection.clone().with_file_tasks(Some(tasks));
    State {
        current_directory: Some(CurrentDirectory { selection, ..dir }),
        ..state
    }
}
