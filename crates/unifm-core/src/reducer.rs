//! The root reducer: the only place state changes.
//!
//! Every action first passes through the cache step, which normalizes and
//! upserts the entries the action carries. The action is then dispatched to
//! its sub-reducer, and the navigation list is recomposed when the action
//! can affect it. Reducers never fail; anything they cannot apply is logged
//! and the state is returned unchanged.

use crate::action::Action;
use crate::context::Context;
use crate::directory::tasks::FileTasks;
use crate::entry::collector;
use crate::entry::normalize::{normalize, FakeEntry, RawEntry, VolumeRootEntry};
use crate::entry::record::{union_children, EntryRecord, MetadataUpdate};
use crate::lookup::LookupTarget;
use crate::state::State;
use crate::volume::compose::{attach_placeholder, detach_child, my_files_key};
use crate::volume::registry::VolumeInfo;
use crate::{directory, nav, volume};

/// Applies `action` to `state` and returns the next state.
pub fn reduce(state: State, action: Action, ctx: &Context) -> State {
    tracing::trace!(
        "reduce {} ({})",
        action.name(),
        action.category().label()
    );
    let state = cache_entries(state, &action, ctx);
    let refresh_navigation = action.affects_navigation();
    let state = apply(state, action, ctx);
    if refresh_navigation {
        nav::refresh(state, ctx)
    } else {
        state
    }
}

/// Entries a mount brings into existence: the volume root and any Drive
/// satellites.
fn mount_entries(info: &VolumeInfo) -> Vec<RawEntry> {
    let root = info.root_key.as_ref().map(|key| {
        RawEntry::VolumeRoot(VolumeRootEntry {
            key: key.clone(),
            label: info.label.clone(),
            volume_id: info.volume_id.clone(),
            category: info.category,
            device_type: info.device_type,
        })
    });
    let satellites = info.satellites.iter().map(|s| {
        RawEntry::Fake(FakeEntry {
            key: s.key.clone(),
            label: s.label.clone(),
            root_category: s.kind.root_category(),
        })
    });
    root.into_iter().chain(satellites).collect()
}

fn cache_entries(mut state: State, action: &Action, ctx: &Context) -> State {
    let mut raws: Vec<RawEntry> = action.carried_entries().into_iter().cloned().collect();
    if let Action::MountVolume { info, .. } = action {
        raws.extend(mount_entries(info));
    }
    for raw in &raws {
        state.all_entries.upsert(normalize(raw, ctx.policy()));
    }
    state
}

fn apply(mut state: State, action: Action, ctx: &Context) -> State {
    match action {
        Action::MountVolume { info, metadata } => volume::mount(state, &info, &metadata, ctx),
        Action::UnmountVolume { volume_id } => volume::unmount(state, &volume_id),
        Action::ChangeDirectory { key, status, .. } => {
            state.lookups.retain_metadata_scopes(|scope| scope == key);
            directory::change_directory(state, &key, status)
        }
        Action::UpdateDirectoryContent { entries } => {
            let keys = entries.iter().map(|e| e.key().to_string()).collect();
            directory::update_content(state, keys)
        }
        Action::ChangeSelection { keys, .. } => {
            state.lookups.invalidate(&LookupTarget::FileTasks);
            directory::change_selection(state, &keys)
        }
        Action::UpdateMetadata { metadata } => apply_metadata(state, metadata),
        Action::AddChildEntries {
            parent_key,
            entries,
        } => add_child_entries(state, &parent_key, &entries),
        Action::SetExpanded { key, expanded } => {
            let found = state
                .all_entries
                .update(&key, |rec| EntryRecord { expanded, ..rec });
            if !found {
                tracing::warn!("cannot expand uncached entry: {key}");
            }
            state
        }
        Action::RegisterVirtualEntry { entry } => {
            let key = entry.key().to_string();
            if !state.ui_entries.contains(&key) {
                state.ui_entries.push(key.clone());
            }
            attach_placeholder(&mut state.all_entries, &state.volumes, &key);
            state
        }
        Action::UnregisterVirtualEntry { key } => {
            if !state.ui_entries.contains(&key) {
                tracing::warn!("unregister of unknown virtual entry: {key}");
                return state;
            }
            state.ui_entries.retain(|k| *k != key);
            let container = my_files_key(&state.all_entries, &state.volumes);
            detach_child(&mut state.all_entries, &container, &key);
            state
        }
        Action::AddShortcut { entry } => State {
            shortcuts: state.shortcuts.clone().with_shortcut(entry.key()),
            ..state
        },
        Action::RemoveShortcut { key } => State {
            shortcuts: state.shortcuts.clone().without_shortcut(&key),
            ..state
        },
        Action::SetAndroidApps { apps } => State {
            android_apps: apps,
            ..state
        },
        Action::RefreshNavigation => state,
        Action::IssueLookup { target } => {
            let ticket = state.lookups.issue(target);
            tracing::trace!("issued lookup #{}", ticket.sequence);
            state
        }
        Action::FileTasksResolved { ticket, tasks } => {
            if !state.lookups.settle(&ticket) {
                tracing::trace!("stale file tasks #{} dropped", ticket.sequence);
                return state;
            }
            directory::set_file_tasks(state, FileTasks::new(tasks))
        }
        Action::MetadataResolved { ticket, metadata } => {
            if !state.lookups.settle(&ticket) {
                tracing::trace!("stale metadata #{} dropped", ticket.sequence);
                return state;
            }
            apply_metadata(state, metadata)
        }
        Action::SweepCache => collector::sweep(state),
        Action::Unknown { kind } => {
            tracing::error!("unknown action ignored: {kind}");
            state
        }
    }
}

/// Merges fetched metadata into cached entries and refreshes whatever is
/// derived from it.
fn apply_metadata(mut state: State, updates: Vec<MetadataUpdate>) -> State {
    let mut touched: Vec<String> = Vec::with_capacity(updates.len());
    for update in updates {
        let MetadataUpdate { key, metadata } = update;
        let found = state.all_entries.update(&key, |mut rec| {
            rec.metadata.extend(metadata);
            rec
        });
        if found {
            touched.push(key);
        } else {
            tracing::warn!("metadata for uncached entry: {key}");
        }
    }
    directory::metadata_changed(state, &touched)
}

/// Sets the children of `parent_key` to the listed directories, keeping
/// composed children (volume roots, placeholders) the listing cannot know.
fn add_child_entries(mut state: State, parent_key: &str, entries: &[RawEntry]) -> State {
    let Some(parent) = state.all_entries.get(parent_key) else {
        tracing::warn!("children for uncached parent: {parent_key}");
        return state;
    };
    let listed: Vec<String> = entries
        .iter()
        .map(RawEntry::key)
        .filter(|key| state.all_entries.get(key).is_some_and(|e| e.is_directory))
        .map(str::to_string)
        .collect();
    let composed: Vec<String> = parent
        .children
        .iter()
        .filter(|c| state.all_entries.get(c).is_some_and(|e| e.is_root_entry))
        .cloned()
        .collect();
    let children = union_children(&listed, &composed);
    state
        .all_entries
        .update(parent_key, |rec| rec.with_children(children));
    state
}
