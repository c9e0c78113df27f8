//! Navigation list composition.
//!
//! The list is rebuilt from scratch out of the state every time; nothing
//! about a previous list carries over. Items come out in section order:
//!
//! 1. Recent, if registered
//! 2. shortcuts, in the order they were added
//! 3. My files (the Downloads root, or its placeholder)
//! 4. the Drive umbrella
//! 5. every other live volume, by category priority then mount order
//! 6. Android apps
//! 7. Trash, if registered
//!
//! The first item of each new section carries a separator, except the first
//! item overall.

use serde::{Deserialize, Serialize};

use crate::context::Context;
use crate::entry::category::{RootCategory, VolumeCategory};
use crate::entry::record::{EntryKind, EntryRecord, DRIVE_UMBRELLA_KEY};
use crate::state::State;
use crate::volume::compose::{is_removable_group, my_files_key};

/// Visual section a navigation item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationSection {
    Top,
    MyFiles,
    Cloud,
    Removable,
    Apps,
    Trash,
}

/// What a navigation item points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationKind {
    Volume,
    EntryList,
    Recent,
    Shortcut,
    AndroidApp,
    Trash,
    Drive,
}

/// One item of the navigation list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationRoot {
    pub key: String,
    pub label: String,
    pub icon: String,
    pub section: NavigationSection,
    pub separator: bool,
    pub kind: NavigationKind,
    pub volume_id: Option<String>,
}

impl NavigationRoot {
    fn from_entry(entry: &EntryRecord, section: NavigationSection, kind: NavigationKind) -> Self {
        Self {
            key: entry.key.clone(),
            label: entry.label.clone(),
            icon: entry.icon.clone(),
            section,
            separator: false,
            kind,
            volume_id: entry.volume_id.clone(),
        }
    }
}

/// Section a volume of `category` lands in when listed on its own.
fn section_for(category: VolumeCategory) -> NavigationSection {
    match category {
        VolumeCategory::Drive
        | VolumeCategory::Provided
        | VolumeCategory::DocumentsProvider
        | VolumeCategory::Smb => NavigationSection::Cloud,
        VolumeCategory::Removable
        | VolumeCategory::Mtp
        | VolumeCategory::Archive
        | VolumeCategory::MediaView
        | VolumeCategory::Testing => NavigationSection::Removable,
        VolumeCategory::Downloads
        | VolumeCategory::AndroidFiles
        | VolumeCategory::Crostini
        | VolumeCategory::GuestOs => NavigationSection::MyFiles,
    }
}

fn virtual_root<'a>(state: &'a State, category: RootCategory) -> Option<&'a EntryRecord> {
    state
        .ui_entries
        .iter()
        .filter_map(|key| state.all_entries.get(key))
        .find(|e| e.kind == EntryKind::Virtual && e.root_category == Some(category))
}

/// Composes the navigation list for `state`.
pub fn compose_navigation(state: &State, ctx: &Context) -> Vec<NavigationRoot> {
    let config = &ctx.config().navigation;
    let cache = &state.all_entries;
    let mut items: Vec<NavigationRoot> = Vec::new();

    if config.show_recent {
        if let Some(recent) = virtual_root(state, RootCategory::Recent) {
            items.push(NavigationRoot::from_entry(
                recent,
                NavigationSection::Top,
                NavigationKind::Recent,
            ));
        }
    }

    for key in state.shortcuts.keys() {
        match cache.get(key) {
            Some(entry) => items.push(NavigationRoot::from_entry(
                entry,
                NavigationSection::Top,
                NavigationKind::Shortcut,
            )),
            None => tracing::warn!("shortcut not cached, skipping: {key}"),
        }
    }

    let my_files = my_files_key(cache, &state.volumes);
    match cache.get(&my_files) {
        Some(entry) => {
            let kind = if entry.kind == EntryKind::VolumeRoot {
                NavigationKind::Volume
            } else {
                NavigationKind::EntryList
            };
            items.push(NavigationRoot::from_entry(entry, NavigationSection::MyFiles, kind));
        }
        None => tracing::warn!("my files container missing: {my_files}"),
    }

    if state.volumes.first_of(VolumeCategory::Drive).is_some() {
        if let Some(umbrella) = cache.get(DRIVE_UMBRELLA_KEY) {
            items.push(NavigationRoot::from_entry(
                umbrella,
                NavigationSection::Cloud,
                NavigationKind::Drive,
            ));
        }
    }

    items.extend(other_volumes(state, ctx));

    if config.show_android_apps {
        items.extend(state.android_apps.iter().map(|app| NavigationRoot {
            key: app.key(),
            label: app.name.clone(),
            icon: app.icon.clone().unwrap_or_else(|| "android".to_string()),
            section: NavigationSection::Apps,
            separator: false,
            kind: NavigationKind::AndroidApp,
            volume_id: None,
        }));
    }

    if config.show_trash {
        if let Some(trash) = virtual_root(state, RootCategory::Trash) {
            items.push(NavigationRoot::from_entry(
                trash,
                NavigationSection::Trash,
                NavigationKind::Trash,
            ));
        }
    }

    with_separators(items)
}

/// Volumes listed at top level: everything live that is not nested under
/// My files or the Drive umbrella. Grouped removable partitions are
/// represented once by their group parent.
fn other_volumes(state: &State, ctx: &Context) -> Vec<NavigationRoot> {
    let cache = &state.all_entries;
    let navigation = &ctx.config().navigation;
    let my_files = my_files_key(cache, &state.volumes);

    let mut ranked: Vec<(usize, usize, NavigationRoot)> = Vec::new();
    let mut seen_groups: Vec<String> = Vec::new();

    for (index, volume) in state.volumes.iter().enumerate() {
        if volume.category == VolumeCategory::Downloads
            || volume.category == VolumeCategory::Drive
            || volume.category.is_my_files_nested()
        {
            continue;
        }
        let nested = volume
            .prefix_key
            .as_deref()
            .is_some_and(|p| p == my_files || p == DRIVE_UMBRELLA_KEY);
        if nested {
            continue;
        }
        if !ctx.liveness().is_live(&volume.volume_id) {
            tracing::debug!("volume {} not live, hidden from navigation", volume.volume_id);
            continue;
        }
        let Some(root_key) = volume.root_key.as_deref() else {
            continue;
        };

        let priority = navigation.priority(volume.category);
        let section = section_for(volume.category);

        let group = volume
            .prefix_key
            .as_deref()
            .filter(|p| is_removable_group(cache, p));
        let item = match group {
            Some(group_key) => {
                if seen_groups.iter().any(|g| g == group_key) {
                    continue;
                }
                seen_groups.push(group_key.to_string());
                let Some(parent) = cache.get(group_key) else {
                    continue;
                };
                NavigationRoot {
                    volume_id: None,
                    ..NavigationRoot::from_entry(parent, section, NavigationKind::EntryList)
                }
            }
            None => match cache.get(root_key) {
                Some(root) => NavigationRoot {
                    volume_id: Some(volume.volume_id.clone()),
                    ..NavigationRoot::from_entry(root, section, NavigationKind::Volume)
                },
                None => {
                    tracing::warn!("volume root not cached, skipping: {root_key}");
                    continue;
                }
            },
        };
        ranked.push((priority, index, item));
    }

    ranked.sort_by_key(|(priority, index, _)| (*priority, *index));
    ranked.into_iter().map(|(_, _, item)| item).collect()
}

fn with_separators(items: Vec<NavigationRoot>) -> Vec<NavigationRoot> {
    let mut previous: Option<NavigationSection> = None;
    items
        .into_iter()
        .map(|item| {
            let separator = previous.is_some_and(|p| p != item.section);
            previous = Some(item.section);
            NavigationRoot { separator, ..item }
        })
        .collect()
}
