//! Composition rules linking volume roots into the navigation tree.
//!
//! Three families get special treatment on mount and unmount:
//!
//! - **My files**: Android, Linux and guest-OS roots hang under the My files
//!   container. Until the Downloads volume mounts, that container is a
//!   placeholder entry ([`MY_FILES_PLACEHOLDER_KEY`]).
//! - **Drive**: the Drive root and its satellite roots hang under a
//!   synthetic umbrella ([`DRIVE_UMBRELLA_KEY`]) in a fixed order.
//! - **Removable**: partitions of the same physical device hang under a
//!   synthetic parent keyed by device path.
//!
//! Parents never get mutated in place: every rule computes a new child list
//! with the pure helpers from [`crate::entry::record`] and stores a new
//! record. Attaching is a set insert, so re-running a rule is a no-op.

use crate::config::settings::CompositionConfig;
use crate::entry::cache::EntryCache;
use crate::entry::category::{RootCategory, VolumeCategory};
use crate::entry::icon::{icon_for_device, UNKNOWN_REMOVABLE};
use crate::entry::record::{
    insert_child, remove_child, removable_group_key, union_children, EntryKind, EntryRecord,
    DRIVE_UMBRELLA_KEY, MY_FILES_PLACEHOLDER_KEY,
};
use crate::volume::registry::{Volume, VolumeRegistry};

/// Key of the current My files container: the Downloads root once mounted
/// and cached, the placeholder otherwise.
pub fn my_files_key(cache: &EntryCache, registry: &VolumeRegistry) -> String {
    registry
        .first_of(VolumeCategory::Downloads)
        .and_then(|v| v.root_key.clone())
        .filter(|key| cache.contains(key))
        .unwrap_or_else(|| MY_FILES_PLACEHOLDER_KEY.to_string())
}

/// The placeholder My files container.
pub fn my_files_placeholder() -> EntryRecord {
    EntryRecord {
        icon: "my_files".to_string(),
        root_category: Some(RootCategory::MyFiles),
        volume_category: Some(VolumeCategory::Downloads),
        is_root_entry: true,
        ..EntryRecord::new(MY_FILES_PLACEHOLDER_KEY, EntryKind::SyntheticList, "My files")
    }
}

/// Caches the placeholder My files container if it is missing.
pub fn ensure_my_files_placeholder(cache: &mut EntryCache) {
    if !cache.contains(MY_FILES_PLACEHOLDER_KEY) {
        cache.put(my_files_placeholder());
    }
}

fn drive_umbrella() -> EntryRecord {
    EntryRecord {
        icon: "drive".to_string(),
        root_category: Some(RootCategory::DriveUmbrella),
        volume_category: Some(VolumeCategory::Drive),
        is_root_entry: true,
        ..EntryRecord::new(DRIVE_UMBRELLA_KEY, EntryKind::SyntheticList, "Google Drive")
    }
}

/// Label of a removable group: the shared drive label, or the label of the
/// member with the smallest volume id. Independent of mount order.
fn removable_group_label(members: &[Volume]) -> String {
    if let Some(label) = members
        .iter()
        .filter_map(|m| m.drive_label.as_deref())
        .find(|l| !l.is_empty())
    {
        return label.to_string();
    }
    members
        .iter()
        .min_by(|a, b| a.volume_id.cmp(&b.volume_id))
        .map(|m| m.label.clone())
        .unwrap_or_default()
}

fn removable_group(key: &str, volume: &Volume) -> EntryRecord {
    EntryRecord {
        icon: icon_for_device(volume.device_type).to_string(),
        root_category: Some(RootCategory::RemovableGroup),
        volume_category: Some(VolumeCategory::Removable),
        is_root_entry: true,
        is_ejectable: true,
        ..EntryRecord::new(key, EntryKind::SyntheticList, "")
    }
}

/// Returns `true` if `key` names a synthetic removable group parent.
pub fn is_removable_group(cache: &EntryCache, key: &str) -> bool {
    cache
        .get(key)
        .is_some_and(|e| e.root_category == Some(RootCategory::RemovableGroup))
}

/// Applies every composition rule relevant to the freshly (re)mounted
/// volume `volume_id`.
pub fn compose_mounted(
    cache: &mut EntryCache,
    registry: &mut VolumeRegistry,
    volume_id: &str,
    config: &CompositionConfig,
) {
    let Some(volume) = registry.get(volume_id).cloned() else {
        tracing::warn!("cannot compose unknown volume: {volume_id}");
        return;
    };
    let Some(root_key) = volume.root_key.clone() else {
        tracing::debug!("volume {volume_id} has no resolved root yet; composition deferred");
        return;
    };

    let grouped = match volume.category {
        VolumeCategory::Downloads => {
            compose_my_files_container(cache, registry, &root_key);
            false
        }
        category if category.is_my_files_nested() => {
            compose_my_files_nested(cache, registry, &volume, &root_key);
            false
        }
        VolumeCategory::Drive => {
            compose_drive(cache, registry, &volume, &root_key);
            false
        }
        VolumeCategory::Removable if config.group_removable => {
            compose_removable(cache, registry, &volume)
        }
        _ => false,
    };

    if !grouped {
        let ejectable = volume.computed_ejectable();
        cache.update(&root_key, |rec| EntryRecord {
            is_ejectable: ejectable,
            ..rec
        });
        registry.update(volume_id, |v| Volume {
            is_ejectable: ejectable,
            ..v
        });
    }
}

fn compose_my_files_container(
    cache: &mut EntryCache,
    registry: &mut VolumeRegistry,
    root_key: &str,
) {
    let from_placeholder = cache
        .remove(MY_FILES_PLACEHOLDER_KEY)
        .map(|p| p.children)
        .unwrap_or_default();
    let nested: Vec<(String, String)> = registry
        .iter()
        .filter(|v| v.category.is_my_files_nested())
        .filter_map(|v| v.root_key.clone().map(|k| (v.volume_id.clone(), k)))
        .collect();
    let nested_roots: Vec<String> = nested.iter().map(|(_, k)| k.clone()).collect();

    cache.update(root_key, |rec| {
        let children = union_children(&rec.children, &from_placeholder);
        let children = union_children(&children, &nested_roots);
        rec.with_children(children)
    });
    for (volume_id, _) in &nested {
        registry.update(volume_id, |v| Volume {
            prefix_key: Some(root_key.to_string()),
            ..v
        });
    }
}

fn is_placeholder_labelled(cache: &EntryCache, key: &str, label: &str) -> bool {
    cache
        .get(key)
        .is_some_and(|e| e.kind == EntryKind::Placeholder && e.label == label)
}

fn compose_my_files_nested(
    cache: &mut EntryCache,
    registry: &mut VolumeRegistry,
    volume: &Volume,
    root_key: &str,
) {
    let container = my_files_key(cache, registry);
    if container == MY_FILES_PLACEHOLDER_KEY {
        ensure_my_files_placeholder(cache);
    }
    let label = cache
        .get(root_key)
        .map(|e| e.label.clone())
        .unwrap_or_else(|| volume.label.clone());
    let Some(current) = cache.get(&container) else {
        return;
    };
    let kept: Vec<String> = current
        .children
        .iter()
        .filter(|child| !is_placeholder_labelled(cache, child, &label))
        .cloned()
        .collect();
    let children = insert_child(&kept, root_key);

    cache.update(&container, |rec| rec.with_children(children));
    registry.update(&volume.volume_id, |v| Volume {
        prefix_key: Some(container.clone()),
        ..v
    });
}

fn compose_drive(
    cache: &mut EntryCache,
    registry: &mut VolumeRegistry,
    volume: &Volume,
    root_key: &str,
) {
    if !cache.contains(DRIVE_UMBRELLA_KEY) {
        cache.put(drive_umbrella());
    }

    let mut satellites = volume.satellites.clone();
    satellites.sort_by_key(|s| s.kind);
    let mut ordered = vec![root_key.to_string()];
    ordered.extend(
        satellites
            .into_iter()
            .filter(|s| cache.contains(&s.key))
            .map(|s| s.key),
    );

    cache.update(DRIVE_UMBRELLA_KEY, |rec| {
        let children = union_children(&ordered, &rec.children);
        rec.with_children(children)
    });
    registry.update(&volume.volume_id, |v| Volume {
        prefix_key: Some(DRIVE_UMBRELLA_KEY.to_string()),
        ..v
    });
}

/// Groups `volume` with its same-device siblings. Returns `false` when the
/// volume stays ungrouped.
fn compose_removable(
    cache: &mut EntryCache,
    registry: &mut VolumeRegistry,
    volume: &Volume,
) -> bool {
    let (Some(group_key), Some(device_path)) = (volume.group_key(), volume.device_path.as_deref())
    else {
        return false;
    };
    let mut members: Vec<Volume> = registry
        .group_members(&group_key)
        .into_iter()
        .cloned()
        .collect();
    if members.len() < 2 {
        return false;
    }
    members.sort_by(|a, b| a.volume_id.cmp(&b.volume_id));

    let parent_key = removable_group_key(device_path);
    let parent = match cache.get(&parent_key) {
        Some(existing) => EntryRecord {
            is_ejectable: true,
            ..existing.clone()
        },
        None => removable_group(&parent_key, volume),
    };
    let parent = EntryRecord {
        label: removable_group_label(&members),
        ..parent
    };

    let member_roots: Vec<String> = members.iter().filter_map(|m| m.root_key.clone()).collect();
    let children = union_children(&member_roots, &parent.children);
    for member in &members {
        let Some(member_root) = member.root_key.as_deref() else {
            continue;
        };
        cache.update(member_root, |rec| EntryRecord {
            is_ejectable: false,
            icon: UNKNOWN_REMOVABLE.to_string(),
            ..rec
        });
        registry.update(&member.volume_id, |v| Volume {
            prefix_key: Some(parent_key.clone()),
            is_ejectable: false,
            ..v
        });
    }
    cache.put(parent.with_children(children));
    true
}

/// Attaches a registered placeholder under My files, unless it is not a
/// nested-family placeholder or a mounted root with the same label already
/// stands in for it.
pub fn attach_placeholder(cache: &mut EntryCache, registry: &VolumeRegistry, key: &str) {
    let Some(entry) = cache.get(key) else {
        return;
    };
    if entry.kind != EntryKind::Placeholder
        || !entry.volume_category.is_some_and(|c| c.is_my_files_nested())
    {
        return;
    }
    let label = entry.label.clone();

    let container = my_files_key(cache, registry);
    if container == MY_FILES_PLACEHOLDER_KEY {
        ensure_my_files_placeholder(cache);
    }
    let Some(current) = cache.get(&container) else {
        return;
    };
    let superseded = current.children.iter().any(|child| {
        cache
            .get(child)
            .is_some_and(|e| e.kind == EntryKind::VolumeRoot && e.label == label)
    });
    if superseded {
        tracing::debug!("placeholder {key} superseded by a mounted volume");
        return;
    }
    cache.update(&container, |rec| {
        let children = insert_child(&rec.children, key);
        rec.with_children(children)
    });
}

/// Removes `child` from the children of `parent`, if both are cached.
pub fn detach_child(cache: &mut EntryCache, parent: &str, child: &str) {
    cache.update(parent, |rec| {
        let children = remove_child(&rec.children, child);
        rec.with_children(children)
    });
}

/// Undoes composition for a volume that was just removed from `registry`.
///
/// `ui_entries` are the registered virtual entries; a placeholder among them
/// re-attaches under My files when its nested family loses its last volume.
pub fn decompose_unmounted(
    cache: &mut EntryCache,
    registry: &mut VolumeRegistry,
    volume: &Volume,
    ui_entries: &[String],
) {
    let Some(root_key) = volume.root_key.as_deref() else {
        return;
    };

    if let Some(prefix) = volume.prefix_key.as_deref() {
        detach_child(cache, prefix, root_key);
        if is_removable_group(cache, prefix) {
            if cache.get(prefix).is_some_and(|p| p.children.is_empty()) {
                cache.remove(prefix);
            } else if let Some(group_key) = volume.group_key() {
                let remaining: Vec<Volume> = registry
                    .group_members(&group_key)
                    .into_iter()
                    .cloned()
                    .collect();
                let label = removable_group_label(&remaining);
                cache.update(prefix, |rec| EntryRecord { label, ..rec });
            }
        }
    }

    match volume.category {
        VolumeCategory::Downloads => decompose_my_files_container(cache, registry, root_key),
        category if category.is_my_files_nested() => {
            if registry.first_of(category).is_none() {
                for key in ui_entries {
                    if cache
                        .get(key)
                        .is_some_and(|e| e.volume_category == Some(category))
                    {
                        attach_placeholder(cache, registry, key);
                    }
                }
            }
        }
        VolumeCategory::Drive => {
            if registry.first_of(VolumeCategory::Drive).is_none() {
                cache.remove(DRIVE_UMBRELLA_KEY);
            } else {
                for satellite in &volume.satellites {
                    detach_child(cache, DRIVE_UMBRELLA_KEY, &satellite.key);
                }
            }
        }
        _ => {}
    }
}

fn decompose_my_files_container(
    cache: &mut EntryCache,
    registry: &mut VolumeRegistry,
    root_key: &str,
) {
    if registry.first_of(VolumeCategory::Downloads).is_some() {
        return;
    }
    let moved: Vec<String> = cache
        .get(root_key)
        .map(|root| {
            root.children
                .iter()
                .filter(|c| cache.get(c).is_some_and(|e| e.is_root_entry))
                .cloned()
                .collect()
        })
        .unwrap_or_default();

    ensure_my_files_placeholder(cache);
    cache.update(MY_FILES_PLACEHOLDER_KEY, |rec| {
        let children = union_children(&rec.children, &moved);
        rec.with_children(children)
    });
    cache.update(root_key, |rec| {
        let children = rec
            .children
            .iter()
            .filter(|c| !moved.contains(c))
            .cloned()
            .collect();
        rec.with_children(children)
    });

    let nested_ids: Vec<String> = registry
        .iter()
        .filter(|v| v.category.is_my_files_nested())
        .map(|v| v.volume_id.clone())
        .collect();
    for volume_id in &nested_ids {
        registry.update(volume_id, |v| Volume {
            prefix_key: Some(MY_FILES_PLACEHOLDER_KEY.to_string()),
            ..v
        });
    }
}
