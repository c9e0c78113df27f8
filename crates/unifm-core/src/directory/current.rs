//! The directory currently open in the file list.

use serde::{Deserialize, Serialize};

use crate::directory::selection::Selection;
use crate::entry::cache::EntryCache;
use crate::entry::category::RootCategory;
use crate::entry::record::{join_key, props, EntryKind, EntryRecord};
use crate::volume::registry::VolumeRegistry;

/// Progress of a directory change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectoryStatus {
    Started,
    Succeeded,
    Failed,
}

/// One step of the breadcrumb.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathComponent {
    pub key: String,
    pub label: String,
}

/// The open directory together with its listing and selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentDirectory {
    pub key: String,
    pub status: DirectoryStatus,
    pub root_category: Option<RootCategory>,
    pub path_components: Vec<PathComponent>,
    pub content: Vec<String>,
    pub selection: Selection,
    pub has_restricted_files: bool,
}

impl CurrentDirectory {
    /// A directory change that has just started, with nothing listed yet.
    pub fn started(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            status: DirectoryStatus::Started,
            root_category: None,
            path_components: Vec::new(),
            content: Vec::new(),
            selection: Selection::default(),
            has_restricted_files: false,
        }
    }

    #[must_use]
    pub fn with_status(self, status: DirectoryStatus) -> Self {
        Self { status, ..self }
    }
}

/// Whether any listed entry is known to be restricted.
pub fn has_restricted_files(content: &[String], cache: &EntryCache) -> bool {
    content.iter().any(|key| {
        cache
            .get(key)
            .and_then(|e| e.metadata_bool(props::IS_DLP_RESTRICTED))
            .unwrap_or(false)
    })
}

fn component(cache: &EntryCache, key: &str, fallback: &str) -> PathComponent {
    PathComponent {
        key: key.to_string(),
        label: cache
            .get(key)
            .map(|e| e.label.clone())
            .unwrap_or_else(|| fallback.to_string()),
    }
}

/// Builds the breadcrumb for `entry`, root first.
///
/// For entries on a registered volume the chain is: the volume's prefix
/// parents (My files, the Drive umbrella, a removable group), the volume
/// root, then one component per segment of the entry's path. Anything
/// else is its own single component.
pub fn path_components(
    entry: &EntryRecord,
    cache: &EntryCache,
    registry: &VolumeRegistry,
) -> Vec<PathComponent> {
    let volume = entry
        .volume_id
        .as_deref()
        .and_then(|id| registry.get(id))
        .or_else(|| registry.by_root_key(&entry.key));
    let Some((volume, root_key)) = volume.and_then(|v| v.root_key.as_deref().map(|k| (v, k)))
    else {
        return vec![component(cache, &entry.key, &entry.label)];
    };

    let mut prefixes: Vec<PathComponent> = Vec::new();
    let mut next = volume.prefix_key.clone();
    while let Some(prefix) = next {
        if prefix == root_key || prefixes.iter().any(|p| p.key == prefix) {
            tracing::warn!("prefix cycle at {prefix}");
            break;
        }
        next = registry
            .by_root_key(&prefix)
            .and_then(|v| v.prefix_key.clone());
        prefixes.push(component(cache, &prefix, &prefix));
    }
    prefixes.reverse();

    let mut components = prefixes;
    components.push(component(cache, root_key, &volume.label));

    if entry.kind == EntryKind::Native {
        let path = entry.full_path.as_deref().unwrap_or_default();
        let mut relative = String::new();
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            if !relative.is_empty() {
                relative.push('/');
            }
            relative.push_str(segment);
            let key = join_key(root_key, &relative);
            components.push(component(cache, &key, segment));
        }
    }
    components
}
