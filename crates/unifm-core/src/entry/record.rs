//! Canonical entry representation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entry::category::{RootCategory, VolumeCategory};

/// Opaque metadata map. A missing key means "not fetched yet".
pub type Metadata = BTreeMap<String, serde_json::Value>;

/// Well-known metadata property names consumed by the core.
pub mod props {
    /// Entry is a hosted (cloud-native) document.
    pub const HOSTED: &str = "hosted";
    /// Entry content is cached for offline use.
    pub const AVAILABLE_OFFLINE: &str = "available_offline";
    /// Entry is pinned for offline availability.
    pub const PINNED: &str = "pinned";
    /// Entry is restricted by data-leak-prevention policy.
    pub const IS_DLP_RESTRICTED: &str = "is_dlp_restricted";
}

/// Key of the placeholder "My files" container used until the real
/// Downloads volume mounts.
pub const MY_FILES_PLACEHOLDER_KEY: &str = "entry-list://my_files";

/// Key of the synthetic "Google Drive" umbrella.
pub const DRIVE_UMBRELLA_KEY: &str = "entry-list://drive";

/// Key of the synthetic parent grouping the partitions of one device.
pub fn removable_group_key(device_path: &str) -> String {
    format!("entry-list://removable/{}", device_path.trim_start_matches('/'))
}

/// Joins a child path onto a parent key with exactly one `/` between them.
pub fn join_key(parent: &str, relative: &str) -> String {
    let relative = relative.trim_start_matches('/');
    if relative.is_empty() {
        return parent.to_string();
    }
    if parent.ends_with('/') {
        format!("{parent}{relative}")
    } else {
        format!("{parent}/{relative}")
    }
}

/// What sort of node an entry is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// File or directory from a real filesystem scan.
    Native,
    /// Root of a mounted volume.
    VolumeRoot,
    /// Manufactured container with no backend analog ("My files", "Google Drive").
    SyntheticList,
    /// Stand-in for a volume that has not mounted yet.
    Placeholder,
    /// View-only root such as "Recent" or "Trash".
    Virtual,
}

/// One addressable node in the unified tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryRecord {
    pub key: String,
    pub kind: EntryKind,
    pub is_directory: bool,
    pub label: String,
    pub icon: String,
    pub root_category: Option<RootCategory>,
    pub volume_category: Option<VolumeCategory>,
    pub volume_id: Option<String>,
    /// Path relative to the owning volume root, for native entries.
    pub full_path: Option<String>,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub expanded: bool,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub is_root_entry: bool,
    #[serde(default)]
    pub is_ejectable: bool,
    #[serde(default)]
    pub should_delay_loading_children: bool,
    /// Children pushed by a listing or composition step. Not exhaustive.
    #[serde(default)]
    pub children: Vec<String>,
}

impl EntryRecord {
    /// Creates a bare record; the normalizer fills in the rest.
    pub fn new(key: impl Into<String>, kind: EntryKind, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind,
            is_directory: kind != EntryKind::Native,
            label: label.into(),
            icon: "generic".to_string(),
            root_category: None,
            volume_category: None,
            volume_id: None,
            full_path: None,
            metadata: Metadata::new(),
            expanded: false,
            disabled: false,
            is_root_entry: false,
            is_ejectable: false,
            should_delay_loading_children: false,
            children: Vec::new(),
        }
    }

    /// Reads a boolean metadata property. `None` when not fetched yet or
    /// not a boolean.
    pub fn metadata_bool(&self, name: &str) -> Option<bool> {
        self.metadata.get(name).and_then(serde_json::Value::as_bool)
    }

    /// Returns a copy with `children` replaced.
    #[must_use]
    pub fn with_children(self, children: Vec<String>) -> Self {
        Self { children, ..self }
    }

    /// Returns `true` if `key` is an attached child.
    pub fn has_child(&self, key: &str) -> bool {
        self.children.iter().any(|c| c == key)
    }
}

/// Returns `children` with `key` appended unless already present.
pub fn insert_child(children: &[String], key: &str) -> Vec<String> {
    let mut next = children.to_vec();
    if !next.iter().any(|c| c == key) {
        next.push(key.to_string());
    }
    next
}

/// Returns `children` without `key`.
pub fn remove_child(children: &[String], key: &str) -> Vec<String> {
    children.iter().filter(|c| *c != key).cloned().collect()
}

/// Returns `children` followed by every key of `extra` not already present.
pub fn union_children(children: &[String], extra: &[String]) -> Vec<String> {
    extra
        .iter()
        .fold(children.to_vec(), |acc, key| insert_child(&acc, key))
}

/// A batch of metadata for one entry, as answered by a metadata service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataUpdate {
    pub key: String,
    pub metadata: Metadata,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn join_key_handles_slashes() {
        assert_eq!(join_key("fs://dl/", "a/b"), "fs://dl/a/b");
        assert_eq!(join_key("fs://dl", "/a"), "fs://dl/a");
        assert_eq!(join_key("fs://dl", ""), "fs://dl");
    }

    #[test]
    fn removable_group_key_strips_leading_slash() {
        assert_eq!(
            removable_group_key("/sys/devices/usb1"),
            "entry-list://removable/sys/devices/usb1"
        );
    }

    #[test]
    fn insert_child_is_a_set_insert() {
        let children = insert_child(&[], "a");
        let children = insert_child(&children, "b");
        let children = insert_child(&children, "a");
        assert_eq!(children, vec!["a", "b"]);
    }

    #[test]
    fn remove_child_keeps_order() {
        let children = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(remove_child(&children, "b"), vec!["a", "c"]);
        assert_eq!(remove_child(&children, "zz"), children);
    }

    #[test]
    fn union_children_appends_missing_only() {
        let base = vec!["a".to_string(), "b".to_string()];
        let extra = vec!["b".to_string(), "c".to_string()];
        assert_eq!(union_children(&base, &extra), vec!["a", "b", "c"]);
    }

    #[test]
    fn metadata_bool_distinguishes_unknown() {
        let mut record = EntryRecord::new("k", EntryKind::Native, "k");
        assert_eq!(record.metadata_bool(props::HOSTED), None);
        record.metadata.insert(props::HOSTED.into(), json!(false));
        assert_eq!(record.metadata_bool(props::HOSTED), Some(false));
        record.metadata.insert(props::PINNED.into(), json!("yes"));
        assert_eq!(record.metadata_bool(props::PINNED), None);
    }

    #[test]
    fn new_native_record_is_not_directory() {
        let record = EntryRecord::new("k", EntryKind::Native, "k");
        assert!(!record.is_directory);
        let record = EntryRecord::new("v", EntryKind::Virtual, "Recent");
        assert!(record.is_directory);
    }
}
