//! Conversion of backend entry shapes into [`EntryRecord`]s.
//!
//! Backends hand over entries in several shapes (scanned files, volume
//! roots, synthetic lists, placeholders, fake views). [`RawEntry`] tags
//! each shape explicitly and [`normalize`] maps every variant onto the
//! single canonical record.

use serde::{Deserialize, Serialize};

use crate::context::PolicyService;
use crate::entry::category::{DeviceType, RootCategory, VolumeCategory};
use crate::entry::icon::{icon_for_file, icon_for_root, icon_for_volume};
use crate::entry::record::{EntryKind, EntryRecord, Metadata};
use crate::nfc_string;

/// A file or directory produced by a filesystem scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeEntry {
    pub key: String,
    pub name: String,
    pub is_directory: bool,
    #[serde(default)]
    pub volume_id: Option<String>,
    #[serde(default)]
    pub volume_category: Option<VolumeCategory>,
    /// Path relative to the volume root, e.g. `/photos/2024`.
    pub full_path: String,
    #[serde(default)]
    pub metadata: Metadata,
}

/// The display root of a mounted volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeRootEntry {
    pub key: String,
    pub label: String,
    pub volume_id: String,
    pub category: VolumeCategory,
    #[serde(default)]
    pub device_type: Option<DeviceType>,
}

/// A manufactured container grouping other entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryListEntry {
    pub key: String,
    pub label: String,
    pub root_category: RootCategory,
}

/// A stand-in for a volume expected to mount later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceholderEntry {
    pub key: String,
    pub label: String,
    pub category: VolumeCategory,
}

/// A view-only root such as Recent or Trash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FakeEntry {
    pub key: String,
    pub label: String,
    pub root_category: RootCategory,
}

/// Every entry shape a backend can hand to the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum RawEntry {
    Native(NativeEntry),
    VolumeRoot(VolumeRootEntry),
    EntryList(EntryListEntry),
    Placeholder(PlaceholderEntry),
    Fake(FakeEntry),
}

impl RawEntry {
    pub fn key(&self) -> &str {
        match self {
            Self::Native(e) => &e.key,
            Self::VolumeRoot(e) => &e.key,
            Self::EntryList(e) => &e.key,
            Self::Placeholder(e) => &e.key,
            Self::Fake(e) => &e.key,
        }
    }
}

/// Maps a backend entry onto its canonical record.
///
/// Labels are NFC-normalised. Volume roots and placeholders pick up their
/// `disabled` flag from `policy`. Fields the normalizer does not compute
/// (`expanded`, `children`, ...) are left at their defaults so the cache's
/// read-merge keeps whatever was stored before.
pub fn normalize(raw: &RawEntry, policy: &dyn PolicyService) -> EntryRecord {
    match raw {
        RawEntry::Native(e) => {
            let label = nfc_string(&e.name);
            EntryRecord {
                is_directory: e.is_directory,
                icon: icon_for_file(&label, e.is_directory).to_string(),
                volume_category: e.volume_category,
                volume_id: e.volume_id.clone(),
                full_path: Some(e.full_path.clone()),
                metadata: e.metadata.clone(),
                ..EntryRecord::new(&e.key, EntryKind::Native, label)
            }
        }
        RawEntry::VolumeRoot(e) => EntryRecord {
            icon: icon_for_volume(e.category, e.device_type).to_string(),
            root_category: Some(RootCategory::from_volume(e.category)),
            volume_category: Some(e.category),
            volume_id: Some(e.volume_id.clone()),
            full_path: Some("/".to_string()),
            disabled: policy.is_disabled(e.category),
            is_root_entry: true,
            should_delay_loading_children: e.category.delays_children(),
            ..EntryRecord::new(&e.key, EntryKind::VolumeRoot, nfc_string(&e.label))
        },
        RawEntry::EntryList(e) => EntryRecord {
            icon: icon_for_root(e.root_category).to_string(),
            root_category: Some(e.root_category),
            is_root_entry: true,
            ..EntryRecord::new(&e.key, EntryKind::SyntheticList, nfc_string(&e.label))
        },
        RawEntry::Placeholder(e) => EntryRecord {
            icon: icon_for_volume(e.category, None).to_string(),
            root_category: Some(RootCategory::from_volume(e.category)),
            volume_category: Some(e.category),
            disabled: policy.is_disabled(e.category),
            is_root_entry: true,
            should_delay_loading_children: e.category.is_my_files_nested(),
            ..EntryRecord::new(&e.key, EntryKind::Placeholder, nfc_string(&e.label))
        },
        RawEntry::Fake(e) => EntryRecord {
            icon: icon_for_root(e.root_category).to_string(),
            root_category: Some(e.root_category),
            is_root_entry: true,
            ..EntryRecord::new(&e.key, EntryKind::Virtual, nfc_string(&e.label))
        },
    }
}
