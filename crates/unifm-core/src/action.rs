//! Actions accepted by the reducer.
//!
//! Every state change is represented by the [`Action`] enum. Actions
//! serialize as adjacently tagged JSON (`{"type": "MOUNT_VOLUME", "payload":
//! {...}}`) so hosts can forward them across a process boundary;
//! [`Action::from_json`] decodes them and maps unrecognised tags onto
//! [`Action::Unknown`] instead of failing.

use serde::{Deserialize, Serialize};

use crate::directory::current::DirectoryStatus;
use crate::directory::tasks::FileTask;
use crate::entry::normalize::RawEntry;
use crate::entry::record::MetadataUpdate;
use crate::error::{CoreError, CoreResult};
use crate::lookup::{LookupTarget, LookupTicket};
use crate::nav::apps::AndroidApp;
use crate::volume::registry::{VolumeInfo, VolumeMetadata};

/// Every state transition the core understands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    // Volumes
    MountVolume {
        info: VolumeInfo,
        #[serde(default)]
        metadata: VolumeMetadata,
    },
    UnmountVolume {
        volume_id: String,
    },
    // Directory
    ChangeDirectory {
        key: String,
        #[serde(default)]
        entry: Option<RawEntry>,
        status: DirectoryStatus,
    },
    UpdateDirectoryContent {
        entries: Vec<RawEntry>,
    },
    ChangeSelection {
        keys: Vec<String>,
        #[serde(default)]
        entries: Vec<RawEntry>,
    },
    // Entries
    UpdateMetadata {
        metadata: Vec<MetadataUpdate>,
    },
    AddChildEntries {
        parent_key: String,
        entries: Vec<RawEntry>,
    },
    SetExpanded {
        key: String,
        expanded: bool,
    },
    // Navigation
    RegisterVirtualEntry {
        entry: RawEntry,
    },
    UnregisterVirtualEntry {
        key: String,
    },
    AddShortcut {
        entry: RawEntry,
    },
    RemoveShortcut {
        key: String,
    },
    SetAndroidApps {
        apps: Vec<AndroidApp>,
    },
    RefreshNavigation,
    // Lookups
    IssueLookup {
        target: LookupTarget,
    },
    FileTasksResolved {
        ticket: LookupTicket,
        tasks: Vec<FileTask>,
    },
    MetadataResolved {
        ticket: LookupTicket,
        metadata: Vec<MetadataUpdate>,
    },
    // Cache
    SweepCache,
    /// An action from a newer host that this core does not know.
    #[serde(skip)]
    Unknown {
        kind: String,
    },
}

/// Wire tags of every known action, in declaration order.
pub const ACTION_TYPES: &[&str] = &[
    "MOUNT_VOLUME",
    "UNMOUNT_VOLUME",
    "CHANGE_DIRECTORY",
    "UPDATE_DIRECTORY_CONTENT",
    "CHANGE_SELECTION",
    "UPDATE_METADATA",
    "ADD_CHILD_ENTRIES",
    "SET_EXPANDED",
    "REGISTER_VIRTUAL_ENTRY",
    "UNREGISTER_VIRTUAL_ENTRY",
    "ADD_SHORTCUT",
    "REMOVE_SHORTCUT",
    "SET_ANDROID_APPS",
    "REFRESH_NAVIGATION",
    "ISSUE_LOOKUP",
    "FILE_TASKS_RESOLVED",
    "METADATA_RESOLVED",
    "SWEEP_CACHE",
];

/// Broad grouping of actions, used for logging and to decide which derived
/// state needs recomputing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionCategory {
    Volume,
    Directory,
    Entry,
    Navigation,
    Lookup,
    Cache,
    Unknown,
}

impl ActionCategory {
    /// Human-readable label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Volume => "Volume",
            Self::Directory => "Directory",
            Self::Entry => "Entry",
            Self::Navigation => "Navigation",
            Self::Lookup => "Lookup",
            Self::Cache => "Cache",
            Self::Unknown => "Unknown",
        }
    }
}

impl Action {
    /// Wire tag of the action. Unknown actions report their original tag.
    pub fn name(&self) -> &str {
        match self {
            Self::MountVolume { .. } => "MOUNT_VOLUME",
            Self::UnmountVolume { .. } => "UNMOUNT_VOLUME",
            Self::ChangeDirectory { .. } => "CHANGE_DIRECTORY",
            Self::UpdateDirectoryContent { .. } => "UPDATE_DIRECTORY_CONTENT",
            Self::ChangeSelection { .. } => "CHANGE_SELECTION",
            Self::UpdateMetadata { .. } => "UPDATE_METADATA",
            Self::AddChildEntries { .. } => "ADD_CHILD_ENTRIES",
            Self::SetExpanded { .. } => "SET_EXPANDED",
            Self::RegisterVirtualEntry { .. } => "REGISTER_VIRTUAL_ENTRY",
            Self::UnregisterVirtualEntry { .. } => "UNREGISTER_VIRTUAL_ENTRY",
            Self::AddShortcut { .. } => "ADD_SHORTCUT",
            Self::RemoveShortcut { .. } => "REMOVE_SHORTCUT",
            Self::SetAndroidApps { .. } => "SET_ANDROID_APPS",
            Self::RefreshNavigation => "REFRESH_NAVIGATION",
            Self::IssueLookup { .. } => "ISSUE_LOOKUP",
            Self::FileTasksResolved { .. } => "FILE_TASKS_RESOLVED",
            Self::MetadataResolved { .. } => "METADATA_RESOLVED",
            Self::SweepCache => "SWEEP_CACHE",
            Self::Unknown { kind } => kind.as_str(),
        }
    }

    pub fn category(&self) -> ActionCategory {
        match self {
            Self::MountVolume { .. } | Self::UnmountVolume { .. } => ActionCategory::Volume,
            Self::ChangeDirectory { .. }
            | Self::UpdateDirectoryContent { .. }
            | Self::ChangeSelection { .. } => ActionCategory::Directory,
            Self::UpdateMetadata { .. }
            | Self::AddChildEntries { .. }
            | Self::SetExpanded { .. } => {
                ActionCategory::Entry
            }
            Self::RegisterVirtualEntry { .. }
            | Self::UnregisterVirtualEntry { .. }
            | Self::AddShortcut { .. }
            | Self::RemoveShortcut { .. }
            | Self::SetAndroidApps { .. }
            | Self::RefreshNavigation => ActionCategory::Navigation,
            Self::IssueLookup { .. }
            | Self::FileTasksResolved { .. }
            | Self::MetadataResolved { .. } => ActionCategory::Lookup,
            Self::SweepCache => ActionCategory::Cache,
            Self::Unknown { .. } => ActionCategory::Unknown,
        }
    }

    /// Whether applying the action can change the navigation list.
    pub fn affects_navigation(&self) -> bool {
        matches!(
            self.category(),
            ActionCategory::Volume | ActionCategory::Navigation
        )
    }

    /// Entries carried by the action that go through the cache before the
    /// action itself is applied.
    pub fn carried_entries(&self) -> Vec<&RawEntry> {
        match self {
            Self::ChangeDirectory { entry, .. } => entry.iter().collect(),
            Self::UpdateDirectoryContent { entries }
            | Self::ChangeSelection { entries, .. }
            | Self::AddChildEntries { entries, .. } => entries.iter().collect(),
            Self::RegisterVirtualEntry { entry } | Self::AddShortcut { entry } => vec![entry],
            _ => Vec::new(),
        }
    }

    /// Decodes an action from JSON.
    ///
    /// # Errors
    ///
    /// [`CoreError::ActionDecode`] if the text is not JSON, has no `type`
    /// tag, or carries a known tag with a malformed payload. Unknown tags
    /// decode to [`Action::Unknown`].
    pub fn from_json(text: &str) -> CoreResult<Self> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|e| CoreError::ActionDecode(e.to_string()))?;
        let kind = value
            .get("type")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| CoreError::ActionDecode("missing action type".to_string()))?;
        if !ACTION_TYPES.contains(&kind) {
            return Ok(Self::Unknown {
                kind: kind.to_string(),
            });
        }
        serde_json::from_value(value).map_err(|e| CoreError::ActionDecode(e.to_string()))
    }

    /// Encodes the action as JSON.
    ///
    /// # Errors
    ///
    /// [`CoreError::ActionDecode`] for [`Action::Unknown`], which has no
    /// payload to encode.
    pub fn to_json(&self) -> CoreResult<String> {
        serde_json::to_string(self).map_err(|e| CoreError::ActionDecode(e.to_string()))
    }
}
