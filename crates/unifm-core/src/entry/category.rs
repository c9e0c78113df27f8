//! Backend families and display classifications.

use serde::{Deserialize, Serialize};

/// Which backend family a volume (and its entries) belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeCategory {
    /// The local "My files" volume. Acts as the container for nested families.
    Downloads,
    /// Cloud-sync backend.
    Drive,
    Removable,
    Archive,
    /// Third-party file system provider.
    Provided,
    /// Media transfer protocol bridge (phones, cameras).
    Mtp,
    MediaView,
    DocumentsProvider,
    /// Linux container bridge.
    Crostini,
    GuestOs,
    /// Per-app sandboxed Android storage.
    AndroidFiles,
    Smb,
    Testing,
}

impl VolumeCategory {
    /// Snake-case identifier, matching the serialized form.
    pub fn id(self) -> &'static str {
        match self {
            Self::Downloads => "downloads",
            Self::Drive => "drive",
            Self::Removable => "removable",
            Self::Archive => "archive",
            Self::Provided => "provided",
            Self::Mtp => "mtp",
            Self::MediaView => "media_view",
            Self::DocumentsProvider => "documents_provider",
            Self::Crostini => "crostini",
            Self::GuestOs => "guest_os",
            Self::AndroidFiles => "android_files",
            Self::Smb => "smb",
            Self::Testing => "testing",
        }
    }

    /// Categories whose roots are attached under the My Files container
    /// instead of appearing as navigation roots of their own.
    pub fn is_my_files_nested(self) -> bool {
        matches!(self, Self::AndroidFiles | Self::Crostini | Self::GuestOs)
    }

    /// Categories whose children are expensive to list and should only be
    /// loaded when the user expands them.
    pub fn delays_children(self) -> bool {
        matches!(self, Self::Smb | Self::Provided)
    }
}

/// Semantic classification of a root, used for display and for the
/// directory state's root type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RootCategory {
    MyFiles,
    Drive,
    /// Synthetic "Google Drive" umbrella grouping the Drive roots.
    DriveUmbrella,
    SharedDrivesGrandRoot,
    ComputersGrandRoot,
    SharedWithMe,
    DriveOffline,
    Removable,
    /// Synthetic parent grouping partitions of one physical device.
    RemovableGroup,
    Archive,
    Provided,
    Mtp,
    MediaView,
    DocumentsProvider,
    Crostini,
    GuestOs,
    AndroidFiles,
    Smb,
    Recent,
    Trash,
    Testing,
}

impl RootCategory {
    /// Root classification of a mounted volume of the given category.
    pub fn from_volume(category: VolumeCategory) -> Self {
        match category {
            VolumeCategory::Downloads => Self::MyFiles,
            VolumeCategory::Drive => Self::Drive,
            VolumeCategory::Removable => Self::Removable,
            VolumeCategory::Archive => Self::Archive,
            VolumeCategory::Provided => Self::Provided,
            VolumeCategory::Mtp => Self::Mtp,
            VolumeCategory::MediaView => Self::MediaView,
            VolumeCategory::DocumentsProvider => Self::DocumentsProvider,
            VolumeCategory::Crostini => Self::Crostini,
            VolumeCategory::GuestOs => Self::GuestOs,
            VolumeCategory::AndroidFiles => Self::AndroidFiles,
            VolumeCategory::Smb => Self::Smb,
            VolumeCategory::Testing => Self::Testing,
        }
    }
}

/// Where a volume's data physically comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeSource {
    Device,
    /// Backed by a file, e.g. a mounted archive.
    File,
    Network,
    System,
}

/// Physical device kind of a removable volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    Usb,
    Sd,
    Optical,
    Mobile,
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_categories() {
        assert!(VolumeCategory::AndroidFiles.is_my_files_nested());
        assert!(VolumeCategory::Crostini.is_my_files_nested());
        assert!(VolumeCategory::GuestOs.is_my_files_nested());
        assert!(!VolumeCategory::Downloads.is_my_files_nested());
        assert!(!VolumeCategory::Removable.is_my_files_nested());
    }

    #[test]
    fn id_matches_serde_name() {
        for category in [
            VolumeCategory::Downloads,
            VolumeCategory::MediaView,
            VolumeCategory::DocumentsProvider,
            VolumeCategory::AndroidFiles,
        ] {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.id()));
        }
    }

    #[test]
    fn downloads_maps_to_my_files_root() {
        assert_eq!(
            RootCategory::from_volume(VolumeCategory::Downloads),
            RootCategory::MyFiles
        );
        assert_eq!(
            RootCategory::from_volume(VolumeCategory::Smb),
            RootCategory::Smb
        );
    }
}
