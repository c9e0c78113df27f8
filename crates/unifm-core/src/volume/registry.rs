//! Registry of mounted volumes.
//!
//! The registry keeps volumes in mount order; that order is the tie-break
//! the navigation composer uses between volumes of equal priority.

use serde::{Deserialize, Serialize};

use crate::entry::category::{DeviceType, RootCategory, VolumeCategory, VolumeSource};

/// One of the fake roots a Drive volume can expose next to its main root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SatelliteKind {
    SharedDrives,
    Computers,
    SharedWithMe,
    Offline,
}

impl SatelliteKind {
    pub fn root_category(self) -> RootCategory {
        match self {
            Self::SharedDrives => RootCategory::SharedDrivesGrandRoot,
            Self::Computers => RootCategory::ComputersGrandRoot,
            Self::SharedWithMe => RootCategory::SharedWithMe,
            Self::Offline => RootCategory::DriveOffline,
        }
    }
}

/// A Drive satellite root as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveSatellite {
    pub kind: SatelliteKind,
    pub key: String,
    pub label: String,
}

/// Backend description of a volume at mount time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeInfo {
    pub volume_id: String,
    pub category: VolumeCategory,
    pub label: String,
    /// Key of the resolved display root; `None` until the backend resolves it.
    #[serde(default)]
    pub root_key: Option<String>,
    pub source: VolumeSource,
    #[serde(default)]
    pub device_type: Option<DeviceType>,
    #[serde(default)]
    pub satellites: Vec<DriveSatellite>,
}

/// Device and mount details reported alongside [`VolumeInfo`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VolumeMetadata {
    #[serde(default)]
    pub device_path: Option<String>,
    #[serde(default)]
    pub drive_label: Option<String>,
    #[serde(default)]
    pub is_read_only: bool,
    #[serde(default)]
    pub disk_file_system_type: Option<String>,
}

/// A mounted volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Volume {
    pub volume_id: String,
    pub category: VolumeCategory,
    pub label: String,
    pub root_key: Option<String>,
    /// Parent of the root in the navigation tree (My files, the Drive
    /// umbrella or a removable group), if any.
    pub prefix_key: Option<String>,
    pub is_disabled: bool,
    pub is_ejectable: bool,
    pub source: VolumeSource,
    pub device_type: Option<DeviceType>,
    pub device_path: Option<String>,
    pub drive_label: Option<String>,
    pub is_read_only: bool,
    pub disk_file_system_type: Option<String>,
    pub satellites: Vec<DriveSatellite>,
}

impl Volume {
    /// Builds a fresh, not yet composed volume.
    pub fn from_mount(info: &VolumeInfo, metadata: &VolumeMetadata) -> Self {
        Self {
            volume_id: info.volume_id.clone(),
            category: info.category,
            label: info.label.clone(),
            root_key: info.root_key.clone(),
            prefix_key: None,
            is_disabled: false,
            is_ejectable: false,
            source: info.source,
            device_type: info.device_type,
            device_path: metadata.device_path.clone(),
            drive_label: metadata.drive_label.clone(),
            is_read_only: metadata.is_read_only,
            disk_file_system_type: metadata.disk_file_system_type.clone(),
            satellites: info.satellites.clone(),
        }
    }

    /// Key identifying the physical device a removable partition lives on.
    ///
    /// `None` for non-removable volumes and for removable volumes without a
    /// device path.
    pub fn group_key(&self) -> Option<String> {
        if self.category != VolumeCategory::Removable {
            return None;
        }
        let device_path = self.device_path.as_deref()?;
        Some(format!(
            "{device_path}/{}",
            self.drive_label.as_deref().unwrap_or_default()
        ))
    }

    /// Ejectability of an ungrouped volume: device-backed (except MTP
    /// bridges) or file-backed.
    pub fn computed_ejectable(&self) -> bool {
        match self.source {
            VolumeSource::Device => self.category != VolumeCategory::Mtp,
            VolumeSource::File => true,
            VolumeSource::Network | VolumeSource::System => false,
        }
    }
}

/// Mounted volumes in mount order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VolumeRegistry {
    volumes: Vec<Volume>,
}

impl VolumeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, volume_id: &str) -> Option<&Volume> {
        self.volumes.iter().find(|v| v.volume_id == volume_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Volume> {
        self.volumes.iter()
    }

    pub fn len(&self) -> usize {
        self.volumes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }

    /// Registers `volume`. A remount of a known id replaces it in place and
    /// keeps its original position; composition-derived fields carry over.
    pub fn insert(&mut self, volume: Volume) {
        match self.volumes.iter_mut().find(|v| v.volume_id == volume.volume_id) {
            Some(slot) => {
                let prefix_key = slot.prefix_key.take();
                *slot = Volume {
                    prefix_key,
                    ..volume
                };
            }
            None => self.volumes.push(volume),
        }
    }

    /// Removes and returns the volume with `volume_id`.
    pub fn remove(&mut self, volume_id: &str) -> Option<Volume> {
        let index = self.volumes.iter().position(|v| v.volume_id == volume_id)?;
        Some(self.volumes.remove(index))
    }

    /// Replaces the volume with `f(volume)`. Returns `false` if unknown.
    pub fn update(&mut self, volume_id: &str, f: impl FnOnce(Volume) -> Volume) -> bool {
        let Some(index) = self.volumes.iter().position(|v| v.volume_id == volume_id) else {
            return false;
        };
        let next = f(self.volumes[index].clone());
        self.volumes[index] = next;
        true
    }

    /// First volume of `category`, in mount order.
    pub fn first_of(&self, category: VolumeCategory) -> Option<&Volume> {
        self.volumes.iter().find(|v| v.category == category)
    }

    /// The volume whose root entry has `root_key`.
    pub fn by_root_key(&self, root_key: &str) -> Option<&Volume> {
        self.volumes
            .iter()
            .find(|v| v.root_key.as_deref() == Some(root_key))
    }

    /// Removable volumes sharing `group_key`, in mount order.
    pub fn group_members(&self, group_key: &str) -> Vec<&Volume> {
        self.volumes
            .iter()
            .filter(|v| v.group_key().as_deref() == Some(group_key))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(id: &str, category: VolumeCategory, source: VolumeSource) -> VolumeInfo {
        VolumeInfo {
            volume_id: id.into(),
            category,
            label: id.into(),
            root_key: Some(format!("fs://{id}/")),
            source,
            device_type: None,
            satellites: Vec::new(),
        }
    }

    fn removable(id: &str, device_path: &str, drive_label: &str) -> Volume {
        Volume::from_mount(
            &info(id, VolumeCategory::Removable, VolumeSource::Device),
            &VolumeMetadata {
                device_path: Some(device_path.into()),
                drive_label: Some(drive_label.into()),
                ..VolumeMetadata::default()
            },
        )
    }

    #[test]
    fn group_key_combines_path_and_label() {
        let volume = removable("usb1", "/dev/sdb", "KINGSTON");
        assert_eq!(volume.group_key().as_deref(), Some("/dev/sdb/KINGSTON"));
    }

    #[test]
    fn group_key_none_without_device_path() {
        let volume = Volume::from_mount(
            &info("usb1", VolumeCategory::Removable, VolumeSource::Device),
            &VolumeMetadata::default(),
        );
        assert_eq!(volume.group_key(), None);
    }

    #[test]
    fn non_removable_has_no_group_key() {
        let volume = Volume::from_mount(
            &info("zip", VolumeCategory::Archive, VolumeSource::File),
            &VolumeMetadata {
                device_path: Some("/dev/x".into()),
                ..VolumeMetadata::default()
            },
        );
        assert_eq!(volume.group_key(), None);
    }

    #[test]
    fn ejectable_rules() {
        let device = Volume::from_mount(
            &info("usb", VolumeCategory::Removable, VolumeSource::Device),
            &VolumeMetadata::default(),
        );
        let mtp = Volume::from_mount(
            &info("phone", VolumeCategory::Mtp, VolumeSource::Device),
            &VolumeMetadata::default(),
        );
        let archive = Volume::from_mount(
            &info("zip", VolumeCategory::Archive, VolumeSource::File),
            &VolumeMetadata::default(),
        );
        let smb = Volume::from_mount(
            &info("nas", VolumeCategory::Smb, VolumeSource::Network),
            &VolumeMetadata::default(),
        );
        assert!(device.computed_ejectable());
        assert!(!mtp.computed_ejectable());
        assert!(archive.computed_ejectable());
        assert!(!smb.computed_ejectable());
    }

    #[test]
    fn insert_keeps_mount_order_on_remount() {
        let mut registry = VolumeRegistry::new();
        registry.insert(removable("a", "/dev/a", ""));
        registry.insert(removable("b", "/dev/b", ""));
        registry.update("a", |v| Volume {
            prefix_key: Some("parent".into()),
            ..v
        });
        registry.insert(removable("a", "/dev/a", "relabelled"));

        let ids: Vec<_> = registry.iter().map(|v| v.volume_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        let a = registry.get("a").unwrap();
        assert_eq!(a.drive_label.as_deref(), Some("relabelled"));
        assert_eq!(a.prefix_key.as_deref(), Some("parent"));
    }

    #[test]
    fn remove_returns_volume() {
        let mut registry = VolumeRegistry::new();
        registry.insert(removable("a", "/dev/a", ""));
        assert!(registry.remove("a").is_some());
        assert!(registry.remove("a").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn group_members_in_mount_order() {
        let mut registry = VolumeRegistry::new();
        registry.insert(removable("p2", "/dev/sdb", "X"));
        registry.insert(removable("other", "/dev/sdc", "X"));
        registry.insert(removable("p1", "/dev/sdb", "X"));
        let ids: Vec<_> = registry
            .group_members("/dev/sdb/X")
            .iter()
            .map(|v| v.volume_id.as_str())
            .collect();
        assert_eq!(ids, vec!["p2", "p1"]);
    }
}
