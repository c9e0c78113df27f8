//! Core configuration loaded from a TOML file.
//!
//! Every field has a default so the core works without a config file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::entry::category::VolumeCategory;
use crate::error::{CoreError, CoreResult};

/// Top-level core configuration.
///
/// Call [`Config::load`] to read from a TOML path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub navigation: NavigationConfig,
    #[serde(default)]
    pub composition: CompositionConfig,
}

impl Config {
    /// Loads configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NotFound`] if the file does not exist.
    /// - [`CoreError::PermissionDenied`] if the file is not readable.
    /// - [`CoreError::ConfigParse`] if the TOML is malformed.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => CoreError::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => CoreError::PermissionDenied(path.to_path_buf()),
            _ => CoreError::Io(e),
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml(content: &str) -> CoreResult<Self> {
        toml::from_str(content).map_err(|e| CoreError::ConfigParse(e.to_string()))
    }
}

/// Entry cache behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Run pending reachability sweeps from the idle hook.
    #[serde(default = "default_true")]
    pub sweep_on_idle: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            sweep_on_idle: true,
        }
    }
}

/// Navigation list composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationConfig {
    #[serde(default = "default_true")]
    pub show_recent: bool,
    #[serde(default = "default_true")]
    pub show_android_apps: bool,
    #[serde(default = "default_true")]
    pub show_trash: bool,
    /// Priority of volume categories among the "other volumes" section.
    /// Categories not listed sort after all listed ones.
    #[serde(default = "default_category_order")]
    pub category_order: Vec<VolumeCategory>,
}

impl NavigationConfig {
    /// Sort priority of `category`; lower comes first.
    pub fn priority(&self, category: VolumeCategory) -> usize {
        self.category_order
            .iter()
            .position(|c| *c == category)
            .unwrap_or(self.category_order.len())
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            show_recent: true,
            show_android_apps: true,
            show_trash: true,
            category_order: default_category_order(),
        }
    }
}

/// Volume composition rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionConfig {
    /// Group partitions of the same removable device under one parent.
    #[serde(default = "default_true")]
    pub group_removable: bool,
}

impl Default for CompositionConfig {
    fn default() -> Self {
        Self {
            group_removable: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_category_order() -> Vec<VolumeCategory> {
    vec![
        VolumeCategory::Provided,
        VolumeCategory::DocumentsProvider,
        VolumeCategory::Smb,
        VolumeCategory::Removable,
        VolumeCategory::Mtp,
        VolumeCategory::Archive,
        VolumeCategory::MediaView,
        VolumeCategory::Testing,
    ]
}
