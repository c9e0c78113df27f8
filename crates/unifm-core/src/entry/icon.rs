//! Icon classification for entries.
//!
//! Icons are abstract class names (e.g. `"folder"`, `"usb"`); the rendering
//! layer maps them to glyphs or images.

use crate::entry::category::{DeviceType, RootCategory, VolumeCategory};

/// Icon used for removable partitions once they are grouped under a
/// synthetic device parent. The parent carries the device icon instead.
pub const UNKNOWN_REMOVABLE: &str = "unknown_removable";

/// Returns the icon class for a plain file or directory.
pub fn icon_for_file(name: &str, is_directory: bool) -> &'static str {
    if is_directory {
        return "folder";
    }

    let ext = name
        .rsplit_once('.')
        .map(|(stem, ext)| if stem.is_empty() { "" } else { ext })
        .unwrap_or("");

    icon_for_extension(ext)
}

fn icon_for_extension(ext: &str) -> &'static str {
    match ext.to_lowercase().as_str() {
        "png" | "jpg" | "jpeg" | "gif" | "bmp" | "webp" | "ico" | "tiff" | "tif" | "svg"
        | "avif" | "raw" => "image",
        "mp3" | "wav" | "flac" | "ogg" | "aac" | "m4a" => "audio",
        "mp4" | "avi" | "mkv" | "mov" | "wmv" | "flv" | "webm" => "video",
        "pdf" => "pdf",
        "zip" | "tar" | "gz" | "bz2" | "xz" | "7z" | "rar" | "iso" => "archive",
        "doc" | "docx" | "odt" | "gdoc" => "document",
        "xls" | "xlsx" | "ods" | "csv" | "gsheet" => "spreadsheet",
        "ppt" | "pptx" | "odp" | "gslides" => "presentation",
        "txt" | "text" | "md" | "markdown" | "log" => "text",
        "rs" | "py" | "js" | "ts" | "go" | "c" | "cpp" | "h" | "java" | "sh" | "json"
        | "toml" | "yaml" | "yml" | "html" | "css" => "code",
        _ => "generic",
    }
}

/// Returns the icon class for the root of a volume.
///
/// Removable volumes are refined by their physical device type.
pub fn icon_for_volume(category: VolumeCategory, device_type: Option<DeviceType>) -> &'static str {
    match category {
        VolumeCategory::Downloads => "my_files",
        VolumeCategory::Drive => "drive",
        VolumeCategory::Removable => icon_for_device(device_type),
        VolumeCategory::Archive => "archive",
        VolumeCategory::Provided => "provided",
        VolumeCategory::Mtp => "phone",
        VolumeCategory::MediaView => "media_view",
        VolumeCategory::DocumentsProvider => "documents_provider",
        VolumeCategory::Crostini => "crostini",
        VolumeCategory::GuestOs => "guest_os",
        VolumeCategory::AndroidFiles => "android_files",
        VolumeCategory::Smb => "smb",
        VolumeCategory::Testing => "folder",
    }
}

/// Returns the icon class for a physical removable device.
pub fn icon_for_device(device_type: Option<DeviceType>) -> &'static str {
    match device_type {
        Some(DeviceType::Usb) => "usb",
        Some(DeviceType::Sd) => "sd",
        Some(DeviceType::Optical) => "optical",
        Some(DeviceType::Mobile) => "phone",
        Some(DeviceType::Unknown) | None => "removable",
    }
}

/// Returns the icon class for a synthetic or virtual root.
pub fn icon_for_root(category: RootCategory) -> &'static str {
    match category {
        RootCategory::MyFiles => "my_files",
        RootCategory::Drive | RootCategory::DriveUmbrella => "drive",
        RootCategory::SharedDrivesGrandRoot => "team_drive",
        RootCategory::ComputersGrandRoot => "computers_grand_root",
        RootCategory::SharedWithMe => "shared",
        RootCategory::DriveOffline => "offline",
        RootCategory::Removable | RootCategory::RemovableGroup => "removable",
        RootCategory::Archive => "archive",
        RootCategory::Provided => "provided",
        RootCategory::Mtp => "phone",
        RootCategory::MediaView => "media_view",
        RootCategory::DocumentsProvider => "documents_provider",
        RootCategory::Crostini => "crostini",
        RootCategory::GuestOs => "guest_os",
        RootCategory::AndroidFiles => "android_files",
        RootCategory::Smb => "smb",
        RootCategory::Recent => "recent",
        RootCategory::Trash => "trash",
        RootCategory::Testing => "folder",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_is_folder() {
        assert_eq!(icon_for_file("photos.png", true), "folder");
    }

    #[test]
    fn extension_lookup_is_case_insensitive() {
        assert_eq!(icon_for_file("IMG_0001.JPG", false), "image");
        assert_eq!(icon_for_file("song.Mp3", false), "audio");
    }

    #[test]
    fn dotfile_without_extension_is_generic() {
        assert_eq!(icon_for_file(".bashrc", false), "generic");
        assert_eq!(icon_for_file("Makefile", false), "generic");
    }

    #[test]
    fn removable_volume_uses_device_type() {
        assert_eq!(
            icon_for_volume(VolumeCategory::Removable, Some(DeviceType::Sd)),
            "sd"
        );
        assert_eq!(icon_for_volume(VolumeCategory::Removable, None), "removable");
    }

    #[test]
    fn virtual_roots() {
        assert_eq!(icon_for_root(RootCategory::Recent), "recent");
        assert_eq!(icon_for_root(RootCategory::Trash), "trash");
    }
}
