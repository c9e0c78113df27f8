//! UniFM core library: UI-agnostic entry cache and navigation composer.
//!
//! `unifm-core` keeps a single normalized view over the entries of many
//! storage backends (local volumes, removable media, network shares, cloud
//! drives, virtual views) and composes the navigation list a file browser
//! shows for them. All changes go through a pure reducer, so frontends only
//! ever see immutable snapshots.
//!
//! # Modules
//!
//! - [`entry`]: Canonical [`EntryRecord`], the normalizer, the cache and its reachability sweep.
//! - [`volume`]: Mounted volumes and the nesting and grouping rules for their roots.
//! - [`directory`]: Current directory, selection aggregates and file tasks.
//! - [`nav`]: Navigation list composition, shortcuts and Android apps.
//! - [`lookup`]: Async collaborator traits and the sequence numbers guarding their results.
//! - [`action`] / [`reducer`] / [`store`]: The action set, the root reducer and the snapshot store.
//! - [`config`]: TOML-based settings.
//! - [`error`]: Unified error type ([`CoreError`]) and result alias ([`CoreResult`]).

pub mod action;
pub mod config;
pub mod context;
pub mod directory;
pub mod entry;
pub mod error;
pub mod lookup;
pub mod nav;
pub mod reducer;
pub mod state;
pub mod store;
pub mod volume;

pub use action::{Action, ActionCategory, ACTION_TYPES};
pub use config::settings::Config;
pub use context::{AllowAll, AlwaysLive, Context, DisabledCategories, PolicyService, VolumeLiveness};
pub use directory::current::{CurrentDirectory, DirectoryStatus, PathComponent};
pub use directory::selection::Selection;
pub use directory::tasks::{FileTask, FileTasks, TaskDescriptor};
pub use entry::category::{DeviceType, RootCategory, VolumeCategory, VolumeSource};
pub use entry::normalize::{normalize, RawEntry};
pub use entry::record::{EntryKind, EntryRecord, Metadata, MetadataUpdate};
pub use error::{CoreError, CoreResult};
pub use lookup::{
    EntryResolver, LookupSequencer, LookupTarget, LookupTicket, MetadataService, ResolvedEntry,
    TaskResolver,
};
pub use nav::roots::{NavigationKind, NavigationRoot, NavigationSection};
pub use reducer::reduce;
pub use state::{get_entry, get_navigation_roots, get_volume, State};
pub use store::Store;
pub use volume::registry::{Volume, VolumeInfo, VolumeMetadata};

/// Normalises a string to NFC (composed) form.
///
/// Some backends hand over names in NFD (decomposed), which makes e.g.
/// Korean Hangul show up as individual Jamo. This helper re-composes them.
pub fn nfc_string(s: &str) -> String {
    use unicode_normalization::UnicodeNormalization;
    s.nfc().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nfc_recomposes_hangul() {
        // "한" as decomposed Jamo.
        assert_eq!(nfc_string("\u{1112}\u{1161}\u{11ab}"), "\u{d55c}");
    }

    #[test]
    fn nfc_leaves_composed_text_alone() {
        assert_eq!(nfc_string("My files"), "My files");
    }
}
