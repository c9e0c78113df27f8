//! Mounted volumes and the rules that place their roots in the tree.

pub mod compose;
pub mod registry;

use crate::context::Context;
use crate::state::State;
use crate::volume::compose::{compose_mounted, decompose_unmounted};
use crate::volume::registry::{Volume, VolumeInfo, VolumeMetadata};

/// Registers a mounted volume and composes its root into the tree.
///
/// The volume root entry, if the backend resolved one, is expected to be
/// cached already; its `disabled` flag is authoritative. Without a cached
/// root the policy service decides.
pub fn mount(
    mut state: State,
    info: &VolumeInfo,
    metadata: &VolumeMetadata,
    ctx: &Context,
) -> State {
    let is_disabled = info
        .root_key
        .as_deref()
        .and_then(|key| state.all_entries.get(key))
        .map(|root| root.disabled)
        .unwrap_or_else(|| ctx.policy().is_disabled(info.category));

    state.volumes.insert(Volume {
        is_disabled,
        ..Volume::from_mount(info, metadata)
    });
    compose_mounted(
        &mut state.all_entries,
        &mut state.volumes,
        &info.volume_id,
        &ctx.config().composition,
    );
    state
}

/// Unregisters a volume and undoes its composition.
///
/// The volume's entries stay cached until the next sweep finds them
/// unreachable.
pub fn unmount(mut state: State, volume_id: &str) -> State {
    let Some(volume) = state.volumes.remove(volume_id) else {
        tracing::warn!("unmount of unknown volume: {volume_id}");
        return state;
    };
    decompose_unmounted(
        &mut state.all_entries,
        &mut state.volumes,
        &volume,
        &state.ui_entries,
    );
    state
}
