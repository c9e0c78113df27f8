//! The store owning the current state snapshot.
//!
//! [`Store::dispatch`] runs the reducer synchronously and publishes the new
//! snapshot to subscribers through a `tokio::sync::watch` channel. The
//! reachability sweep is not run on dispatch; hosts call
//! [`Store::run_idle_tasks`] whenever they are idle.

use std::sync::Arc;

use tokio::sync::watch;

use crate::action::Action;
use crate::context::Context;
use crate::entry::collector;
use crate::lookup::{LookupTarget, LookupTicket};
use crate::reducer::reduce;
use crate::state::State;

/// Owner of the state and the single mutation entry point.
#[derive(Debug)]
pub struct Store {
    state: Arc<State>,
    context: Context,
    snapshots: watch::Sender<Arc<State>>,
}

impl Store {
    /// Creates a store with the initial state and a composed navigation list.
    pub fn new(context: Context) -> Self {
        let state = Arc::new(reduce(State::new(), Action::RefreshNavigation, &context));
        let (snapshots, _) = watch::channel(Arc::clone(&state));
        Self {
            state,
            context,
            snapshots,
        }
    }

    /// The current snapshot.
    pub fn state(&self) -> Arc<State> {
        Arc::clone(&self.state)
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Applies `action` and returns the resulting snapshot.
    pub fn dispatch(&mut self, action: Action) -> Arc<State> {
        let next = reduce((*self.state).clone(), action, &self.context);
        self.publish(next)
    }

    /// Receives every snapshot published after this call.
    pub fn subscribe(&self) -> watch::Receiver<Arc<State>> {
        self.snapshots.subscribe()
    }

    /// Runs deferred work: a pending cache sweep, if enabled.
    ///
    /// Returns `true` if anything ran.
    pub fn run_idle_tasks(&mut self) -> bool {
        if !self.context.config().cache.sweep_on_idle || !self.state.all_entries.sweep_pending() {
            return false;
        }
        let next = collector::sweep((*self.state).clone());
        self.publish(next);
        true
    }

    /// Issues a lookup ticket for `target`. Results carrying an older ticket
    /// for the same target are dropped from now on.
    pub fn issue_lookup(&mut self, target: LookupTarget) -> LookupTicket {
        let state = self.dispatch(Action::IssueLookup {
            target: target.clone(),
        });
        state.lookups.latest(&target).unwrap_or(LookupTicket {
            target,
            sequence: 0,
        })
    }

    fn publish(&mut self, next: State) -> Arc<State> {
        self.state = Arc::new(next);
        self.snapshots.send_replace(Arc::clone(&self.state));
        Arc::clone(&self.state)
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(Context::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::Config;
    use crate::entry::category::{VolumeCategory, VolumeSource};
    use crate::entry::normalize::{NativeEntry, RawEntry};
    use crate::entry::record::{Metadata, MY_FILES_PLACEHOLDER_KEY};
    use crate::volume::registry::{VolumeInfo, VolumeMetadata};

    fn orphan(key: &str) -> Action {
        Action::UpdateDirectoryContent {
            entries: vec![RawEntry::Native(NativeEntry {
                key: key.into(),
                name: key.into(),
                is_directory: false,
                volume_id: None,
                volume_category: None,
                full_path: format!("/{key}"),
                metadata: Metadata::new(),
            })],
        }
    }

    #[test]
    fn new_store_has_navigation() {
        let store = Store::default();
        assert_eq!(store.state().navigation[0].key, MY_FILES_PLACEHOLDER_KEY);
    }

    #[test]
    fn dispatch_returns_new_snapshot() {
        let mut store = Store::default();
        let before = store.state();
        let after = store.dispatch(Action::MountVolume {
            info: VolumeInfo {
                volume_id: "downloads".into(),
                category: VolumeCategory::Downloads,
                label: "Downloads".into(),
                root_key: Some("fs://downloads/".into()),
                source: VolumeSource::System,
                device_type: None,
                satellites: Vec::new(),
            },
            metadata: VolumeMetadata::default(),
        });
        assert!(before.volumes.is_empty());
        assert_eq!(after.volumes.len(), 1);
        assert!(Arc::ptr_eq(&after, &store.state()));
    }

    #[test]
    fn subscribers_see_latest_snapshot() {
        let mut store = Store::default();
        let mut rx = store.subscribe();
        store.dispatch(orphan("a"));
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().all_entries.contains("a"));
    }

    #[test]
    fn idle_sweep_runs_once() {
        let mut store = Store::default();
        store.dispatch(orphan("a"));
        assert!(store.run_idle_tasks());
        assert!(!store.state().all_entries.contains("a"));
        assert!(!store.run_idle_tasks());
    }

    #[test]
    fn idle_sweep_can_be_disabled() {
        let mut config = Config::default();
        config.cache.sweep_on_idle = false;
        let mut store = Store::new(Context::new(config));
        store.dispatch(orphan("a"));
        assert!(!store.run_idle_tasks());
        assert!(store.state().all_entries.contains("a"));
    }

    #[test]
    fn issued_tickets_increase() {
        let mut store = Store::default();
        let first = store.issue_lookup(LookupTarget::FileTasks);
        let second = store.issue_lookup(LookupTarget::FileTasks);
        assert!(second.sequence > first.sequence);
        assert!(store.state().lookups.is_current(&second));
        assert!(!store.state().lookups.is_current(&first));
    }
}
