//! Explicit context threaded into every reducer call.
//!
//! Host-level services (the policy engine, the backend's view of which
//! volumes are live) are consulted through traits held here rather than
//! through process-wide singletons.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::config::settings::Config;
use crate::entry::category::VolumeCategory;

/// Host policy deciding whether a whole backend family is disabled.
pub trait PolicyService: Send + Sync {
    fn is_disabled(&self, category: VolumeCategory) -> bool;
}

/// The backend's current view of which volumes are actually live.
pub trait VolumeLiveness: Send + Sync {
    fn is_live(&self, volume_id: &str) -> bool;
}

/// Policy that disables nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl PolicyService for AllowAll {
    fn is_disabled(&self, _category: VolumeCategory) -> bool {
        false
    }
}

/// Policy that disables a fixed set of categories.
#[derive(Debug, Clone, Default)]
pub struct DisabledCategories(pub BTreeSet<VolumeCategory>);

impl PolicyService for DisabledCategories {
    fn is_disabled(&self, category: VolumeCategory) -> bool {
        self.0.contains(&category)
    }
}

/// Liveness oracle that reports every registered volume as live.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysLive;

impl VolumeLiveness for AlwaysLive {
    fn is_live(&self, _volume_id: &str) -> bool {
        true
    }
}

/// Collaborators and configuration available to reducers.
#[derive(Clone)]
pub struct Context {
    policy: Arc<dyn PolicyService>,
    liveness: Arc<dyn VolumeLiveness>,
    config: Config,
}

impl Context {
    /// Creates a context with permissive collaborators.
    pub fn new(config: Config) -> Self {
        Self {
            policy: Arc::new(AllowAll),
            liveness: Arc::new(AlwaysLive),
            config,
        }
    }

    #[must_use]
    pub fn with_policy(self, policy: Arc<dyn PolicyService>) -> Self {
        Self { policy, ..self }
    }

    #[must_use]
    pub fn with_liveness(self, liveness: Arc<dyn VolumeLiveness>) -> Self {
        Self { liveness, ..self }
    }

    pub fn policy(&self) -> &dyn PolicyService {
        self.policy.as_ref()
    }

    pub fn liveness(&self) -> &dyn VolumeLiveness {
        self.liveness.as_ref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
