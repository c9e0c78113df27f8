//! Asynchronous lookups and the sequence numbers that guard their results.
//!
//! Lookups (file tasks for the selection, metadata for a listing) run
//! outside the reducer and come back as actions. Each one carries the
//! ticket it was issued with; a result applies only while its ticket is the
//! latest issued for the same target. Newer lookups never cancel older
//! ones, they just make them stale.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::directory::tasks::FileTask;
use crate::entry::category::VolumeCategory;
use crate::entry::normalize::RawEntry;
use crate::entry::record::{Metadata, MetadataUpdate};
use crate::error::CoreResult;

/// What a lookup fetches. Sequence numbers are tracked per target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "target", content = "scope", rename_all = "snake_case")]
pub enum LookupTarget {
    /// Tasks for the current selection.
    FileTasks,
    /// Metadata for a batch of entries, scoped by e.g. the directory key.
    Metadata(String),
}

const METADATA_PREFIX: &str = "metadata:";

impl LookupTarget {
    fn id(&self) -> String {
        match self {
            Self::FileTasks => "file_tasks".to_string(),
            Self::Metadata(scope) => format!("{METADATA_PREFIX}{scope}"),
        }
    }
}

/// Proof of which lookup a result belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupTicket {
    pub target: LookupTarget,
    pub sequence: u64,
}

/// Issues tickets and remembers the latest one per target.
///
/// A target is only remembered while a lookup for it is outstanding: it is
/// forgotten once its result settles. Metadata scopes other than the open
/// directory are forgotten on navigation, and scopes naming evicted entries
/// on every sweep.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LookupSequencer {
    latest: BTreeMap<String, u64>,
    last: u64,
}

impl LookupSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a new ticket for `target`, making every older one stale.
    pub fn issue(&mut self, target: LookupTarget) -> LookupTicket {
        self.last += 1;
        self.latest.insert(target.id(), self.last);
        LookupTicket {
            target,
            sequence: self.last,
        }
    }

    /// Makes every outstanding ticket for `target` stale without issuing a
    /// new one.
    pub fn invalidate(&mut self, target: &LookupTarget) {
        self.last += 1;
        self.latest.insert(target.id(), self.last);
    }

    /// Whether results carrying `ticket` may still be applied.
    pub fn is_current(&self, ticket: &LookupTicket) -> bool {
        self.latest.get(&ticket.target.id()) == Some(&ticket.sequence)
    }

    /// Accepts a result carrying `ticket`. Returns `true` if the ticket was
    /// current; the target is then forgotten, so any later delivery of the
    /// same or an older ticket is stale.
    pub fn settle(&mut self, ticket: &LookupTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.latest.remove(&ticket.target.id());
        true
    }

    /// Forgets every metadata scope for which `keep` returns `false`,
    /// making their outstanding tickets stale.
    pub fn retain_metadata_scopes(&mut self, keep: impl Fn(&str) -> bool) {
        self.latest.retain(|id, _| match id.strip_prefix(METADATA_PREFIX) {
            Some(scope) => keep(scope),
            None => true,
        });
    }

    /// Number of targets with an outstanding lookup.
    pub fn len(&self) -> usize {
        self.latest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.latest.is_empty()
    }

    /// The latest ticket issued (or invalidated) for `target`.
    pub fn latest(&self, target: &LookupTarget) -> Option<LookupTicket> {
        self.latest.get(&target.id()).map(|&sequence| LookupTicket {
            target: target.clone(),
            sequence,
        })
    }
}

/// A backend handle resolved into an entry the core can cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedEntry {
    pub entry: RawEntry,
    #[serde(default)]
    pub category: Option<VolumeCategory>,
    #[serde(default)]
    pub metadata: Metadata,
}

/// Resolves opaque backend handles into entries.
#[async_trait]
pub trait EntryResolver: Send + Sync {
    async fn resolve(&self, handle: &str) -> CoreResult<ResolvedEntry>;
}

/// Fetches metadata properties for entries.
#[async_trait]
pub trait MetadataService: Send + Sync {
    async fn fetch(
        &self,
        keys: &[String],
        property_names: &[String],
    ) -> CoreResult<Vec<MetadataUpdate>>;
}

/// Finds the tasks able to open a set of entries.
#[async_trait]
pub trait TaskResolver: Send + Sync {
    async fn resolve(&self, keys: &[String]) -> CoreResult<Vec<FileTask>>;
}

/// Runs a file-task lookup and wraps the answer into an action.
///
/// Returns `None` when the resolver fails; the failure is logged.
pub async fn fetch_file_tasks(
    resolver: &dyn TaskResolver,
    ticket: LookupTicket,
    keys: &[String],
) -> Option<Action> {
    match resolver.resolve(keys).await {
        Ok(tasks) => Some(Action::FileTasksResolved { ticket, tasks }),
        Err(e) => {
            tracing::warn!("file task lookup #{} failed: {e}", ticket.sequence);
            None
        }
    }
}

/// Runs a metadata lookup and wraps the answer into an action.
pub async fn fetch_metadata(
    service: &dyn MetadataService,
    ticket: LookupTicket,
    keys: &[String],
    property_names: &[String],
) -> Option<Action> {
    match service.fetch(keys, property_names).await {
        Ok(metadata) => Some(Action::MetadataResolved { ticket, metadata }),
        Err(e) => {
            tracing::warn!("metadata lookup #{} failed: {e}", ticket.sequence);
            None
        }
    }
}

/// Resolves `handles` in order, skipping (and logging) the ones that fail.
///
/// Resolved metadata and category are folded into native entries so the
/// result can go straight into an action payload.
pub async fn resolve_entries(resolver: &dyn EntryResolver, handles: &[String]) -> Vec<RawEntry> {
    let mut entries = Vec::with_capacity(handles.len());
    for handle in handles {
        match resolver.resolve(handle).await {
            Ok(resolved) => entries.push(fold_resolved(resolved)),
            Err(e) => tracing::warn!("cannot resolve {handle}: {e}"),
        }
    }
    entries
}

fn fold_resolved(resolved: ResolvedEntry) -> RawEntry {
    match resolved.entry {
        RawEntry::Native(mut native) => {
            native.metadata.extend(resolved.metadata);
            if native.volume_category.is_none() {
                native.volume_category = resolved.category;
            }
            RawEntry::Native(native)
        }
        other => other,
    }
}
