//! Operation Outcomes
//!
//! What happened after a remote call resolved, and what (if anything)
//! still has to be sent to the remote collection.

use crate::domain::{ItemFields, LocalKey, RemoteId, StoreError};
use super::notice::Notice;

/// Result of `load()`. Never an error: failures fall back to the cache.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// Remote rows replaced the list
    Remote { count: usize },
    /// Remote failed; the cached snapshot was restored
    Cached { count: usize, error: StoreError },
    /// Remote failed and nothing usable was cached
    Empty { error: StoreError },
}

impl LoadOutcome {
    pub fn is_remote(&self) -> bool {
        matches!(self, LoadOutcome::Remote { .. })
    }

    pub fn notice(&self) -> Option<Notice> {
        match self {
            LoadOutcome::Remote { .. } => None,
            LoadOutcome::Cached { count, error } => Some(Notice::warning(format!(
                "Offline: showing {} cached item(s) ({})",
                count, error
            ))),
            LoadOutcome::Empty { error } => Some(Notice::warning(format!(
                "Offline and nothing cached yet ({})",
                error
            ))),
        }
    }
}

/// Remote work left over after a create resolved
#[derive(Debug, Clone, PartialEq)]
pub enum FollowUp {
    /// Push local edits made while the insert was in flight
    Update { id: RemoteId, fields: ItemFields },
    /// Remove a row whose item was deleted while the insert was in flight
    Delete { id: RemoteId },
}

/// Result of reconciling a create
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    /// The pending item was replaced by the server record
    Reconciled { key: LocalKey, id: RemoteId },
    /// The item was edited meanwhile: it took the id, kept its local fields
    Merged { key: LocalKey, id: RemoteId, fields: ItemFields },
    /// The item was deleted meanwhile; the created row must go too
    Orphaned { id: RemoteId },
    /// The list was reloaded meanwhile and lacked the row; it was added back
    Adopted { key: LocalKey, id: RemoteId },
    /// The list was reloaded meanwhile and already shows the row
    AlreadyListed { id: RemoteId },
    /// The insert failed; the item stays local-only
    LocalOnly { key: LocalKey, error: StoreError },
    /// The insert failed for an item that no longer exists
    Dropped,
}

impl CreateOutcome {
    pub fn remote_id(&self) -> Option<RemoteId> {
        match self {
            CreateOutcome::Reconciled { id, .. }
            | CreateOutcome::Merged { id, .. }
            | CreateOutcome::Orphaned { id }
            | CreateOutcome::Adopted { id, .. }
            | CreateOutcome::AlreadyListed { id } => Some(*id),
            CreateOutcome::LocalOnly { .. } | CreateOutcome::Dropped => None,
        }
    }

    pub fn follow_up(&self) -> Option<FollowUp> {
        match self {
            CreateOutcome::Merged { id, fields, .. } => Some(FollowUp::Update {
                id: *id,
                fields: fields.clone(),
            }),
            CreateOutcome::Orphaned { id } => Some(FollowUp::Delete { id: *id }),
            _ => None,
        }
    }

    pub fn notice(&self) -> Option<Notice> {
        match self {
            CreateOutcome::LocalOnly { error, .. } => Some(Notice::warning(format!(
                "Saved locally only; it will sync on the next refresh ({})",
                error
            ))),
            _ => None,
        }
    }
}

/// Result of an update, delete or follow-up call
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    Confirmed,
    /// Nothing was sent: the item has never reached the remote collection
    LocalOnly,
    /// The call failed; the local change stands
    Failed { error: StoreError },
}

impl SyncOutcome {
    pub fn from_result<T>(result: Result<T, StoreError>) -> Self {
        match result {
            Ok(_) => SyncOutcome::Confirmed,
            Err(error) => SyncOutcome::Failed { error },
        }
    }

    /// `action` reads as a verb phrase, e.g. "update the item"
    pub fn notice(&self, action: &str) -> Option<Notice> {
        match self {
            SyncOutcome::Failed { error } => Some(Notice::warning(format!(
                "Could not {} on the server; the change is kept locally ({})",
                action, error
            ))),
            _ => None,
        }
    }
}
