//! Follow-up calls left over after a create resolved

use crate::repository::RemoteCollection;
use super::outcome::{FollowUp, SyncOutcome};

/// Send a follow-up to the remote collection. Failures are absorbed.
pub async fn settle<R: RemoteCollection + ?Sized>(remote: &R, follow_up: &FollowUp) -> SyncOutcome {
    let result = match follow_up {
        FollowUp::Update { id, fields } => remote.update(*id, fields).await.map(|_| ()),
        FollowUp::Delete { id } => remote.delete(*id).await,
    };
    if let Err(error) = &result {
        log::warn!("follow-up {:?} failed: {}", follow_up, error);
    }
    SyncOutcome::from_result(result)
}
