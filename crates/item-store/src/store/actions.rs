//! Store Actions
//!
//! The async sequences behind every user intent: begin on the list, await
//! the remote collection, finish on the list, send any follow-up. The list
//! is reached through [`ListAccess`] and only inside the synchronous steps,
//! so no borrow of it is held across an `.await`.
//!
//! Notices raised along the way are pushed into the caller's buffer.

use crate::domain::{Draft, Item, ListFilter, LocalKey, StoreResult};
use crate::repository::{LocalCache, RemoteCollection};
use super::follow_up::settle;
use super::item_list::{CreateTicket, ItemList};
use super::notice::Notice;
use super::outcome::{CreateOutcome, LoadOutcome, SyncOutcome};

/// Short-lived mutable access to an [`ItemList`] owned elsewhere
pub trait ListAccess {
    fn with_list<T>(&mut self, f: impl FnOnce(&mut ItemList) -> T) -> T;
}

impl ListAccess for ItemList {
    fn with_list<T>(&mut self, f: impl FnOnce(&mut ItemList) -> T) -> T {
        f(self)
    }
}

/// Fetch the (filtered) collection, falling back to the cache on failure.
/// After a successful listing every local-only item is sent again.
pub async fn load<L, R>(
    list: &mut L,
    remote: &R,
    cache: &dyn LocalCache,
    filter: &ListFilter,
    notices: &mut Vec<Notice>,
) -> LoadOutcome
where
    L: ListAccess,
    R: RemoteCollection + ?Sized,
{
    let query = list.with_list(|list| list.schema().query(filter));
    let result = remote.select(&query).await;
    let outcome = list.with_list(|list| list.apply_loaded(result, cache));
    notices.extend(outcome.notice());

    if outcome.is_remote() {
        let tickets = list.with_list(ItemList::begin_resync);
        let mut synced = 0;
        for ticket in tickets {
            let created = submit(list, remote, cache, ticket, notices).await;
            if created.remote_id().is_some() {
                synced += 1;
            }
        }
        if synced > 0 {
            notices.push(Notice::info(format!("Synced {} local item(s)", synced)));
        }
    }
    outcome
}

/// Optimistic create. Only validation errors are returned.
pub async fn create<L, R>(
    list: &mut L,
    remote: &R,
    cache: &dyn LocalCache,
    draft: Draft,
    notices: &mut Vec<Notice>,
) -> StoreResult<CreateOutcome>
where
    L: ListAccess,
    R: RemoteCollection + ?Sized,
{
    let ticket = list.with_list(|list| list.begin_create(draft, cache))?;
    Ok(submit(list, remote, cache, ticket, notices).await)
}

async fn submit<L, R>(
    list: &mut L,
    remote: &R,
    cache: &dyn LocalCache,
    ticket: CreateTicket,
    notices: &mut Vec<Notice>,
) -> CreateOutcome
where
    L: ListAccess,
    R: RemoteCollection + ?Sized,
{
    let result = remote.insert(ticket.fields()).await;
    let outcome = list.with_list(|list| list.finish_create(ticket, result, cache));
    notices.extend(outcome.notice());
    if let Some(follow_up) = outcome.follow_up() {
        let settled = settle(remote, &follow_up).await;
        notices.extend(settled.notice("sync the new item"));
    }
    outcome
}

/// Optimistic update. Only validation and lookup errors are returned.
pub async fn update<L, R>(
    list: &mut L,
    remote: &R,
    cache: &dyn LocalCache,
    key: LocalKey,
    draft: Draft,
    notices: &mut Vec<Notice>,
) -> StoreResult<SyncOutcome>
where
    L: ListAccess,
    R: RemoteCollection + ?Sized,
{
    let Some(ticket) = list.with_list(|list| list.begin_update(key, draft, cache))? else {
        return Ok(SyncOutcome::LocalOnly);
    };
    let result = remote.update(ticket.id(), ticket.fields()).await;
    let outcome = list.with_list(|list| list.finish_update(&ticket, result));
    notices.extend(outcome.notice("update the item"));
    Ok(outcome)
}

/// Optimistic delete; the local removal is never rolled back
pub async fn remove<L, R>(
    list: &mut L,
    remote: &R,
    cache: &dyn LocalCache,
    key: LocalKey,
    notices: &mut Vec<Notice>,
) -> StoreResult<SyncOutcome>
where
    L: ListAccess,
    R: RemoteCollection + ?Sized,
{
    let Some(ticket) = list.with_list(|list| list.begin_remove(key, cache))? else {
        return Ok(SyncOutcome::LocalOnly);
    };
    let result = remote.delete(ticket.id()).await;
    let outcome = list.with_list(|list| list.finish_remove(&ticket, result));
    notices.extend(outcome.notice("delete the item"));
    Ok(outcome)
}

/// Fresh copy of a listed item for the details view.
///
/// Pending items, failed reads and vanished rows fall back to the listed copy.
pub async fn details<L, R>(
    list: &mut L,
    remote: &R,
    key: LocalKey,
    notices: &mut Vec<Notice>,
) -> Option<Item>
where
    L: ListAccess,
    R: RemoteCollection + ?Sized,
{
    let listed = list.with_list(|list| list.get(key).cloned())?;
    let Some(id) = listed.remote_id() else {
        return Some(listed);
    };
    match remote.fetch(id).await {
        Ok(Some(record)) => Some(Item::from_record(key, record)),
        Ok(None) => {
            log::warn!("row {} no longer exists remotely", id);
            Some(listed)
        }
        Err(error) => {
            log::warn!("fetch of row {} failed: {}", id, error);
            notices.push(Notice::warning(format!("Could not refresh details ({})", error)));
            Some(listed)
        }
    }
}
