//! Item Store
//!
//! Owns an [`ItemList`], a remote collection and a cache, and runs the
//! shared [`actions`](super::actions) against them, buffering notices.

use crate::domain::{Draft, Item, ListFilter, LocalKey, StoreResult};
use crate::repository::{LocalCache, RemoteCollection};
use super::actions;
use super::item_list::ItemList;
use super::notice::Notice;
use super::outcome::{CreateOutcome, LoadOutcome, SyncOutcome};

pub struct ItemStore<R, C> {
    list: ItemList,
    remote: R,
    cache: C,
    filter: ListFilter,
    notices: Vec<Notice>,
}

impl<R: RemoteCollection, C: LocalCache> ItemStore<R, C> {
    pub fn new(list: ItemList, remote: R, cache: C) -> Self {
        Self {
            list,
            remote,
            cache,
            filter: ListFilter::default(),
            notices: Vec::new(),
        }
    }

    pub fn list(&self) -> &ItemList {
        &self.list
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Takes effect on the next `load()`
    pub fn set_filter(&mut self, filter: ListFilter) {
        self.filter = filter;
    }

    /// Drain notices raised since the last call
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Fetch the (filtered) collection; falls back to the cache on failure
    pub async fn load(&mut self) -> LoadOutcome {
        actions::load(&mut self.list, &self.remote, &self.cache, &self.filter, &mut self.notices).await
    }

    /// Optimistic create. Only validation errors are returned.
    pub async fn create(&mut self, draft: Draft) -> StoreResult<CreateOutcome> {
        actions::create(&mut self.list, &self.remote, &self.cache, draft, &mut self.notices).await
    }

    /// Optimistic update. Only validation and lookup errors are returned.
    pub async fn update(&mut self, key: LocalKey, draft: Draft) -> StoreResult<SyncOutcome> {
        actions::update(&mut self.list, &self.remote, &self.cache, key, draft, &mut self.notices).await
    }

    /// Optimistic delete; the local removal is never rolled back
    pub async fn remove(&mut self, key: LocalKey) -> StoreResult<SyncOutcome> {
        actions::remove(&mut self.list, &self.remote, &self.cache, key, &mut self.notices).await
    }

    pub fn paginate(&mut self, page: usize) {
        self.list.paginate(page);
    }

    /// Fresh copy of a listed item, for the details view
    pub async fn details(&mut self, key: LocalKey) -> Option<Item> {
        actions::details(&mut self.list, &self.remote, key, &mut self.notices).await
    }
}
