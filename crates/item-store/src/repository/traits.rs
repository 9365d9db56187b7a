//! Repository Layer - Core Traits
//!
//! Defines the abstract interfaces the store calls out to.
//! Implementations can use the hosted REST backend, memory, browser storage, etc.

use async_trait::async_trait;

use crate::domain::{ItemFields, Query, Record, RemoteId, StoreResult};

/// A remote table supporting select / insert / update / delete.
///
/// No transactional guarantees are assumed across calls. Futures are not
/// `Send` so the same implementations run on the browser event loop.
#[async_trait(?Send)]
pub trait RemoteCollection {
    /// List rows matching the query, in the query's order
    async fn select(&self, query: &Query) -> StoreResult<Vec<Record>>;

    /// Read a single row
    async fn fetch(&self, id: RemoteId) -> StoreResult<Option<Record>>;

    /// Insert a row and return it as stored
    async fn insert(&self, fields: &ItemFields) -> StoreResult<Record>;

    /// Overwrite a row's fields and return it as stored
    async fn update(&self, id: RemoteId, fields: &ItemFields) -> StoreResult<Record>;

    /// Delete a row
    async fn delete(&self, id: RemoteId) -> StoreResult<()>;
}

/// A durable string slot store addressed by key
pub trait LocalCache {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
}

impl<T: LocalCache + ?Sized> LocalCache for &T {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }
}
