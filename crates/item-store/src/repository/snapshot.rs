//! Cache Snapshots
//!
//! The whole item collection is written to a single cache slot as a JSON
//! array and overwritten wholesale on every mutation.

use crate::domain::{Item, StoreError, StoreResult};
use super::traits::LocalCache;

/// Default cache slot
pub const DEFAULT_CACHE_KEY: &str = "todos";

/// Overwrite the slot with the given items
pub fn save(cache: &dyn LocalCache, key: &str, items: &[Item]) -> StoreResult<()> {
    let json = serde_json::to_string(items)?;
    cache.set(key, &json)
}

/// Read the slot back. A missing slot is a [`StoreError::CacheMiss`].
pub fn load(cache: &dyn LocalCache, key: &str) -> StoreResult<Vec<Item>> {
    let json = cache
        .get(key)
        .ok_or_else(|| StoreError::CacheMiss(key.to_string()))?;
    Ok(serde_json::from_str(&json)?)
}
