//! Repository Layer
//!
//! Remote collection and local cache abstractions and implementations.

mod traits;
mod memory;
mod postgrest;
pub mod snapshot;


pub use traits::{LocalCache, RemoteCollection};
pub use memory::{InMemoryCollection, MemoryCache};
pub use postgrest::{query_params, PostgrestCollection};
pub use snapshot::DEFAULT_CACHE_KEY;
