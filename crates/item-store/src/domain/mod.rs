//! Domain Layer
//!
//! Items, drafts, table schemas and errors.
//! This layer has no I/O; serde and chrono only.

mod error;
mod item;
mod draft;
mod query;
mod schema;

pub use error::{StoreError, StoreResult, ValidationError, RemoteError};
pub use item::{Item, ItemFields, LocalKey, Record, RemoteId, SyncState};
pub use draft::{Draft, FormInput};
pub use query::{CompletionFilter, Filter, ListFilter, OrderBy, Query};
pub use schema::{Column, InsertAt, Rules, Schema, Variant};
