//! Item Store
//!
//! Optimistic create / update / delete over a remote table, mirrored into a
//! local snapshot cache used as the offline fallback.
//!
//! Layered architecture:
//! - domain: items, drafts, table schemas, errors
//! - repository: remote collection and local cache abstractions
//! - store: the optimistic list state machine and its async driver

pub mod config;
pub mod domain;
pub mod render;
pub mod repository;
pub mod store;

pub use config::{RemoteSettings, StoreConfig};
pub use domain::{
    Column, CompletionFilter, Draft, FormInput, Item, ItemFields, ListFilter, LocalKey, Record,
    RemoteError, RemoteId, Schema, StoreError, StoreResult, SyncState, ValidationError, Variant,
};
pub use repository::{InMemoryCollection, LocalCache, MemoryCache, PostgrestCollection, RemoteCollection};
pub use store::{
    actions, settle, CreateOutcome, CreateTicket, FollowUp, ItemList, ItemStore, ListAccess,
    LoadOutcome, Notice, NoticeKind, RemoveTicket, SyncOutcome, UpdateTicket,
};
