//! Item List State Machine
//!
//! Owns the listed items and the paginated view over them. Each operation
//! is split in two synchronous halves around the remote call:
//!
//! - `begin_*` validates, applies the change optimistically, writes the
//!   cache snapshot and returns a ticket describing the remote call to make;
//! - `finish_*` takes that ticket and the remote result and reconciles.
//!
//! No borrow of the list is needed while a remote call is in flight, so
//! concurrent user actions interleave only between these halves.

use std::collections::HashSet;

use crate::config::StoreConfig;
use crate::domain::{
    Draft, InsertAt, Item, ItemFields, LocalKey, Record, RemoteId, Schema, StoreError, StoreResult,
    SyncState,
};
use crate::repository::{snapshot, LocalCache};
use super::outcome::{CreateOutcome, LoadOutcome, SyncOutcome};
use super::pagination;

/// Pending remote insert
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTicket {
    key: LocalKey,
    generation: u32,
    fields: ItemFields,
}

impl CreateTicket {
    pub fn key(&self) -> LocalKey {
        self.key
    }

    pub fn fields(&self) -> &ItemFields {
        &self.fields
    }
}

/// Pending remote update of a persisted item
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateTicket {
    key: LocalKey,
    id: RemoteId,
    fields: ItemFields,
}

impl UpdateTicket {
    pub fn key(&self) -> LocalKey {
        self.key
    }

    pub fn id(&self) -> RemoteId {
        self.id
    }

    pub fn fields(&self) -> &ItemFields {
        &self.fields
    }
}

/// Pending remote delete of a persisted item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoveTicket {
    key: LocalKey,
    id: RemoteId,
}

impl RemoveTicket {
    pub fn key(&self) -> LocalKey {
        self.key
    }

    pub fn id(&self) -> RemoteId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemList {
    schema: Schema,
    cache_key: String,
    items: Vec<Item>,
    page: usize,
    page_size: usize,
    next_key: u64,
    /// Pending items whose insert has been sent and not resolved yet
    in_flight: HashSet<LocalKey>,
    /// In-flight items removed before their insert resolved
    tombstones: HashSet<LocalKey>,
}

impl ItemList {
    pub fn new(schema: Schema, page_size: usize, cache_key: impl Into<String>) -> Self {
        Self {
            schema,
            cache_key: cache_key.into(),
            items: Vec::new(),
            page: 1,
            page_size: page_size.max(1),
            next_key: 1,
            in_flight: HashSet::new(),
            tombstones: HashSet::new(),
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.schema(), config.page_size, config.cache_key.clone())
    }

    // ========================
    // Read access
    // ========================

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, key: LocalKey) -> Option<&Item> {
        self.items.iter().find(|item| item.key == key)
    }

    pub fn key_of_remote(&self, id: RemoteId) -> Option<LocalKey> {
        self.items
            .iter()
            .find(|item| item.remote_id() == Some(id))
            .map(|item| item.key)
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_count(&self) -> usize {
        pagination::page_count(self.items.len(), self.page_size)
    }

    /// Items shown on the current page
    pub fn visible(&self) -> &[Item] {
        &self.items[pagination::page_bounds(self.page, self.items.len(), self.page_size)]
    }

    #[cfg(test)]
    pub(crate) fn tombstone_count(&self) -> usize {
        self.tombstones.len()
    }

    // ========================
    // Pagination
    // ========================

    /// Show the given 1-based page, clamped to the pages that exist
    pub fn paginate(&mut self, page: usize) {
        self.page = pagination::clamp_page(page, self.items.len(), self.page_size);
    }

    fn clamp_page(&mut self) {
        self.paginate(self.page);
    }

    // ========================
    // Load
    // ========================

    /// Replace the listed rows with a remote listing, or fall back to the cache.
    ///
    /// Local-only items survive a successful listing and keep their place at
    /// the schema's insert position; [`ItemList::begin_resync`] sends them.
    pub fn apply_loaded(
        &mut self,
        result: StoreResult<Vec<Record>>,
        cache: &dyn LocalCache,
    ) -> LoadOutcome {
        let outcome = match result {
            Ok(records) => {
                let count = records.len();
                let local: Vec<Item> = self.items.drain(..).filter(Item::is_pending).collect();
                let mut rows = Vec::with_capacity(count);
                for record in records {
                    rows.push(Item::from_record(self.alloc_key(), record));
                }
                self.items = match self.schema.insert_at {
                    InsertAt::Front => local.into_iter().chain(rows).collect(),
                    InsertAt::Back => rows.into_iter().chain(local).collect(),
                };
                self.persist(cache);
                log::debug!("loaded {} row(s) from {}", count, self.schema.table);
                LoadOutcome::Remote { count }
            }
            Err(error) => {
                log::warn!("load from {} failed: {}", self.schema.table, error);
                match snapshot::load(cache, &self.cache_key) {
                    Ok(items) => {
                        self.items = items;
                        self.adopt_keys();
                        LoadOutcome::Cached { count: self.items.len(), error }
                    }
                    Err(StoreError::CacheMiss(_)) => {
                        self.items.clear();
                        LoadOutcome::Empty { error }
                    }
                    Err(cache_error) => {
                        log::warn!("ignoring unreadable cache snapshot: {}", cache_error);
                        self.items.clear();
                        LoadOutcome::Empty { error }
                    }
                }
            }
        };
        self.clamp_page();
        outcome
    }

    /// Tickets re-sending every local-only item that has no insert in flight
    pub fn begin_resync(&mut self) -> Vec<CreateTicket> {
        let tickets: Vec<CreateTicket> = self
            .items
            .iter()
            .filter(|item| item.is_pending() && !self.in_flight.contains(&item.key))
            .map(|item| CreateTicket {
                key: item.key,
                generation: item.generation,
                fields: item.fields.clone(),
            })
            .collect();
        for ticket in &tickets {
            self.in_flight.insert(ticket.key);
        }
        if !tickets.is_empty() {
            log::debug!("re-sending {} local item(s)", tickets.len());
        }
        tickets
    }

    // ========================
    // Create
    // ========================

    /// Validate and insert a local-only item, ahead of the remote insert
    pub fn begin_create(&mut self, draft: Draft, cache: &dyn LocalCache) -> StoreResult<CreateTicket> {
        let fields = draft.into_fields(&self.schema)?;
        let key = self.alloc_key();
        self.place(Item::pending(key, fields.clone()));
        self.in_flight.insert(key);
        self.page = 1;
        self.persist(cache);
        log::debug!("created local item {}", key);
        Ok(CreateTicket { key, generation: 0, fields })
    }

    /// Reconcile a resolved insert with whatever happened to the item since
    pub fn finish_create(
        &mut self,
        ticket: CreateTicket,
        result: StoreResult<Record>,
        cache: &dyn LocalCache,
    ) -> CreateOutcome {
        self.in_flight.remove(&ticket.key);
        let outcome = match result {
            Err(error) => {
                if self.tombstones.remove(&ticket.key) || self.get(ticket.key).is_none() {
                    CreateOutcome::Dropped
                } else {
                    log::warn!("insert of {} failed, keeping it local: {}", ticket.key, error);
                    CreateOutcome::LocalOnly { key: ticket.key, error }
                }
            }
            Ok(record) => {
                let id = record.id;
                // a reload in between may already list the created row
                let listed = self.key_of_remote(id);
                if self.tombstones.remove(&ticket.key) {
                    if let Some(listed) = listed {
                        self.items.retain(|item| item.key != listed);
                    }
                    CreateOutcome::Orphaned { id }
                } else if let Some(index) = self.position_without(ticket.key, listed) {
                    let item = &mut self.items[index];
                    if item.generation == ticket.generation {
                        *item = Item::from_record(ticket.key, record);
                        CreateOutcome::Reconciled { key: ticket.key, id }
                    } else {
                        item.sync = SyncState::Persisted(id);
                        item.created_at = record.created_at;
                        CreateOutcome::Merged {
                            key: ticket.key,
                            id,
                            fields: item.fields.clone(),
                        }
                    }
                } else if listed.is_some() {
                    CreateOutcome::AlreadyListed { id }
                } else {
                    let key = self.alloc_key();
                    self.place(Item::from_record(key, record));
                    CreateOutcome::Adopted { key, id }
                }
            }
        };
        log::debug!("create {} resolved: {:?}", ticket.key, outcome);
        self.persist(cache);
        self.clamp_page();
        outcome
    }

    // ========================
    // Update
    // ========================

    /// Apply an edit locally. Returns a ticket only when the item exists remotely.
    pub fn begin_update(
        &mut self,
        key: LocalKey,
        draft: Draft,
        cache: &dyn LocalCache,
    ) -> StoreResult<Option<UpdateTicket>> {
        let fields = draft.into_fields(&self.schema)?;
        let item = self
            .items
            .iter_mut()
            .find(|item| item.key == key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;
        item.fields = fields.clone();
        item.generation = item.generation.wrapping_add(1);
        let ticket = item.remote_id().map(|id| UpdateTicket { key, id, fields });
        self.persist(cache);
        Ok(ticket)
    }

    /// The optimistic state stays authoritative whatever the remote said
    pub fn finish_update(&self, ticket: &UpdateTicket, result: StoreResult<Record>) -> SyncOutcome {
        if let Err(error) = &result {
            log::warn!("update of {} (id {}) failed: {}", ticket.key, ticket.id, error);
        }
        SyncOutcome::from_result(result)
    }

    // ========================
    // Remove
    // ========================

    /// Remove locally. Returns a ticket only when the item exists remotely.
    pub fn begin_remove(&mut self, key: LocalKey, cache: &dyn LocalCache) -> StoreResult<Option<RemoveTicket>> {
        let index = self
            .items
            .iter()
            .position(|item| item.key == key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;
        let item = self.items.remove(index);
        let ticket = match item.sync {
            SyncState::Persisted(id) => Some(RemoveTicket { key, id }),
            SyncState::Pending => {
                if self.in_flight.contains(&key) {
                    self.tombstones.insert(key);
                }
                None
            }
        };
        self.clamp_page();
        self.persist(cache);
        Ok(ticket)
    }

    /// Local removal is never rolled back
    pub fn finish_remove(&self, ticket: &RemoveTicket, result: StoreResult<()>) -> SyncOutcome {
        if let Err(error) = &result {
            log::warn!("delete of {} (id {}) failed: {}", ticket.key, ticket.id, error);
        }
        SyncOutcome::from_result(result)
    }

    // ========================
    // Helpers
    // ========================

    fn alloc_key(&mut self) -> LocalKey {
        let key = LocalKey(self.next_key);
        self.next_key += 1;
        key
    }

    /// Index of `key` once the row listed under `duplicate` is dropped
    fn position_without(&mut self, key: LocalKey, duplicate: Option<LocalKey>) -> Option<usize> {
        self.get(key)?;
        if let Some(duplicate) = duplicate {
            self.items.retain(|item| item.key != duplicate);
        }
        self.items.iter().position(|item| item.key == key)
    }

    fn place(&mut self, item: Item) {
        match self.schema.insert_at {
            InsertAt::Front => self.items.insert(0, item),
            InsertAt::Back => self.items.push(item),
        }
    }

    /// Keep snapshot keys, re-keying only collisions, and move the counter past them
    fn adopt_keys(&mut self) {
        let mut seen = HashSet::new();
        let mut highest = self.next_key.saturating_sub(1);
        for item in &self.items {
            highest = highest.max(item.key.0);
        }
        for item in &mut self.items {
            if item.key.0 == 0 || !seen.insert(item.key) {
                highest += 1;
                item.key = LocalKey(highest);
                seen.insert(item.key);
            }
        }
        self.next_key = highest + 1;
    }

    fn persist(&self, cache: &dyn LocalCache) {
        if let Err(error) = snapshot::save(cache, &self.cache_key, &self.items) {
            log::warn!("could not write cache snapshot '{}': {}", self.cache_key, error);
        }
    }
}
