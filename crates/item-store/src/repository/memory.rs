//! In-Memory Implementations
//!
//! `InMemoryCollection` behaves like a remote table (rows keyed by the
//! table's column names, server-assigned ids and timestamps) and can be
//! switched offline to simulate network failure. `MemoryCache` is a plain
//! key/value map.

use std::cell::{Cell, RefCell};
use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use serde_json::{Map, Value};

use crate::domain::{
    Filter, ItemFields, Query, Record, RemoteError, RemoteId, Schema, StoreError, StoreResult,
};
use super::traits::{LocalCache, RemoteCollection};

type Row = Map<String, Value>;

/// A remote table held in memory
pub struct InMemoryCollection {
    schema: Schema,
    rows: RefCell<Vec<Row>>,
    next_id: Cell<RemoteId>,
    offline: Cell<bool>,
    calls: Cell<usize>,
}

impl InMemoryCollection {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            rows: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
            offline: Cell::new(false),
            calls: Cell::new(0),
        }
    }

    /// Seed rows, assigning ids in order
    pub fn with_rows(schema: Schema, rows: impl IntoIterator<Item = ItemFields>) -> Self {
        let collection = Self::new(schema);
        for fields in rows {
            collection.store_row(&fields);
        }
        collection
    }

    /// Id the next insert will receive
    pub fn set_next_id(&self, id: RemoteId) {
        self.next_id.set(id);
    }

    /// While offline every call fails with [`RemoteError::Offline`]
    pub fn set_offline(&self, offline: bool) {
        self.offline.set(offline);
    }

    /// Number of calls received, including failed ones
    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    pub fn len(&self) -> usize {
        self.rows.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.borrow().is_empty()
    }

    /// Current stored rows decoded, in id order
    pub fn records(&self) -> Vec<Record> {
        let mut records: Vec<Record> = self
            .rows
            .borrow()
            .iter()
            .filter_map(|row| decode(row).ok())
            .collect();
        records.sort_by_key(|r| r.id);
        records
    }

    fn enter(&self) -> StoreResult<()> {
        self.calls.set(self.calls.get() + 1);
        if self.offline.get() {
            return Err(RemoteError::Offline.into());
        }
        Ok(())
    }

    fn store_row(&self, fields: &ItemFields) -> Row {
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        let mut row = self.schema.payload(fields);
        row.insert("id".into(), Value::from(id));
        // One second per id keeps created_at ordering deterministic
        let created = Utc.timestamp_opt(1_700_000_000, 0).single().unwrap_or_default()
            + Duration::seconds(id);
        row.insert("created_at".into(), Value::from(created.to_rfc3339()));

        self.rows.borrow_mut().push(row.clone());
        row
    }

    fn find_index(&self, id: RemoteId) -> Option<usize> {
        self.rows
            .borrow()
            .iter()
            .position(|row| row.get("id").and_then(Value::as_i64) == Some(id))
    }
}

#[async_trait(?Send)]
impl RemoteCollection for InMemoryCollection {
    async fn select(&self, query: &Query) -> StoreResult<Vec<Record>> {
        self.enter()?;
        let mut rows: Vec<Row> = self
            .rows
            .borrow()
            .iter()
            .filter(|row| query.filters.iter().all(|f| matches(row, f)))
            .cloned()
            .collect();

        if let Some(order) = &query.order {
            rows.sort_by(|a, b| {
                let primary = compare(a.get(&order.column), b.get(&order.column));
                let ordering = primary.then_with(|| compare(a.get("id"), b.get("id")));
                if order.ascending { ordering } else { ordering.reverse() }
            });
        }

        rows.iter().map(decode).collect()
    }

    async fn fetch(&self, id: RemoteId) -> StoreResult<Option<Record>> {
        self.enter()?;
        let rows = self.rows.borrow();
        rows.iter()
            .find(|row| row.get("id").and_then(Value::as_i64) == Some(id))
            .map(decode)
            .transpose()
    }

    async fn insert(&self, fields: &ItemFields) -> StoreResult<Record> {
        self.enter()?;
        let row = self.store_row(fields);
        decode(&row)
    }

    async fn update(&self, id: RemoteId, fields: &ItemFields) -> StoreResult<Record> {
        self.enter()?;
        let index = self
            .find_index(id)
            .ok_or_else(|| StoreError::NotFound(format!("{} row {}", self.schema.table, id)))?;
        let mut rows = self.rows.borrow_mut();
        let row = &mut rows[index];
        for (column, value) in self.schema.payload(fields) {
            row.insert(column, value);
        }
        decode(row)
    }

    async fn delete(&self, id: RemoteId) -> StoreResult<()> {
        self.enter()?;
        self.rows
            .borrow_mut()
            .retain(|row| row.get("id").and_then(Value::as_i64) != Some(id));
        Ok(())
    }
}

fn decode(row: &Row) -> StoreResult<Record> {
    Ok(serde_json::from_value(Value::Object(row.clone()))?)
}

fn matches(row: &Row, filter: &Filter) -> bool {
    match filter {
        Filter::Equals { column, value } => row.get(column).unwrap_or(&Value::Null) == value,
        Filter::ILike { column, needle } => row
            .get(column)
            .and_then(Value::as_str)
            .map(|text| text.to_lowercase().contains(&needle.to_lowercase()))
            .unwrap_or(false),
    }
}

/// Nulls first, then numbers, booleans and strings by value
fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.unwrap_or(&Value::Null);
    let b = b.unwrap_or(&Value::Null);
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => a.to_string().cmp(&b.to_string()),
    }
}

/// Key/value cache held in memory
#[derive(Debug, Default)]
pub struct MemoryCache {
    slots: RefCell<HashMap<String, String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let cache = Self::new();
        cache.slots.borrow_mut().insert(key.to_string(), value.to_string());
        cache
    }
}

impl LocalCache for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        self.slots.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.slots.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }
}
