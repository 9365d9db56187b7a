//! Item Entity
//!
//! An item as the store sees it: field values plus an explicit sync state.
//! Server rows arrive as [`Record`]s and become [`Item`]s once listed.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifier assigned by the remote collection
pub type RemoteId = i64;

/// Session-unique handle for an item, independent of its sync state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalKey(pub u64);

impl std::fmt::Display for LocalKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Whether the remote collection has acknowledged the item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncState {
    /// Created locally, never acknowledged
    #[default]
    Pending,
    /// Acknowledged with a server-assigned id
    Persisted(RemoteId),
}

impl SyncState {
    pub fn remote_id(&self) -> Option<RemoteId> {
        match self {
            SyncState::Pending => None,
            SyncState::Persisted(id) => Some(*id),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, SyncState::Pending)
    }
}

/// Field values shared by drafts, server records and listed items.
///
/// Field names follow the `entities`/`tasks` tables; the aliases accept the
/// column names used by the other tables.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ItemFields {
    #[serde(alias = "text")]
    pub title: String,
    #[serde(default, alias = "details", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(
        default,
        alias = "deadline",
        with = "date_format",
        skip_serializing_if = "Option::is_none"
    )]
    pub due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
}

impl ItemFields {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

/// A row as returned by the remote collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RemoteId,
    #[serde(flatten)]
    pub fields: ItemFields,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A listed item.
///
/// Serialized into the cache snapshot with `id` set to `null` while pending,
/// so a snapshot keeps the flat row shape of the remote table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "id", default, with = "sync_state_format")]
    pub sync: SyncState,
    #[serde(default)]
    pub key: LocalKey,
    /// Bumped by every local edit; compared when a remote create resolves
    #[serde(default)]
    pub generation: u32,
    #[serde(flatten)]
    pub fields: ItemFields,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Item {
    /// A local-only item that has not reached the remote collection yet
    pub fn pending(key: LocalKey, fields: ItemFields) -> Self {
        Self {
            sync: SyncState::Pending,
            key,
            generation: 0,
            fields,
            created_at: None,
        }
    }

    /// An item mirroring a server row
    pub fn from_record(key: LocalKey, record: Record) -> Self {
        Self {
            sync: SyncState::Persisted(record.id),
            key,
            generation: 0,
            fields: record.fields,
            created_at: record.created_at,
        }
    }

    pub fn remote_id(&self) -> Option<RemoteId> {
        self.sync.remote_id()
    }

    pub fn is_pending(&self) -> bool {
        self.sync.is_pending()
    }

    pub fn label(&self) -> &str {
        &self.fields.title
    }
}

/// `SyncState` <-> nullable `id`
mod sync_state_format {
    use super::{RemoteId, SyncState};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(state: &SyncState, serializer: S) -> Result<S::Ok, S::Error> {
        match state {
            SyncState::Pending => serializer.serialize_none(),
            SyncState::Persisted(id) => serializer.serialize_some(id),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SyncState, D::Error> {
        Ok(match Option::<RemoteId>::deserialize(deserializer)? {
            Some(id) => SyncState::Persisted(id),
            None => SyncState::Pending,
        })
    }
}

/// Dates travel as `YYYY-MM-DD`; full ISO timestamps are cut to their date.
mod date_format {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(date) => serializer.serialize_some(&date.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => {
                let head = text.get(..10).unwrap_or(text);
                NaiveDate::parse_from_str(head, "%Y-%m-%d")
                    .map(Some)
                    .map_err(de::Error::custom)
            }
        }
    }
}
