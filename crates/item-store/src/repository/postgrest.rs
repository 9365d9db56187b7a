//! Hosted Backend Collection
//!
//! Talks to the backend-as-a-service REST endpoint (`/rest/v1/<table>`)
//! with the project's anon key. Rows are written with the schema's column
//! names and read back with `Prefer: return=representation`.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::RemoteSettings;
use crate::domain::{
    Filter, ItemFields, Query, Record, RemoteError, RemoteId, Schema, StoreError, StoreResult,
};
use super::traits::RemoteCollection;

/// REST-backed remote table
#[derive(Clone)]
pub struct PostgrestCollection {
    client: Client,
    endpoint: String,
    anon_key: String,
    schema: Schema,
}

impl PostgrestCollection {
    pub fn new(settings: &RemoteSettings, schema: Schema) -> Self {
        let endpoint = format!(
            "{}/rest/v1/{}",
            settings.url.trim_end_matches('/'),
            schema.table
        );
        Self {
            client: Client::new(),
            endpoint,
            anon_key: settings.anon_key.clone(),
            schema,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", self.anon_key))
    }

    async fn rows<T: DeserializeOwned>(&self, request: RequestBuilder) -> StoreResult<Vec<T>> {
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(RemoteError::from)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::Status {
                code: status.as_u16(),
                message: error_message(&body),
            }
            .into());
        }
        response
            .json::<Vec<T>>()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()).into())
    }

    async fn single(&self, request: RequestBuilder, what: &str) -> StoreResult<Record> {
        self.rows::<Record>(request)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound(format!("{} {}", self.schema.table, what)))
    }
}

#[async_trait(?Send)]
impl RemoteCollection for PostgrestCollection {
    async fn select(&self, query: &Query) -> StoreResult<Vec<Record>> {
        log::debug!("select {} {:?}", self.schema.table, query);
        let request = self.client.get(&self.endpoint).query(&query_params(query));
        self.rows(request).await
    }

    async fn fetch(&self, id: RemoteId) -> StoreResult<Option<Record>> {
        let request = self
            .client
            .get(&self.endpoint)
            .query(&[("select", "*".to_string()), ("id", format!("eq.{}", id))]);
        Ok(self.rows::<Record>(request).await?.into_iter().next())
    }

    async fn insert(&self, fields: &ItemFields) -> StoreResult<Record> {
        let payload = Value::Array(vec![Value::Object(self.schema.payload(fields))]);
        let request = self
            .client
            .post(&self.endpoint)
            .header("Prefer", "return=representation")
            .json(&payload);
        self.single(request, "insert returned no row").await
    }

    async fn update(&self, id: RemoteId, fields: &ItemFields) -> StoreResult<Record> {
        let request = self
            .client
            .patch(&self.endpoint)
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=representation")
            .json(&Value::Object(self.schema.payload(fields)));
        self.single(request, &format!("row {}", id)).await
    }

    async fn delete(&self, id: RemoteId) -> StoreResult<()> {
        let response = self
            .authorized(
                self.client
                    .delete(&self.endpoint)
                    .query(&[("id", format!("eq.{}", id))]),
            )
            .send()
            .await
            .map_err(RemoteError::from)?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(RemoteError::Status {
                code: status.as_u16(),
                message: error_message(&body),
            }
            .into())
        }
    }
}

/// Query-string pairs for a listing query
pub fn query_params(query: &Query) -> Vec<(String, String)> {
    let mut params = vec![("select".to_string(), "*".to_string())];
    for filter in &query.filters {
        match filter {
            Filter::Equals { column, value } => {
                params.push((column.clone(), format!("eq.{}", literal(value))));
            }
            Filter::ILike { column, needle } => {
                params.push((column.clone(), format!("ilike.*{}*", needle)));
            }
        }
    }
    if let Some(order) = &query.order {
        let direction = if order.ascending { "asc" } else { "desc" };
        params.push(("order".to_string(), format!("{}.{}", order.column, direction)));
    }
    params
}

fn literal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// Pull `message` out of an error body, falling back to the raw text
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}
