//! Store Configuration
//!
//! Every field has a default so a partial (or missing) configuration object
//! still yields a working store backed by the in-memory collection.

use serde::{Deserialize, Serialize};

use crate::domain::{Schema, StoreError, StoreResult, Variant};
use crate::repository::DEFAULT_CACHE_KEY;

/// Rows per page
pub const DEFAULT_PAGE_SIZE: usize = 3;
/// How long a notice stays on screen
pub const DEFAULT_NOTICE_MS: u32 = 3_000;
/// Quiet period before a search reloads the list
pub const DEFAULT_FILTER_DEBOUNCE_MS: u32 = 300;

/// Where the hosted backend lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteSettings {
    pub url: String,
    pub anon_key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub supabase_url: Option<String>,
    pub anon_key: Option<String>,
    pub variant: Variant,
    pub page_size: usize,
    pub cache_key: String,
    pub notice_ms: u32,
    pub filter_debounce_ms: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            supabase_url: None,
            anon_key: None,
            variant: Variant::default(),
            page_size: DEFAULT_PAGE_SIZE,
            cache_key: DEFAULT_CACHE_KEY.to_string(),
            notice_ms: DEFAULT_NOTICE_MS,
            filter_debounce_ms: DEFAULT_FILTER_DEBOUNCE_MS,
        }
    }
}

impl StoreConfig {
    pub fn from_json(json: &str) -> StoreResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> StoreResult<()> {
        if self.page_size == 0 {
            return Err(StoreError::Config("page_size must be at least 1".into()));
        }
        if self.cache_key.trim().is_empty() {
            return Err(StoreError::Config("cache_key must not be empty".into()));
        }
        if self.remote_url().is_some() && self.remote_key().is_none() {
            return Err(StoreError::Config("supabase_url is set but anon_key is missing".into()));
        }
        Ok(())
    }

    /// Remote settings, when both URL and key are configured
    pub fn remote(&self) -> Option<RemoteSettings> {
        Some(RemoteSettings {
            url: self.remote_url()?.to_string(),
            anon_key: self.remote_key()?.to_string(),
        })
    }

    pub fn schema(&self) -> Schema {
        self.variant.schema()
    }

    fn remote_url(&self) -> Option<&str> {
        self.supabase_url.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    fn remote_key(&self) -> Option<&str> {
        self.anon_key.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_gives_defaults() {
        let config = StoreConfig::from_json("{}").unwrap();
        assert_eq!(config, StoreConfig::default());
        assert_eq!(config.page_size, 3);
        assert_eq!(config.cache_key, "todos");
        assert!(config.remote().is_none());
    }

    #[test]
    fn test_remote_settings_and_variant() {
        let config = StoreConfig::from_json(
            r#"{"supabase_url":"https://x.example.co","anon_key":"k","variant":"entities"}"#,
        )
        .unwrap();
        assert_eq!(config.schema().table, "entities");
        let remote = config.remote().unwrap();
        assert_eq!(remote.url, "https://x.example.co");
        assert_eq!(remote.anon_key, "k");
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let err = StoreConfig::from_json(r#"{"page_size":0}"#).unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
    }

    #[test]
    fn test_url_without_key_rejected() {
        let err = StoreConfig::from_json(r#"{"supabase_url":"https://x.example.co"}"#).unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
    }
}
