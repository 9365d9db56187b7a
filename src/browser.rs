//! Browser Integration
//!
//! `localStorage` cache adapter, the page-level configuration object and
//! the choice of remote collection.

use std::rc::Rc;

use wasm_bindgen::JsValue;

use item_store::{
    InMemoryCollection, LocalCache, PostgrestCollection, RemoteCollection, StoreConfig,
    StoreError, StoreResult,
};

/// Global the host page may define before the bundle loads
const CONFIG_GLOBAL: &str = "ENTITY_DESK_CONFIG";

/// `window.localStorage` as a [`LocalCache`]
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    fn storage() -> StoreResult<web_sys::Storage> {
        web_sys::window()
            .ok_or_else(|| StoreError::Cache("no window".into()))?
            .local_storage()
            .map_err(js_error)?
            .ok_or_else(|| StoreError::Cache("localStorage unavailable".into()))
    }
}

impl LocalCache for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage().ok()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        Self::storage()?.set_item(key, value).map_err(js_error)
    }
}

fn js_error(value: JsValue) -> StoreError {
    StoreError::Cache(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
}

/// Read `window.ENTITY_DESK_CONFIG`, falling back to the defaults
pub fn read_config() -> StoreConfig {
    let Some(window) = web_sys::window() else {
        return StoreConfig::default();
    };
    let raw = match js_sys::Reflect::get(&window, &JsValue::from_str(CONFIG_GLOBAL)) {
        Ok(value) if !value.is_undefined() && !value.is_null() => value,
        _ => {
            log::info!("no {} found, using defaults", CONFIG_GLOBAL);
            return StoreConfig::default();
        }
    };
    let parsed = serde_wasm_bindgen::from_value::<StoreConfig>(raw)
        .map_err(|e| StoreError::Config(e.to_string()))
        .and_then(|config| config.validate().map(|_| config));
    match parsed {
        Ok(config) => config,
        Err(e) => {
            log::warn!("ignoring invalid {}: {}", CONFIG_GLOBAL, e);
            StoreConfig::default()
        }
    }
}

/// Hosted backend when configured, otherwise the in-memory demo table
pub fn connect(config: &StoreConfig) -> Rc<dyn RemoteCollection> {
    match config.remote() {
        Some(settings) => {
            log::info!("using hosted table '{}' at {}", config.schema().table, settings.url);
            Rc::new(PostgrestCollection::new(&settings, config.schema()))
        }
        None => {
            log::info!("no backend configured, using in-memory '{}'", config.schema().table);
            Rc::new(InMemoryCollection::new(config.schema()))
        }
    }
}
