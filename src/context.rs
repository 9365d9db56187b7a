//! Application Context
//!
//! Shared state provided via Leptos Context API.

use std::rc::Rc;

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use item_store::{Notice, NoticeKind, RemoteCollection, Schema, StoreConfig};

use crate::commands;
use crate::store::{store_dismiss_notice, store_push_notice, AppStore, AppStateStoreFields};

/// App-wide handles provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Application state
    pub store: AppStore,
    /// Remote collection; not `Send`, so kept in local storage
    remote: StoredValue<Rc<dyn RemoteCollection>, LocalStorage>,
    config: StoredValue<StoreConfig>,
    /// Bumped whenever something worth showing was logged - read
    pub log_version: ReadSignal<u32>,
    /// Bumped whenever something worth showing was logged - write
    set_log_version: WriteSignal<u32>,
}

impl AppContext {
    pub fn new(
        store: AppStore,
        remote: Rc<dyn RemoteCollection>,
        config: StoreConfig,
        log_version: (ReadSignal<u32>, WriteSignal<u32>),
    ) -> Self {
        Self {
            store,
            remote: StoredValue::new_local(remote),
            config: StoredValue::new(config),
            log_version: log_version.0,
            set_log_version: log_version.1,
        }
    }

    pub fn remote(&self) -> Rc<dyn RemoteCollection> {
        self.remote.get_value()
    }

    pub fn config(&self) -> StoreConfig {
        self.config.get_value()
    }

    pub fn schema(&self) -> Schema {
        self.config.with_value(|config| config.schema())
    }

    /// Reload the list from the remote collection (or the cache)
    pub fn reload(&self) {
        let ctx = *self;
        spawn_local(async move {
            commands::load(ctx).await;
        });
    }

    /// Show a notice and schedule its dismissal
    pub fn notify(&self, notice: Notice) {
        match notice.kind {
            NoticeKind::Error => {
                let _ = rolling_logger::error(&notice.message);
            }
            NoticeKind::Warning => log::warn!("{}", notice.message),
            NoticeKind::Info => {
                let _ = rolling_logger::info(&notice.message);
            }
        }
        let store = self.store;
        let id = store_push_notice(&store, notice);
        let delay = self.config.with_value(|config| config.notice_ms);
        spawn_local(async move {
            TimeoutFuture::new(delay).await;
            store_dismiss_notice(&store, id);
        });
        self.touch_log();
    }

    pub fn notify_all(&self, notices: impl IntoIterator<Item = Notice>) {
        for notice in notices {
            self.notify(notice);
        }
    }

    /// Tell the activity panel new lines may be available
    pub fn touch_log(&self) {
        self.set_log_version.update(|v| *v += 1);
    }

    /// Whether the current schema carries a `completed` column
    pub fn has_completion(&self) -> bool {
        self.schema().has(item_store::Column::Completed)
    }

    /// Load in flight (tracked)
    pub fn loading(&self) -> bool {
        self.store.loading().get()
    }
}
