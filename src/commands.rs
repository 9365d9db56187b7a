//! Store Command Wrappers
//!
//! Each user intent runs the shared item-store action against the reactive
//! store, then hands the collected notices to the context.

use item_store::{
    actions, CreateOutcome, Draft, Item, ItemList, ListAccess, LoadOutcome, LocalKey, StoreResult,
    SyncOutcome,
};
use leptos::prelude::*;

use crate::browser::BrowserStorage;
use crate::context::AppContext;
use crate::store::{store_drop_stale_selection, AppStateStoreFields, AppStore};

/// The item list inside the reactive store
struct StoreList(AppStore);

impl ListAccess for StoreList {
    fn with_list<T>(&mut self, f: impl FnOnce(&mut ItemList) -> T) -> T {
        let result = f(&mut self.0.list().write());
        store_drop_stale_selection(&self.0);
        result
    }
}

// ========================
// Load
// ========================

pub async fn load(ctx: AppContext) -> LoadOutcome {
    let store = ctx.store;
    let filter = store.filter().get_untracked();
    let mut notices = Vec::new();
    store.loading().set(true);

    let outcome = actions::load(
        &mut StoreList(store),
        &*ctx.remote(),
        &BrowserStorage,
        &filter,
        &mut notices,
    )
    .await;

    store.loading().set(false);
    ctx.notify_all(notices);
    ctx.touch_log();
    outcome
}

// ========================
// Item Commands
// ========================

pub async fn create_item(ctx: AppContext, draft: Draft) -> StoreResult<CreateOutcome> {
    let mut notices = Vec::new();
    let outcome = actions::create(
        &mut StoreList(ctx.store),
        &*ctx.remote(),
        &BrowserStorage,
        draft,
        &mut notices,
    )
    .await;
    ctx.notify_all(notices);
    ctx.touch_log();
    outcome
}

pub async fn update_item(ctx: AppContext, key: LocalKey, draft: Draft) -> StoreResult<SyncOutcome> {
    let mut notices = Vec::new();
    let outcome = actions::update(
        &mut StoreList(ctx.store),
        &*ctx.remote(),
        &BrowserStorage,
        key,
        draft,
        &mut notices,
    )
    .await;
    ctx.notify_all(notices);
    ctx.touch_log();
    outcome
}

pub async fn delete_item(ctx: AppContext, key: LocalKey) -> StoreResult<SyncOutcome> {
    let mut notices = Vec::new();
    let outcome = actions::remove(
        &mut StoreList(ctx.store),
        &*ctx.remote(),
        &BrowserStorage,
        key,
        &mut notices,
    )
    .await;
    ctx.notify_all(notices);
    ctx.touch_log();
    outcome
}

pub async fn fetch_details(ctx: AppContext, key: LocalKey) -> Option<Item> {
    let mut notices = Vec::new();
    let item = actions::details(&mut StoreList(ctx.store), &*ctx.remote(), key, &mut notices).await;
    ctx.notify_all(notices);
    item
}
