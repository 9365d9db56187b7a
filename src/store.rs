//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity. The item list
//! itself is the platform-independent `ItemList`; the UI only adds what is
//! on screen around it.

use leptos::prelude::*;
use reactive_stores::Store;

use item_store::{ItemList, ListFilter, LocalKey, Notice, StoreConfig};

/// A notice on screen, with the id used to dismiss it
#[derive(Clone, Debug, PartialEq)]
pub struct ShownNotice {
    pub id: u64,
    pub notice: Notice,
}

/// Global application state with field-level reactivity
#[derive(Clone, Debug, Store)]
pub struct AppState {
    /// Listed items, current page and pending-create bookkeeping
    pub list: ItemList,
    /// Search text and completion selector sent with the next load
    pub filter: ListFilter,
    /// Notices currently shown
    pub notices: Vec<ShownNotice>,
    /// Id for the next notice
    pub next_notice_id: u64,
    /// Item loaded into the form for editing
    pub editing: Option<LocalKey>,
    /// Item shown in the details panel
    pub details: Option<LocalKey>,
    /// Load in flight
    pub loading: bool,
}

impl AppState {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            list: ItemList::from_config(config),
            filter: ListFilter::default(),
            notices: Vec::new(),
            next_notice_id: 1,
            editing: None,
            details: None,
            loading: false,
        }
    }
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

/// Get the app store from context
pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}

// ========================
// Store Helper Functions
// ========================

/// Queue a notice and return its id
pub fn store_push_notice(store: &AppStore, notice: Notice) -> u64 {
    let id = store.next_notice_id().get_untracked();
    store.next_notice_id().set(id + 1);
    store.notices().write().push(ShownNotice { id, notice });
    id
}

/// Remove a notice from the stack by id
pub fn store_dismiss_notice(store: &AppStore, id: u64) {
    store.notices().write().retain(|shown| shown.id != id);
}

/// Forget editing/details selections whose item is no longer listed
pub fn store_drop_stale_selection(store: &AppStore) {
    let (editing, details) = {
        let list = store.list().read_untracked();
        let listed = |key: Option<LocalKey>| key.filter(|k| list.get(*k).is_some());
        (
            listed(store.editing().get_untracked()),
            listed(store.details().get_untracked()),
        )
    };
    if editing != store.editing().get_untracked() {
        store.editing().set(editing);
    }
    if details != store.details().get_untracked() {
        store.details().set(details);
    }
}
