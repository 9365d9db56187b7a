//! Entity Desk Frontend App
//!
//! Main application component: form and list on the left, details and
//! activity on the right.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::browser;
use crate::components::{
    ActivityLog, DetailsPanel, FilterBar, ItemForm, ItemTable, NoticeStack, Pager,
};
use crate::context::AppContext;
use crate::store::AppState;

#[component]
pub fn App() -> impl IntoView {
    let config = browser::read_config();
    let remote = browser::connect(&config);
    let store = Store::new(AppState::new(&config));
    let heading = match config.variant {
        item_store::Variant::Todos => "Todos",
        item_store::Variant::Entities => "Entities",
        item_store::Variant::Tasks => "Tasks",
    };

    let ctx = AppContext::new(store, remote, config, signal(0u32));
    provide_context(store);
    provide_context(ctx);

    // Initial load
    ctx.reload();

    view! {
        <div class="app-layout">
            <main class="main-content">
                <h1>{heading}</h1>
                <ItemForm />
                <FilterBar />
                <ItemTable />
                <Pager />
            </main>

            <aside class="side-column">
                <DetailsPanel />
                <ActivityLog />
            </aside>

            <NoticeStack />
        </div>
    }
}
