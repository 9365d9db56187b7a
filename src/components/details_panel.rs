//! Details Panel Component
//!
//! Shows every field of the selected item. Persisted items are re-read
//! from the remote collection first; the markup comes from `details_html`,
//! which escapes all user values.

use leptos::prelude::*;
use leptos::task::spawn_local;

use item_store::render::details_html;
use item_store::{Item, LocalKey};

use crate::commands;
use crate::context::AppContext;
use crate::store::AppStateStoreFields;

#[component]
pub fn DetailsPanel() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let store = ctx.store;
    let schema = StoredValue::new(ctx.schema());

    let (shown, set_shown) = signal::<Option<Item>>(None);
    let (refresh, set_refresh) = signal(0u32);

    let fetch = move |key: LocalKey| {
        spawn_local(async move {
            let item = commands::fetch_details(ctx, key).await;
            // Ignore answers for a selection that has moved on
            if store.details().get_untracked() == Some(key) {
                set_shown.set(item);
            }
        });
    };

    Effect::new(move |_| {
        refresh.track();
        match store.details().get() {
            Some(key) => fetch(key),
            None => set_shown.set(None),
        }
    });

    view! {
        <Show when=move || store.details().get().is_some()>
            <section class="details-panel">
                <header class="details-header">
                    <h2>"Details"</h2>
                    <button class="refresh-btn" on:click=move |_| set_refresh.update(|v| *v += 1)>"↻"</button>
                    <button class="close-btn" on:click=move |_| store.details().set(None)>"×"</button>
                </header>
                {move || match shown.get() {
                    Some(item) => {
                        let html = schema.with_value(|schema| details_html(&item, schema));
                        view! { <div class="details-body" inner_html=html></div> }.into_any()
                    }
                    None => view! { <p class="details-loading">"Loading..."</p> }.into_any(),
                }}
            </section>
        </Show>
    }
}
