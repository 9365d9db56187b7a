//! Pager Component

use leptos::prelude::*;

use crate::store::{use_app_store, AppStateStoreFields};

/// Previous / next buttons with one button per page
#[component]
pub fn Pager() -> impl IntoView {
    let store = use_app_store();

    let page = move || store.list().read().page();
    let page_count = move || store.list().read().page_count();
    let go = move |target: usize| store.list().write().paginate(target);

    view! {
        <nav class="pager">
            <button
                class="page-btn"
                disabled=move || page() <= 1
                on:click=move |_| go(page().saturating_sub(1))
            >
                "‹"
            </button>
            {move || {
                (1..=page_count())
                    .map(|n| {
                        view! {
                            <button
                                class=move || if page() == n { "page-btn active" } else { "page-btn" }
                                on:click=move |_| go(n)
                            >
                                {n}
                            </button>
                        }
                    })
                    .collect_view()
            }}
            <button
                class="page-btn"
                disabled=move || page() >= page_count()
                on:click=move |_| go(page() + 1)
            >
                "›"
            </button>
            <span class="item-count">
                {move || format!("{} item(s)", store.list().read().len())}
            </span>
        </nav>
    }
}
