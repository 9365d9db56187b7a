//! Notice Stack Component
//!
//! Transient notices, newest last. Each one dismisses itself after the
//! configured delay; clicking dismisses it early.

use leptos::prelude::*;

use crate::store::{store_dismiss_notice, use_app_store, AppStateStoreFields};

#[component]
pub fn NoticeStack() -> impl IntoView {
    let store = use_app_store();

    view! {
        <div class="notice-stack" role="status">
            <For
                each=move || store.notices().get()
                key=|shown| shown.id
                children=move |shown| {
                    let id = shown.id;
                    view! {
                        <div
                            class=shown.notice.kind.css_class()
                            on:click=move |_| store_dismiss_notice(&store, id)
                        >
                            {shown.notice.message}
                        </div>
                    }
                }
            />
        </div>
    }
}
