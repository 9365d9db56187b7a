//! Filter Bar Component
//!
//! Debounced search box, completion selector and refresh button. Every
//! change reloads the list with the new filter.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use item_store::CompletionFilter;

use crate::commands;
use crate::context::AppContext;
use crate::store::AppStateStoreFields;

const COMPLETION_OPTIONS: &[(CompletionFilter, &str)] = &[
    (CompletionFilter::All, "All"),
    (CompletionFilter::Pending, "Pending"),
    (CompletionFilter::Done, "Done"),
];

#[component]
pub fn FilterBar() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let store = ctx.store;
    let debounce_ms = ctx.config().filter_debounce_ms;
    let label = ctx.schema().label_heading();

    let (search, set_search) = signal(String::new());
    // Latest keystroke; older timers see a newer value and give up
    let (keystroke, set_keystroke) = signal(0u32);

    let on_search = move |ev: web_sys::Event| {
        let text = event_target_value(&ev);
        set_search.set(text.clone());
        let seq = keystroke.get_untracked().wrapping_add(1);
        set_keystroke.set(seq);
        spawn_local(async move {
            TimeoutFuture::new(debounce_ms).await;
            if keystroke.get_untracked() != seq {
                return;
            }
            store.filter().update(|f| f.search = text.trim().to_string());
            commands::load(ctx).await;
        });
    };

    let on_completion = move |ev: web_sys::Event| {
        let completion = CompletionFilter::from_str(&event_target_value(&ev));
        store.filter().update(|f| f.completion = completion);
        ctx.reload();
    };

    view! {
        <div class="filter-bar">
            <input
                type="search"
                class="search-input"
                placeholder=format!("Search {}...", label.to_lowercase())
                prop:value=move || search.get()
                on:input=on_search
            />
            <Show when=move || ctx.has_completion()>
                <select class="completion-filter" on:change=on_completion>
                    {COMPLETION_OPTIONS
                        .iter()
                        .map(|(value, text)| {
                            let value = *value;
                            view! {
                                <option
                                    value=value.as_str()
                                    selected=move || store.filter().get().completion == value
                                >
                                    {*text}
                                </option>
                            }
                        })
                        .collect_view()}
                </select>
            </Show>
            <button
                type="button"
                class="refresh-btn"
                disabled=move || ctx.loading()
                on:click=move |_| ctx.reload()
            >
                {move || if ctx.loading() { "Loading..." } else { "Refresh" }}
            </button>
        </div>
    }
}
