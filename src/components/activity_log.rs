//! Activity Log Component
//!
//! Collapsible view of the rolling logger's recent lines.

use leptos::prelude::*;

use crate::context::AppContext;

#[component]
pub fn ActivityLog() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let (open, set_open) = signal(false);

    let lines = move || {
        ctx.log_version.track();
        let mut lines = rolling_logger::recent();
        lines.reverse();
        lines
    };

    view! {
        <section class="activity-log">
            <header class="activity-header">
                <button class="toggle-btn" on:click=move |_| set_open.update(|v| *v = !*v)>
                    {move || if open.get() { "▼ Activity" } else { "▶ Activity" }}
                </button>
                <Show when=move || open.get()>
                    <button
                        class="clear-btn"
                        on:click=move |_| {
                            rolling_logger::clear();
                            ctx.touch_log();
                        }
                    >
                        "Clear"
                    </button>
                </Show>
            </header>
            <Show when=move || open.get()>
                <ul class="activity-lines">
                    {move || lines().into_iter().map(|line| view! { <li>{line}</li> }).collect_view()}
                </ul>
            </Show>
        </section>
    }
}
