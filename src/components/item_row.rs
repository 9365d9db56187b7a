//! Item Row Component
//!
//! A single item in the table with its edit, details and delete actions.

use leptos::prelude::*;
use leptos::task::spawn_local;

use item_store::render::{cell_text, format_created_at};
use item_store::{Column, Draft, Item, Notice, Schema};

use crate::commands;
use crate::components::DeleteConfirmButton;
use crate::context::AppContext;
use crate::store::AppStateStoreFields;

#[component]
pub fn ItemRow(item: Item, schema: StoredValue<Schema>) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let store = ctx.store;

    let key = item.key;
    let pending = item.is_pending();
    let completed = item.fields.completed.unwrap_or(false);
    let created = format_created_at(item.created_at.as_ref());

    let toggle_fields = item.fields.clone();
    let toggle = move |_: web_sys::Event| {
        let mut fields = toggle_fields.clone();
        fields.completed = Some(!fields.completed.unwrap_or(false));
        spawn_local(async move {
            if let Err(e) = commands::update_item(ctx, key, Draft::new(fields)).await {
                ctx.notify(Notice::error(e.to_string()));
            }
        });
    };

    let delete = move |_: ()| {
        spawn_local(async move {
            if let Err(e) = commands::delete_item(ctx, key).await {
                ctx.notify(Notice::error(e.to_string()));
            }
        });
    };

    let cells = schema.with_value(|schema| {
        schema
            .columns
            .iter()
            .map(|column| match column {
                Column::Completed => view! {
                    <td class="cell-done">
                        <input type="checkbox" checked=completed on:change=toggle.clone() />
                    </td>
                }
                .into_any(),
                Column::Label => view! {
                    <td class="cell-label">
                        <span class="item-text">{cell_text(&item, *column)}</span>
                        {pending.then(|| view! { <span class="badge local" title="Not saved to the server yet">"local"</span> })}
                    </td>
                }
                .into_any(),
                other => view! { <td>{cell_text(&item, *other)}</td> }.into_any(),
            })
            .collect_view()
    });

    let row_class = move || {
        let mut class = String::from("item-row");
        if completed {
            class.push_str(" completed");
        }
        if store.editing().get() == Some(key) {
            class.push_str(" editing");
        }
        if store.details().get() == Some(key) {
            class.push_str(" selected");
        }
        class
    };

    view! {
        <tr class=row_class>
            {cells}
            <td class="cell-created">{created}</td>
            <td class="actions">
                <button class="edit-btn" title="Edit" on:click=move |_| store.editing().set(Some(key))>
                    "✎"
                </button>
                <button class="details-btn" title="Details" on:click=move |_| store.details().set(Some(key))>
                    "ⓘ"
                </button>
                <DeleteConfirmButton button_class="delete-btn" on_confirm=delete />
            </td>
        </tr>
    }
}
