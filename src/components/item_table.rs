//! Item Table Component
//!
//! The current page of the list, one row per item.

use leptos::prelude::*;

use crate::components::ItemRow;
use crate::context::AppContext;
use crate::store::AppStateStoreFields;

#[component]
pub fn ItemTable() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let store = ctx.store;
    let schema = StoredValue::new(ctx.schema());

    let headers = schema.with_value(|schema| {
        schema
            .columns
            .iter()
            .map(|column| view! { <th>{schema.heading(*column)}</th> })
            .collect_view()
    });
    let column_count = schema.with_value(|schema| schema.columns.len() + 2);

    view! {
        <table class="item-table">
            <thead>
                <tr>
                    {headers}
                    <th>"Created"</th>
                    <th class="actions"></th>
                </tr>
            </thead>
            <tbody>
                <Show when=move || store.list().read().is_empty()>
                    <tr class="empty-row">
                        <td colspan=column_count>
                            {move || if ctx.loading() { "Loading..." } else { "Nothing here yet" }}
                        </td>
                    </tr>
                </Show>
                <For
                    each=move || store.list().read().visible().to_vec()
                    key=|item| (item.key, item.generation, item.remote_id())
                    children=move |item| view! { <ItemRow item=item schema=schema /> }
                />
            </tbody>
        </table>
    }
}
