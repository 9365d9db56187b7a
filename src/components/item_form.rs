//! Item Form Component
//!
//! Create form that doubles as the edit form when an item is picked.

use leptos::prelude::*;
use leptos::task::spawn_local;

use item_store::{Column, FormInput, Schema};

use crate::commands;
use crate::context::AppContext;
use crate::store::AppStateStoreFields;

/// Form for creating new items or editing the selected one
#[component]
pub fn ItemForm() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let store = ctx.store;
    let schema = StoredValue::new(ctx.schema());

    let (form, set_form) = signal(FormInput::default());
    let (error, set_error) = signal::<Option<String>>(None);

    // Prefill when an item is picked for editing
    Effect::new(move |_| {
        let input = store
            .editing()
            .get()
            .and_then(|key| {
                store
                    .list()
                    .read_untracked()
                    .get(key)
                    .map(|item| FormInput::from_fields(&item.fields))
            })
            .unwrap_or_default();
        set_form.set(input);
        set_error.set(None);
    });

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let input = form.get_untracked();
        let draft = match schema.with_value(|schema| input.to_draft(schema)) {
            Ok(draft) => draft,
            Err(e) => {
                set_error.set(Some(e.to_string()));
                return;
            }
        };
        let editing = store.editing().get_untracked();
        set_error.set(None);
        set_form.set(FormInput::default());

        spawn_local(async move {
            let result = match editing {
                Some(key) => commands::update_item(ctx, key, draft).await.map(|_| ()),
                None => commands::create_item(ctx, draft).await.map(|_| ()),
            };
            match result {
                Ok(()) => {
                    if editing.is_some() {
                        store.editing().set(None);
                    }
                }
                Err(e) => {
                    set_form.set(input);
                    set_error.set(Some(e.to_string()));
                }
            }
        });
    };

    let fields = schema.with_value(|schema| {
        schema
            .columns
            .iter()
            .map(|column| field_input(schema, *column, form, set_form))
            .collect_view()
    });

    view! {
        <form class="item-form" on:submit=submit>
            <div class="item-form-row">
                {fields}
                <button type="submit">
                    {move || if store.editing().get().is_some() { "Save" } else { "Add" }}
                </button>
                <Show when=move || store.editing().get().is_some()>
                    <button type="button" class="cancel-btn" on:click=move |_| store.editing().set(None)>
                        "Cancel"
                    </button>
                </Show>
            </div>
            {move || error.get().map(|message| view! { <p class="form-error">{message}</p> })}
        </form>
    }
}

/// One input bound to the matching `FormInput` slot
fn field_input(
    schema: &Schema,
    column: Column,
    form: ReadSignal<FormInput>,
    set_form: WriteSignal<FormInput>,
) -> AnyView {
    let placeholder = schema.heading(column);
    if column == Column::Completed {
        return view! {
            <label class="checkbox-field">
                <input
                    type="checkbox"
                    prop:checked=move || form.get().completed
                    on:change=move |ev| {
                        let checked = event_target_checked(&ev);
                        set_form.update(|f| f.completed = checked);
                    }
                />
                {placeholder}
            </label>
        }
        .into_any();
    }

    let input_type = match column {
        Column::Amount | Column::Priority => "number",
        Column::DueDate => "date",
        _ => "text",
    };
    view! {
        <input
            type=input_type
            step=if column == Column::Amount { Some("any") } else { None }
            class=format!("field-{}", placeholder.to_lowercase().replace(' ', "-"))
            placeholder=placeholder
            prop:value=move || text_slot(&form.get(), column)
            on:input=move |ev| {
                let value = event_target_value(&ev);
                set_form.update(|f| {
                    if let Some(slot) = text_slot_mut(f, column) {
                        *slot = value;
                    }
                });
            }
        />
    }
    .into_any()
}

fn text_slot(form: &FormInput, column: Column) -> String {
    match column {
        Column::Label => form.title.clone(),
        Column::Description => form.description.clone(),
        Column::Amount => form.amount.clone(),
        Column::DueDate => form.due_date.clone(),
        Column::Status => form.status.clone(),
        Column::Priority => form.priority.clone(),
        Column::Completed => String::new(),
    }
}

fn text_slot_mut(form: &mut FormInput, column: Column) -> Option<&mut String> {
    match column {
        Column::Label => Some(&mut form.title),
        Column::Description => Some(&mut form.description),
        Column::Amount => Some(&mut form.amount),
        Column::DueDate => Some(&mut form.due_date),
        Column::Status => Some(&mut form.status),
        Column::Priority => Some(&mut form.priority),
        Column::Completed => None,
    }
}
