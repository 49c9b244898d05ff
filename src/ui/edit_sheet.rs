use dioxus::prelude::{Key, *};

use crate::state::edit_session::Draft;
use crate::state::table_state::TableState;

/// Side sheet for the open draft, if any.
#[component]
pub fn EditSheet(data: Signal<TableState>, error_message: Signal<Option<String>>) -> Element {
    let snapshot: Option<(Draft, Vec<String>)> = {
        let state = data.read();
        state
            .draft()
            .map(|draft| (draft.clone(), state.columns().as_slice().to_vec()))
    };
    let Some((draft, columns)) = snapshot else {
        return rsx! {};
    };

    let title = if draft.mode().appends() {
        format!("Create new row (#{})", draft.id())
    } else {
        "Edit row".to_string()
    };
    let id = draft.id();

    rsx! {
        div {
            class: "sheet-backdrop",
            id: "edit-sheet",
            tabindex: "-1",
            onkeydown: move |evt| {
                if evt.key() == Key::Escape {
                    cancel(data);
                }
            },
            div { class: "sheet",
                h2 { class: "sheet-title", "{title}" }
                div { class: "sheet-field",
                    label { r#for: "field-selfId", "selfId" }
                    input {
                        class: "sheet-input",
                        id: "field-selfId",
                        disabled: true,
                        value: "{id}",
                    }
                }
                for col in columns {
                    DraftField {
                        key: "{col}",
                        value: draft.record().value(&col).to_string(),
                        column: col,
                        data,
                        error_message,
                    }
                }
                div { class: "sheet-actions",
                    button {
                        class: "toolbar-btn",
                        id: "btn-cancel-draft",
                        onclick: move |_| cancel(data),
                        "Cancel"
                    }
                    button {
                        class: "toolbar-btn toolbar-btn-primary",
                        id: "btn-save-draft",
                        onclick: move |_| commit(data, error_message),
                        "Save Changes"
                    }
                }
            }
        }
    }
}

#[component]
fn DraftField(
    column: String,
    value: String,
    data: Signal<TableState>,
    error_message: Signal<Option<String>>,
) -> Element {
    let input_id = format!("field-{}", sanitize_id(&column));
    let rows = value.lines().count().clamp(1, 8).to_string();

    rsx! {
        div { class: "sheet-field",
            label { r#for: "{input_id}", "{column}" }
            textarea {
                class: "sheet-input",
                id: "{input_id}",
                rows: "{rows}",
                value: "{value}",
                oninput: {
                    let column = column.clone();
                    move |evt: Event<FormData>| update_field(data, error_message, &column, evt.value())
                },
            }
        }
    }
}

fn cancel(mut data: Signal<TableState>) {
    data.with_mut(|state| {
        state.cancel_draft();
    });
}

fn update_field(
    mut data: Signal<TableState>,
    mut error_message: Signal<Option<String>>,
    column: &str,
    value: String,
) {
    if let Err(err) = data.with_mut(|state| state.set_draft_field(column, value)) {
        error_message.set(Some(err.to_string()));
    }
}

/// A refused blank draft stays open; a vanished target closes the sheet.
/// Either way the reason lands in the toolbar.
fn commit(mut data: Signal<TableState>, mut error_message: Signal<Option<String>>) {
    match data.with_mut(|state| state.commit_draft()) {
        Ok(_) => error_message.set(None),
        Err(err) => error_message.set(Some(err.to_string())),
    }
}

fn sanitize_id(value: &str) -> String {
    value
        .chars()
        .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { '_' })
        .collect()
}
