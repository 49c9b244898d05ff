use dioxus::prelude::*;
use std::path::PathBuf;

use crate::config::SheetConfig;
use crate::state::table_state::TableState;
use crate::ui::actions;

#[component]
pub fn Toolbar(
    data: Signal<TableState>,
    file_path: Signal<Option<PathBuf>>,
    error_message: Signal<Option<String>>,
    export_success: Signal<bool>,
) -> Element {
    let config = use_context::<SheetConfig>();

    let (visible_count, total_count, search_query_value, has_data, drafting) = {
        let state = data.read();
        (
            state.visible_count(),
            state.total_count(),
            state.search_query().to_string(),
            state.has_data(),
            state.draft().is_some(),
        )
    };

    rsx! {
        div { class: "toolbar",
            // File group
            div { class: "toolbar-group",
                button {
                    class: "toolbar-btn",
                    id: "btn-open",
                    onclick: move |_| {
                        spawn(async move {
                            actions::open_file(data, file_path, error_message).await;
                        });
                    },
                    "\u{1F4C2} Open CSV"
                }
                button {
                    class: "toolbar-btn",
                    id: "btn-export",
                    disabled: !has_data,
                    onclick: move |_| {
                        let prefix = config.export_prefix.clone();
                        spawn(async move {
                            let mut export_success = export_success;
                            if actions::export_file(data, error_message, prefix).await {
                                export_success.set(true);
                                tokio::time::sleep(std::time::Duration::from_secs(2)).await;
                                export_success.set(false);
                            }
                        });
                    },
                    "\u{1F4BE} Export CSV"
                }
                if *export_success.read() {
                    span { class: "save-success", "\u{2714} Exported" }
                }
            }
            div { class: "toolbar-separator" }

            // Search group
            div { class: "toolbar-group",
                input {
                    class: "toolbar-input",
                    id: "input-search-query",
                    placeholder: "Search",
                    disabled: !has_data,
                    value: "{search_query_value}",
                    oninput: move |evt| {
                        let query = evt.value();
                        let mut data = data;
                        data.with_mut(|state| state.set_search(query));
                    }
                }
                span {
                    class: "toolbar-label",
                    id: "label-row-count",
                    "{visible_count} of {total_count} items"
                }
            }
            div { class: "toolbar-separator" }

            // Edit group
            div { class: "toolbar-group",
                button {
                    class: "toolbar-btn",
                    id: "btn-add-row",
                    disabled: !has_data || drafting,
                    onclick: move |_| {
                        let mut data = data;
                        let mut error_message = error_message;
                        match data.with_mut(|state| state.begin_new_row().map(|_| ())) {
                            Ok(()) => error_message.set(None),
                            Err(err) => error_message.set(Some(err.to_string())),
                        }
                    },
                    "\u{2795} Add new row"
                }
            }

            // Info area (right-aligned)
            div { class: "toolbar-info",
                if let Some(path) = file_path.read().as_ref() {
                    span { class: "file-path", "{path.display()}" }
                }
                if let Some(err) = error_message.read().as_ref() {
                    span { class: "error-message", "{err}" }
                }
            }
        }
    }
}
