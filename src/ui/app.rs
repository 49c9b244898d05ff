use dioxus::desktop::tao::event::{Event, WindowEvent};
use dioxus::desktop::{use_window, use_wry_event_handler};
use dioxus::prelude::*;
use std::path::PathBuf;

use crate::config::{self, SheetConfig};
use crate::state::table_state::TableState;
use crate::ui::actions;
use crate::ui::edit_sheet::EditSheet;
use crate::ui::table::Table;
use crate::ui::toolbar::Toolbar;

const STYLES: Asset = asset!("/assets/styles.css");

#[component]
pub fn App() -> Element {
    let config = use_context_provider(SheetConfig::load);
    let data = use_signal(|| TableState::new(&config));
    let file_path = use_signal::<Option<PathBuf>>(|| None);
    let error_message = use_signal::<Option<String>>(|| None);
    let export_success = use_signal(|| false);

    use_effect(move || {
        if let Some(path) = config::startup_file() {
            actions::load_path(data, file_path, error_message, path);
        }
    });

    // The window hides on close; it only goes away once nothing is unsaved
    // or the user agrees to drop it.
    let window = use_window();
    let mut close_requested = use_signal(|| false);
    use_wry_event_handler({
        let window = window.clone();
        move |event, _| {
            if let Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } = event
            {
                if data.peek().has_unsaved_changes() {
                    close_requested.set(true);
                } else {
                    window.close();
                }
            }
        }
    });

    use_effect(move || {
        if !close_requested() {
            return;
        }
        let window = window.clone();
        spawn(async move {
            if actions::confirm_discard().await {
                tracing::info!("closing with unsaved changes");
                window.close();
            } else {
                close_requested.set(false);
                window.set_visible(true);
            }
        });
    });

    rsx! {
        document::Stylesheet { href: STYLES }
        div { class: "app",
            Toolbar { data, file_path, error_message, export_success }
            Table { data, error_message }
            EditSheet { data, error_message }
        }
    }
}
