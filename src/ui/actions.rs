use dioxus::prelude::*;
use std::path::PathBuf;

use crate::io::csv_io;
use crate::state::table_state::TableState;

pub fn load_path(
    mut data: Signal<TableState>,
    mut file_path: Signal<Option<PathBuf>>,
    mut error_message: Signal<Option<String>>,
    path: PathBuf,
) {
    match csv_io::load_csv(&path) {
        Ok(parsed) => {
            data.with_mut(|state| state.replace_data(parsed));
            file_path.set(Some(path));
            error_message.set(None);
        }
        Err(e) => {
            tracing::warn!("Failed to open {}: {}", path.display(), e);
            error_message.set(Some(e.to_string()));
        }
    }
}

pub async fn open_file(
    data: Signal<TableState>,
    file_path: Signal<Option<PathBuf>>,
    error_message: Signal<Option<String>>,
) {
    let task = rfd::AsyncFileDialog::new()
        .add_filter("CSV", &["csv"])
        .pick_file()
        .await;

    if let Some(handle) = task {
        load_path(data, file_path, error_message, handle.path().to_path_buf());
    }
}

/// Asks for a destination and writes the current dataset there.
/// Returns whether a file was written.
pub async fn export_file(
    mut data: Signal<TableState>,
    mut error_message: Signal<Option<String>>,
    prefix: String,
) -> bool {
    let suggested = csv_io::export_file_name(&prefix, csv_io::today());
    let task = rfd::AsyncFileDialog::new()
        .add_filter("CSV", &["csv"])
        .set_file_name(suggested)
        .save_file()
        .await;

    let Some(handle) = task else {
        return false;
    };
    let path = handle.path().to_path_buf();

    let (result, revision) = {
        let state = data.read();
        (
            csv_io::save_csv(&path, state.columns(), state.records()),
            state.revision(),
        )
    };

    match result {
        Ok(()) => {
            data.with_mut(|state| state.mark_saved(revision));
            error_message.set(None);
            true
        }
        Err(err) => {
            tracing::warn!("Failed to export {}: {}", path.display(), err);
            error_message.set(Some(err.to_string()));
            false
        }
    }
}

/// Asks whether unsaved edits may be dropped.
pub async fn confirm_discard() -> bool {
    let answer = rfd::AsyncMessageDialog::new()
        .set_level(rfd::MessageLevel::Warning)
        .set_title("Unsaved changes")
        .set_description("Some edits have not been exported. Close anyway?")
        .set_buttons(rfd::MessageButtons::YesNo)
        .show()
        .await;
    matches!(answer, rfd::MessageDialogResult::Yes)
}
