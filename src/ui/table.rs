use dioxus::prelude::*;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::rc::Rc;

use crate::state::data_model::{Record, RecordId};
use crate::state::filter::{SortOrder, SortSpec};
use crate::state::render_planner::VirtualRow;
use crate::state::table_state::TableState;

/// Virtualized record grid. Only the planner's window is mounted; the body
/// is sized to the total extent so the scrollbar spans every row.
#[component]
pub fn Table(data: Signal<TableState>, error_message: Signal<Option<String>>) -> Element {
    let container = use_signal::<Option<Rc<MountedData>>>(|| None);
    let header = use_signal::<Option<Rc<MountedData>>>(|| None);

    let (columns, window, rows, sort_spec) = {
        let state = data.read();
        let columns: Vec<String> = state.columns().as_slice().to_vec();
        let window = state.window_snapshot();
        let rows: Vec<(VirtualRow, Record, u64)> = window
            .rows
            .iter()
            .filter_map(|row| {
                state
                    .visible_record(row.index)
                    .map(|record| (*row, record.clone(), record_fingerprint(record)))
            })
            .collect();
        (columns, window, rows, state.sort_spec().cloned())
    };

    if columns.is_empty() {
        return rsx! {
            p { class: "empty-message", id: "empty-message", "No data loaded. Click \"Open CSV\" to load a file." }
        };
    }

    let total_extent = window.total_extent;

    rsx! {
        div {
            class: "table-container",
            id: "table-container",
            onmounted: move |evt: MountedEvent| async move {
                let mounted = evt.data();
                let mut container = container;
                container.set(Some(mounted.clone()));
                sync_viewport(data, &mounted, header).await;
            },
            onscroll: move |_| async move {
                let mounted = container.peek().as_ref().cloned();
                if let Some(mounted) = mounted {
                    sync_viewport(data, &mounted, header).await;
                }
            },
            div {
                class: "grid-header",
                onmounted: move |evt: MountedEvent| {
                    let mut header = header;
                    header.set(Some(evt.data()));
                },
                div { class: "grid-cell row-actions" }
                for col in &columns {
                    div {
                        class: header_class(col, &sort_spec),
                        onclick: {
                            let col_name = col.clone();
                            move |_| {
                                let mut data = data;
                                data.with_mut(|state| state.toggle_sort(&col_name));
                            }
                        },
                        "{col}"
                    }
                }
            }
            div {
                class: "grid-body",
                style: "height: {total_extent}px;",
                for (row, record, fingerprint) in rows {
                    GridRow {
                        key: "{row.index}-{record.id}-{fingerprint}",
                        view_index: row.index,
                        offset: row.offset,
                        record,
                        columns: columns.clone(),
                        data,
                        error_message,
                    }
                }
            }
        }
    }
}

#[component]
fn GridRow(
    view_index: usize,
    offset: f64,
    record: Record,
    columns: Vec<String>,
    data: Signal<TableState>,
    error_message: Signal<Option<String>>,
) -> Element {
    let id = record.id;
    let row_class = if view_index % 2 == 0 { "grid-row even" } else { "grid-row odd" };

    rsx! {
        div {
            class: "{row_class}",
            id: "row-{id}",
            style: "transform: translateY({offset}px);",
            onmounted: move |evt: MountedEvent| async move {
                if let Ok(rect) = evt.get_client_rect().await {
                    let mut data = data;
                    data.with_mut(|state| state.measure_row(view_index, rect.size.height));
                }
            },
            div { class: "grid-cell row-actions",
                button {
                    class: "row-btn",
                    title: "Edit",
                    onclick: move |_| begin(data, error_message, id, RowAction::Edit),
                    "\u{270E}"
                }
                button {
                    class: "row-btn",
                    title: "Duplicate",
                    onclick: move |_| begin(data, error_message, id, RowAction::Duplicate),
                    "\u{2398}"
                }
            }
            for col in &columns {
                div { class: "grid-cell", "{record.value(col)}" }
            }
        }
    }
}

#[derive(Clone, Copy)]
enum RowAction {
    Edit,
    Duplicate,
}

fn begin(
    mut data: Signal<TableState>,
    mut error_message: Signal<Option<String>>,
    id: RecordId,
    action: RowAction,
) {
    let result = data.with_mut(|state| match action {
        RowAction::Edit => state.begin_edit(id).map(|_| ()),
        RowAction::Duplicate => state.begin_duplicate(id).map(|_| ()),
    });
    match result {
        Ok(()) => error_message.set(None),
        Err(err) => error_message.set(Some(err.to_string())),
    }
}

async fn sync_viewport(
    mut data: Signal<TableState>,
    mounted: &MountedData,
    header: Signal<Option<Rc<MountedData>>>,
) {
    let header = header.peek().as_ref().cloned();
    let header_height = match header {
        Some(header) => header
            .get_client_rect()
            .await
            .map(|rect| rect.size.height)
            .unwrap_or_default(),
        None => 0.0,
    };
    if let Ok(rect) = mounted.get_client_rect().await {
        data.with_mut(|state| state.set_container_extent(rect.size.height, header_height));
    }
    if let Ok(offset) = mounted.get_scroll_offset().await {
        data.with_mut(|state| state.set_scroll_offset(offset.y));
    }
}

/// Changes whenever the row's text does, so an edited row remounts and is
/// measured again.
fn record_fingerprint(record: &Record) -> u64 {
    let mut hasher = DefaultHasher::new();
    record.values.hash(&mut hasher);
    hasher.finish()
}

fn header_class(col: &str, sort_spec: &Option<SortSpec>) -> String {
    let sort_class = match sort_spec.as_ref() {
        Some(spec) if spec.column == col => match spec.order {
            SortOrder::Asc => " sorted-asc",
            SortOrder::Desc => " sorted-desc",
        },
        _ => "",
    };
    format!("grid-cell header-cell{sort_class}")
}
