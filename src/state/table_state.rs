use crate::config::SheetConfig;
use crate::io::csv_io::{self, CsvIoError, ParsedTable};
use crate::state::data_model::{ColumnSet, Record, RecordId};
use crate::state::edit_session::{CommitOutcome, Draft, EditError, EditSession};
use crate::state::filter::{self, FilterCache, MatchCase, SortSpec};
use crate::state::record_store::RecordStore;
use crate::state::render_planner::{RenderPlanner, RenderWindow};

/// Everything the grid needs for one loaded dataset.
///
/// Every event handler runs to completion and leaves `visible` consistent
/// with the store, the query and the sort, and the planner synced to it.
#[derive(Clone, Debug, PartialEq)]
pub struct TableState {
    store: RecordStore,
    session: EditSession,
    search_query: String,
    match_case: MatchCase,
    sort_spec: Option<SortSpec>,
    filter_cache: FilterCache,
    visible: Vec<usize>,
    planner: RenderPlanner,
    saved_revision: u64,
}

impl Default for TableState {
    fn default() -> Self {
        Self::new(&SheetConfig::default())
    }
}

impl TableState {
    pub fn new(config: &SheetConfig) -> Self {
        Self {
            store: RecordStore::new(),
            session: EditSession::new(),
            search_query: String::new(),
            match_case: config.match_case,
            sort_spec: None,
            filter_cache: FilterCache::new(),
            visible: Vec::new(),
            planner: RenderPlanner::new(
                config.estimated_row_height,
                config.overscan,
                config.viewport_extent,
            ),
            saved_revision: 0,
        }
    }

    pub fn from_parsed(parsed: ParsedTable, config: &SheetConfig) -> Self {
        let mut state = Self::new(config);
        state.replace_data(parsed);
        state
    }

    /// Parses `text` and, only on success, replaces the dataset.
    pub fn load_text(&mut self, text: &str) -> Result<(), CsvIoError> {
        let parsed = csv_io::parse_records(text)?;
        self.replace_data(parsed);
        Ok(())
    }

    /// Discards all prior state: draft, query, sort, scroll and measurements.
    pub fn replace_data(&mut self, parsed: ParsedTable) {
        self.store.load(parsed.records, parsed.columns);
        self.saved_revision = self.store.revision();
        self.session = EditSession::new();
        self.search_query.clear();
        self.sort_spec = None;
        self.filter_cache.invalidate();
        self.planner.set_scroll_offset(0.0);
        self.refresh_view();
    }

    pub fn columns(&self) -> &ColumnSet {
        self.store.columns()
    }

    pub fn records(&self) -> &[Record] {
        self.store.records()
    }

    pub fn record(&self, id: RecordId) -> Option<&Record> {
        self.store.get(id)
    }

    pub fn has_data(&self) -> bool {
        !self.store.columns().is_empty()
    }

    pub fn total_count(&self) -> usize {
        self.store.len()
    }

    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn match_case(&self) -> MatchCase {
        self.match_case
    }

    pub fn sort_spec(&self) -> Option<&SortSpec> {
        self.sort_spec.as_ref()
    }

    /// Canonical positions of the filtered, sorted view.
    pub fn visible_row_indices(&self) -> &[usize] {
        &self.visible
    }

    pub fn visible_record(&self, view_index: usize) -> Option<&Record> {
        let position = *self.visible.get(view_index)?;
        self.store.records().get(position)
    }

    pub fn visible_records(&self) -> impl Iterator<Item = &Record> {
        self.visible
            .iter()
            .filter_map(|&position| self.store.records().get(position))
    }

    pub fn set_search(&mut self, query: String) {
        if query == self.search_query {
            return;
        }
        self.search_query = query;
        self.refresh_view();
    }

    pub fn set_match_case(&mut self, match_case: MatchCase) {
        if match_case == self.match_case {
            return;
        }
        self.match_case = match_case;
        self.refresh_view();
    }

    pub fn toggle_sort(&mut self, column: &str) {
        if !self.store.columns().contains(column) {
            return;
        }
        self.sort_spec = filter::next_sort(self.sort_spec.as_ref(), column);
        self.refresh_view();
    }

    pub fn draft(&self) -> Option<&Draft> {
        self.session.draft()
    }

    pub fn begin_new_row(&mut self) -> Result<&Draft, EditError> {
        self.session.begin_create(&mut self.store)
    }

    pub fn begin_duplicate(&mut self, source: RecordId) -> Result<&Draft, EditError> {
        self.session.begin_duplicate(&mut self.store, source)
    }

    pub fn begin_edit(&mut self, id: RecordId) -> Result<&Draft, EditError> {
        self.session.begin_edit(&self.store, id)
    }

    pub fn set_draft_field(&mut self, column: &str, value: String) -> Result<(), EditError> {
        self.session.set_field(column, value)
    }

    pub fn cancel_draft(&mut self) -> Option<Draft> {
        self.session.cancel()
    }

    /// Commits the open draft. The view is rebuilt whenever the session
    /// closed, including when the target id had vanished.
    pub fn commit_draft(&mut self) -> Result<CommitOutcome, EditError> {
        let result = self.session.commit(&mut self.store);
        if !self.session.is_active() {
            self.refresh_view();
        }
        if let Ok(CommitOutcome::Replaced(id)) = result {
            if let Some(view_index) = self.view_index_of(id) {
                self.planner.invalidate_row(view_index);
            }
        }
        result
    }

    /// Position of `id` in the filtered, sorted view.
    pub fn view_index_of(&self, id: RecordId) -> Option<usize> {
        let records = self.store.records();
        self.visible
            .iter()
            .position(|&position| records.get(position).is_some_and(|r| r.id == id))
    }

    pub fn set_scroll_offset(&mut self, offset: f64) {
        self.planner.set_scroll_offset(offset);
    }

    pub fn set_viewport_extent(&mut self, extent: f64) {
        self.planner.set_viewport_extent(extent);
    }

    /// Viewport for a scroll container whose top `header_extent` pixels are
    /// covered by a sticky header.
    pub fn set_container_extent(&mut self, container_extent: f64, header_extent: f64) {
        self.planner
            .set_viewport_extent((container_extent - header_extent).max(0.0));
    }

    pub fn viewport_extent(&self) -> f64 {
        self.planner.viewport_extent()
    }

    pub fn measure_row(&mut self, view_index: usize, height: f64) -> bool {
        self.planner.measure(view_index, height)
    }

    pub fn scroll_offset(&self) -> f64 {
        self.planner.scroll_offset()
    }

    pub fn render_window(&mut self) -> RenderWindow {
        self.planner.window()
    }

    pub fn window_snapshot(&self) -> RenderWindow {
        self.planner.window_snapshot()
    }

    pub fn revision(&self) -> u64 {
        self.store.revision()
    }

    /// Whether records changed since the last load or export.
    pub fn has_unsaved_changes(&self) -> bool {
        self.store.revision() != self.saved_revision
    }

    /// Records that the dataset as of `revision` was written out.
    pub fn mark_saved(&mut self, revision: u64) {
        self.saved_revision = revision;
    }

    pub fn export_csv(&self) -> Result<String, CsvIoError> {
        csv_io::export_csv(self.store.columns(), self.store.records())
    }

    fn refresh_view(&mut self) {
        let records = self.store.records();
        let mut view = self
            .filter_cache
            .refresh(
                records,
                self.store.revision(),
                &self.search_query,
                self.match_case,
            )
            .to_vec();
        if let Some(spec) = self.sort_spec.as_ref() {
            filter::sort_view(records, &mut view, spec);
        }

        let ids: Vec<RecordId> = view.iter().map(|&position| records[position].id).collect();
        self.planner.sync_sequence(&ids);
        self.visible = view;
    }
}
