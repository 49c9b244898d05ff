use std::collections::HashMap;

use crate::state::data_model::RecordId;

/// Row heights by view index. A measurement always replaces the estimate.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightTable {
    estimate: f64,
    measured: HashMap<usize, f64>,
}

impl HeightTable {
    pub fn new(estimate: f64) -> Self {
        Self {
            estimate: sanitize_extent(estimate),
            measured: HashMap::new(),
        }
    }

    pub fn estimate(&self) -> f64 {
        self.estimate
    }

    pub fn height(&self, index: usize) -> f64 {
        self.measured.get(&index).copied().unwrap_or(self.estimate)
    }

    pub fn is_measured(&self, index: usize) -> bool {
        self.measured.contains_key(&index)
    }

    /// Records a measured height. Returns whether the stored height changed.
    pub fn record(&mut self, index: usize, height: f64) -> bool {
        if !height.is_finite() || height < 0.0 {
            tracing::warn!(index, height, "ignoring invalid row measurement");
            return false;
        }
        self.measured.insert(index, height) != Some(height)
    }

    /// Drops one measurement so the row falls back to the estimate.
    pub fn forget(&mut self, index: usize) -> bool {
        self.measured.remove(&index).is_some()
    }

    pub fn clear(&mut self) {
        self.measured.clear();
    }

    /// Cumulative row tops for `count` rows; the last entry is the total extent.
    pub fn prefix_sums(&self, count: usize) -> Vec<f64> {
        let mut offsets = Vec::with_capacity(count + 1);
        let mut running = 0.0;
        offsets.push(running);
        for index in 0..count {
            running += self.height(index);
            offsets.push(running);
        }
        offsets
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VirtualRow {
    pub index: usize,
    pub offset: f64,
    pub height: f64,
}

/// The rows to materialize for one scroll position.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct RenderWindow {
    /// First materialized index.
    pub start: usize,
    /// Last materialized index, inclusive. Meaningless when `rows` is empty.
    pub end: usize,
    pub rows: Vec<VirtualRow>,
    pub total_extent: f64,
    /// Scroll offset after clamping to the scrollable range.
    pub scroll_offset: f64,
}

impl RenderWindow {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// Largest valid scroll offset for a content of `total_extent`.
pub fn max_scroll_offset(total_extent: f64, viewport_extent: f64) -> f64 {
    (total_extent - viewport_extent).max(0.0)
}

pub fn clamp_scroll_offset(scroll_offset: f64, total_extent: f64, viewport_extent: f64) -> f64 {
    sanitize_extent(scroll_offset).min(max_scroll_offset(total_extent, viewport_extent))
}

/// Computes the window from cumulative offsets as built by
/// [`HeightTable::prefix_sums`].
///
/// A row touching the top or bottom edge of the viewport is included.
pub fn plan_window(
    offsets: &[f64],
    scroll_offset: f64,
    viewport_extent: f64,
    overscan: usize,
) -> RenderWindow {
    let count = offsets.len().saturating_sub(1);
    let total_extent = offsets.last().copied().unwrap_or(0.0);
    let viewport_extent = sanitize_extent(viewport_extent);
    let scroll_offset = clamp_scroll_offset(scroll_offset, total_extent, viewport_extent);

    if count == 0 {
        return RenderWindow {
            total_extent: 0.0,
            scroll_offset: 0.0,
            ..RenderWindow::default()
        };
    }

    let tops = &offsets[..count];
    let bottoms = &offsets[1..];
    let viewport_end = scroll_offset + viewport_extent;

    let first = bottoms
        .partition_point(|&bottom| bottom < scroll_offset)
        .min(count - 1);
    let last = tops
        .partition_point(|&top| top <= viewport_end)
        .saturating_sub(1)
        .max(first);

    let start = first.saturating_sub(overscan);
    let end = last.saturating_add(overscan).min(count - 1);
    let rows = (start..=end)
        .map(|index| VirtualRow {
            index,
            offset: offsets[index],
            height: offsets[index + 1] - offsets[index],
        })
        .collect();

    RenderWindow {
        start,
        end,
        rows,
        total_extent,
        scroll_offset,
    }
}

/// Convenience over [`plan_window`] for callers holding a height table.
pub fn plan(
    count: usize,
    scroll_offset: f64,
    viewport_extent: f64,
    heights: &HeightTable,
    overscan: usize,
) -> RenderWindow {
    plan_window(&heights.prefix_sums(count), scroll_offset, viewport_extent, overscan)
}

/// Scroll state plus a lazily rebuilt offset cache for the current view.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderPlanner {
    heights: HeightTable,
    overscan: usize,
    viewport_extent: f64,
    scroll_offset: f64,
    sequence: Vec<RecordId>,
    offsets: Vec<f64>,
    offsets_dirty: bool,
}

impl RenderPlanner {
    pub fn new(estimate: f64, overscan: usize, viewport_extent: f64) -> Self {
        Self {
            heights: HeightTable::new(estimate),
            overscan,
            viewport_extent: sanitize_extent(viewport_extent),
            scroll_offset: 0.0,
            sequence: Vec::new(),
            offsets: vec![0.0],
            offsets_dirty: false,
        }
    }

    pub fn row_count(&self) -> usize {
        self.sequence.len()
    }

    pub fn overscan(&self) -> usize {
        self.overscan
    }

    pub fn viewport_extent(&self) -> f64 {
        self.viewport_extent
    }

    pub fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    pub fn heights(&self) -> &HeightTable {
        &self.heights
    }

    /// Points the planner at the current filtered sequence. Measurements are
    /// dropped when the ids or their order changed, since indices then name
    /// different records.
    pub fn sync_sequence(&mut self, ids: &[RecordId]) -> bool {
        if self.sequence == ids {
            return false;
        }
        tracing::debug!(
            from = self.sequence.len(),
            to = ids.len(),
            "row sequence changed, resetting measurements"
        );
        self.sequence = ids.to_vec();
        self.heights.clear();
        self.offsets_dirty = true;
        self.clamp_scroll();
        true
    }

    pub fn set_scroll_offset(&mut self, offset: f64) {
        self.scroll_offset = sanitize_extent(offset);
        self.clamp_scroll();
    }

    pub fn set_viewport_extent(&mut self, extent: f64) {
        self.viewport_extent = sanitize_extent(extent);
        self.clamp_scroll();
    }

    pub fn set_overscan(&mut self, overscan: usize) {
        self.overscan = overscan;
    }

    /// Feeds back the laid-out height of a row.
    pub fn measure(&mut self, index: usize, height: f64) -> bool {
        if index >= self.sequence.len() {
            return false;
        }
        let changed = self.heights.record(index, height);
        if changed {
            self.offsets_dirty = true;
        }
        changed
    }

    /// Forgets the height of a row whose content changed in place.
    pub fn invalidate_row(&mut self, index: usize) {
        if self.heights.forget(index) {
            self.offsets_dirty = true;
            self.clamp_scroll();
        }
    }

    pub fn total_extent(&mut self) -> f64 {
        self.ensure_offsets();
        self.offsets.last().copied().unwrap_or(0.0)
    }

    /// Pixel offset of the top of `index`.
    pub fn row_offset(&mut self, index: usize) -> Option<f64> {
        self.ensure_offsets();
        (index < self.sequence.len()).then(|| self.offsets[index])
    }

    pub fn window(&mut self) -> RenderWindow {
        self.ensure_offsets();
        let window = plan_window(
            &self.offsets,
            self.scroll_offset,
            self.viewport_extent,
            self.overscan,
        );
        self.scroll_offset = window.scroll_offset;
        window
    }

    /// Same window as [`RenderPlanner::window`] without touching the cache,
    /// for readers that only hold a shared reference.
    pub fn window_snapshot(&self) -> RenderWindow {
        if self.offsets_dirty {
            let offsets = self.heights.prefix_sums(self.sequence.len());
            plan_window(&offsets, self.scroll_offset, self.viewport_extent, self.overscan)
        } else {
            plan_window(
                &self.offsets,
                self.scroll_offset,
                self.viewport_extent,
                self.overscan,
            )
        }
    }

    fn ensure_offsets(&mut self) {
        if self.offsets_dirty {
            self.offsets = self.heights.prefix_sums(self.sequence.len());
            self.offsets_dirty = false;
        }
    }

    fn clamp_scroll(&mut self) {
        let total = self.total_extent();
        self.scroll_offset = clamp_scroll_offset(self.scroll_offset, total, self.viewport_extent);
    }
}

fn sanitize_extent(value: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}
