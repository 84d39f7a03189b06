//! Variable-height virtualization.
//!
//! Replaces the fixed `item_height` with a per-row estimator and
//! accumulates prefix offsets, so index↔pixel mapping is a binary search
//! over cumulative positions instead of a division.

use std::ops::Range;
use std::sync::Arc;

/// Per-row height estimator.
pub type HeightEstimator = Arc<dyn Fn(usize) -> f32 + Send + Sync>;

/// Virtualization window over rows of varying height.
///
/// Offsets are rebuilt whenever `total_items` or the estimator changes;
/// scrolling only moves the binary-searched window.
pub struct VariableVirtualWindow {
    estimator: HeightEstimator,
    container_height: f32,
    overscan: usize,
    scroll_top: f32,
    total_items: usize,

    /// Cumulative offsets: `offsets[i]` is the top of row `i`, the last
    /// entry is the total height.
    offsets: Vec<f32>,
    visible_start: usize,
    visible_end: usize,
    offset_y: f32,
}

impl VariableVirtualWindow {
    pub fn new(
        container_height: f32,
        overscan: usize,
        total_items: usize,
        estimator: impl Fn(usize) -> f32 + Send + Sync + 'static,
    ) -> Self {
        let mut window = Self {
            estimator: Arc::new(estimator),
            container_height,
            overscan,
            scroll_top: 0.0,
            total_items,
            offsets: Vec::new(),
            visible_start: 0,
            visible_end: 0,
            offset_y: 0.0,
        };
        window.rebuild_offsets();
        window.recompute();
        window
    }

    fn rebuild_offsets(&mut self) {
        let mut offsets = Vec::with_capacity(self.total_items + 1);
        let mut y = 0.0_f32;
        for index in 0..self.total_items {
            offsets.push(y);
            y += (self.estimator)(index).max(0.0);
        }
        offsets.push(y);
        self.offsets = offsets;
    }

    fn recompute(&mut self) {
        if self.total_items == 0 {
            self.visible_start = 0;
            self.visible_end = 0;
            self.offset_y = 0.0;
            return;
        }
        let raw_start = self.index_at(self.scroll_top);
        let raw_end = self.index_at(self.scroll_top + self.container_height);
        self.visible_start = raw_start.saturating_sub(self.overscan);
        self.visible_end = (raw_end + self.overscan).min(self.total_items - 1);
        self.offset_y = self.offset_of(self.visible_start);
    }

    /// Row index containing pixel `y` (binary search over offsets).
    fn index_at(&self, y: f32) -> usize {
        if self.offsets.is_empty() {
            return 0;
        }
        let found = self
            .offsets
            .binary_search_by(|pos| pos.partial_cmp(&y).unwrap_or(std::cmp::Ordering::Equal));
        let index = match found {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        index.min(self.total_items.saturating_sub(1))
    }

    fn offset_of(&self, index: usize) -> f32 {
        self.offsets.get(index).copied().unwrap_or(0.0)
    }

    // -------------------------------------------------------------------------
    // Inputs
    // -------------------------------------------------------------------------

    pub fn set_scroll_top(&mut self, scroll_top: f32) {
        self.scroll_top = scroll_top.max(0.0);
        self.recompute();
    }

    pub fn set_container_height(&mut self, container_height: f32) {
        self.container_height = container_height;
        self.recompute();
    }

    pub fn set_overscan(&mut self, overscan: usize) {
        self.overscan = overscan;
        self.recompute();
    }

    /// Change the row count; offsets are rebuilt from the estimator.
    pub fn set_total_items(&mut self, total_items: usize) {
        self.total_items = total_items;
        self.rebuild_offsets();
        self.recompute();
    }

    /// Swap the estimator (e.g. after measuring real row heights) and
    /// rebuild offsets.
    pub fn set_estimator(&mut self, estimator: impl Fn(usize) -> f32 + Send + Sync + 'static) {
        self.estimator = Arc::new(estimator);
        self.rebuild_offsets();
        self.recompute();
    }

    // -------------------------------------------------------------------------
    // Derived outputs
    // -------------------------------------------------------------------------

    pub fn scroll_top(&self) -> f32 {
        self.scroll_top
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    pub fn visible_start(&self) -> usize {
        self.visible_start
    }

    pub fn visible_end(&self) -> usize {
        self.visible_end
    }

    pub fn total_height(&self) -> f32 {
        self.offsets.last().copied().unwrap_or(0.0)
    }

    pub fn offset_y(&self) -> f32 {
        self.offset_y
    }

    pub fn visible_range(&self) -> Range<usize> {
        if self.total_items == 0 {
            return 0..0;
        }
        self.visible_start..(self.visible_end + 1).min(self.total_items)
    }

    /// Height of one row per the current offsets.
    pub fn item_height(&self, index: usize) -> f32 {
        let top = self.offset_of(index);
        let bottom = self.offset_of(index + 1);
        (bottom - top).max(0.0)
    }

    // -------------------------------------------------------------------------
    // Scrolling
    // -------------------------------------------------------------------------

    /// Jump so `index` sits at the top of the viewport. Returns the new
    /// scroll position (the row's accumulated offset).
    pub fn scroll_to_item(&mut self, index: usize) -> f32 {
        self.scroll_top = self.offset_of(index.min(self.total_items.saturating_sub(1)));
        self.recompute();
        self.scroll_top
    }

    /// Like [`scroll_to_item`], but a no-op (returning `None`) when the
    /// index is already within the rendered range.
    ///
    /// [`scroll_to_item`]: VariableVirtualWindow::scroll_to_item
    pub fn scroll_to_item_if_needed(&mut self, index: usize) -> Option<f32> {
        if self.total_items > 0 && index >= self.visible_start && index <= self.visible_end {
            return None;
        }
        Some(self.scroll_to_item(index))
    }
}

impl std::fmt::Debug for VariableVirtualWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VariableVirtualWindow")
            .field("container_height", &self.container_height)
            .field("overscan", &self.overscan)
            .field("scroll_top", &self.scroll_top)
            .field("total_items", &self.total_items)
            .field("visible_start", &self.visible_start)
            .field("visible_end", &self.visible_end)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    /// Rows alternate 20px and 40px: offsets 0, 20, 60, 80, 120, ...
    fn alternating() -> VariableVirtualWindow {
        VariableVirtualWindow::new(120.0, 0, 10, |i| if i % 2 == 0 { 20.0 } else { 40.0 })
    }

    #[test]
    fn test_offsets_accumulate() {
        let w = alternating();
        // 5 pairs of (20 + 40).
        assert_eq!(w.total_height(), 300.0);
        assert_eq!(w.item_height(0), 20.0);
        assert_eq!(w.item_height(1), 40.0);
    }

    #[test]
    fn test_window_at_top() {
        let w = alternating();
        assert_eq!(w.visible_start(), 0);
        // 120px viewport covers offsets up to 120, which is row 4's top.
        assert_eq!(w.visible_end(), 4);
        assert_eq!(w.offset_y(), 0.0);
    }

    #[test]
    fn test_window_mid_scroll() {
        let mut w = alternating();
        w.set_scroll_top(70.0);
        // 70px lands inside row 2 (60..80).
        assert_eq!(w.visible_start(), 2);
        assert_eq!(w.offset_y(), 60.0);
    }

    #[test]
    fn test_overscan_expands_range() {
        let mut w = alternating();
        w.set_overscan(2);
        w.set_scroll_top(70.0);
        assert_eq!(w.visible_start(), 0);
        assert!(w.visible_end() >= 6);
    }

    #[test]
    fn test_scroll_to_item_returns_offset() {
        let mut w = alternating();
        assert_eq!(w.scroll_to_item(3), 80.0);
        assert_eq!(w.scroll_to_item_if_needed(3), None);
    }

    #[test]
    fn test_empty() {
        let w = VariableVirtualWindow::new(100.0, 5, 0, |_| 20.0);
        assert_eq!(w.visible_range(), 0..0);
        assert_eq!(w.total_height(), 0.0);
    }
}
