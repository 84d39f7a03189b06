//! Virtualization window math: scroll position in, minimal visible row
//! range out.
//!
//! The fixed-height calculator is the common case — constant-time
//! derivation from five inputs. Variable row heights are an explicit
//! extension ([`VariableVirtualWindow`]) built on accumulated offsets; the
//! two never mix within one computation.

mod variable;

pub use variable::VariableVirtualWindow;

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Extra rows rendered beyond the viewport on each side to reduce
/// scroll-induced pop-in.
pub const DEFAULT_OVERSCAN: usize = 5;

/// Truncating float→index conversion, clamped at zero.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn px_to_index(value: f32) -> usize {
    value.max(0.0) as usize
}

/// Fixed-height virtualization window.
///
/// All derived fields are recomputed on every input change; reads are
/// plain field access.
#[derive(Debug, Clone, PartialEq)]
pub struct VirtualWindow {
    container_height: f32,
    item_height: f32,
    overscan: usize,
    scroll_top: f32,
    total_items: usize,

    visible_start: usize,
    visible_end: usize,
    visible_count: usize,
    total_height: f32,
    offset_y: f32,
}

impl VirtualWindow {
    pub fn new(container_height: f32, item_height: f32, overscan: usize) -> Self {
        let mut window = Self {
            container_height,
            item_height,
            overscan,
            scroll_top: 0.0,
            total_items: 0,
            visible_start: 0,
            visible_end: 0,
            visible_count: 0,
            total_height: 0.0,
            offset_y: 0.0,
        };
        window.recompute();
        window
    }

    fn recompute(&mut self) {
        if self.item_height <= 0.0 || self.total_items == 0 {
            self.visible_start = 0;
            self.visible_end = 0;
            self.visible_count = 0;
            self.total_height = 0.0;
            self.offset_y = 0.0;
            return;
        }
        self.visible_count = px_to_index((self.container_height / self.item_height).ceil());
        let raw_start = px_to_index((self.scroll_top / self.item_height).floor());
        // Clamp the start too: scrolled past the end, the window pins to
        // the last row instead of going empty.
        self.visible_start = raw_start
            .saturating_sub(self.overscan)
            .min(self.total_items - 1);
        self.visible_end = (self.visible_start + self.visible_count + 2 * self.overscan)
            .min(self.total_items - 1);
        self.total_height = self.total_items as f32 * self.item_height;
        self.offset_y = self.visible_start as f32 * self.item_height;
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

    pub fn set_item_height(&mut self, item_height: f32) {
        self.item_height = item_height;
        self.recompute();
    }

    pub fn set_overscan(&mut self, overscan: usize) {
        self.overscan = overscan;
        self.recompute();
    }

    pub fn set_total_items(&mut self, total_items: usize) {
        self.total_items = total_items;
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

    /// First rendered index (overscan included).
    pub fn visible_start(&self) -> usize {
        self.visible_start
    }

    /// Last rendered index, inclusive (overscan included).
    pub fn visible_end(&self) -> usize {
        self.visible_end
    }

    /// Viewport capacity in rows: `ceil(container_height / item_height)`.
    pub fn visible_count(&self) -> usize {
        self.visible_count
    }

    /// Height of the full scroll spacer.
    pub fn total_height(&self) -> f32 {
        self.total_height
    }

    /// Pixel offset of the first rendered row.
    pub fn offset_y(&self) -> f32 {
        self.offset_y
    }

    /// The rendered index range, half-open for direct slicing.
    pub fn visible_range(&self) -> Range<usize> {
        if self.total_items == 0 {
            return 0..0;
        }
        self.visible_start..(self.visible_end + 1).min(self.total_items)
    }

    // -------------------------------------------------------------------------
    // Scrolling
    // -------------------------------------------------------------------------

    /// Jump so `index` sits at the top of the viewport. Returns the new
    /// scroll position.
    pub fn scroll_to_item(&mut self, index: usize) -> f32 {
        self.scroll_top = index as f32 * self.item_height;
        self.recompute();
        self.scroll_top
    }

    /// Like [`scroll_to_item`], but a no-op (returning `None`) when the
    /// index is already within the rendered range.
    ///
    /// [`scroll_to_item`]: VirtualWindow::scroll_to_item
    pub fn scroll_to_item_if_needed(&mut self, index: usize) -> Option<f32> {
        if self.total_items > 0 && index >= self.visible_start && index <= self.visible_end {
            return None;
        }
        Some(self.scroll_to_item(index))
    }

    // -------------------------------------------------------------------------
    // Snapshots
    // -------------------------------------------------------------------------

    /// Serialize the five inputs; derived fields are recomputed on import.
    pub fn export_state(&self) -> String {
        let snap = VirtualSnapshot {
            container_height: Some(self.container_height),
            item_height: Some(self.item_height),
            overscan: Some(self.overscan),
            scroll_top: Some(self.scroll_top),
            total_items: Some(self.total_items),
        };
        serde_json::to_string(&snap).unwrap_or_else(|e| {
            log::warn!("failed to serialize virtualization snapshot: {e}");
            "{}".to_string()
        })
    }

    /// Restore inputs from a snapshot; malformed input is logged and
    /// ignored.
    pub fn import_state(&mut self, json: &str) {
        if let Err(e) = self.try_import_state(json) {
            log::warn!("ignoring malformed virtualization snapshot: {e}");
        }
    }

    /// Like [`import_state`] but surfaces the parse error.
    ///
    /// [`import_state`]: VirtualWindow::import_state
    pub fn try_import_state(&mut self, json: &str) -> Result<()> {
        let snap: VirtualSnapshot = serde_json::from_str(json)?;
        if let Some(h) = snap.container_height {
            self.container_height = h;
        }
        if let Some(h) = snap.item_height {
            self.item_height = h;
        }
        if let Some(o) = snap.overscan {
            self.overscan = o;
        }
        if let Some(s) = snap.scroll_top {
            self.scroll_top = s.max(0.0);
        }
        if let Some(t) = snap.total_items {
            self.total_items = t;
        }
        self.recompute();
        Ok(())
    }
}

/// Serializable virtualization inputs.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default)]
#[serde(rename_all = "camelCase")]
pub struct VirtualSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_height: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_height: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overscan: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll_top: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_items: Option<usize>,
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

    fn window() -> VirtualWindow {
        let mut w = VirtualWindow::new(400.0, 40.0, 5);
        w.set_total_items(100);
        w
    }

    #[test]
    fn test_window_at_top() {
        let w = window();
        assert_eq!(w.visible_count(), 10);
        assert_eq!(w.visible_start(), 0);
        assert_eq!(w.visible_end(), 19);
        assert_eq!(w.total_height(), 4000.0);
        assert_eq!(w.offset_y(), 0.0);
    }

    #[test]
    fn test_mid_scroll_applies_overscan_both_sides() {
        let mut w = window();
        w.set_scroll_top(2000.0);
        // raw start 50, minus overscan.
        assert_eq!(w.visible_start(), 45);
        assert_eq!(w.visible_end(), 65);
        assert_eq!(w.offset_y(), 45.0 * 40.0);
    }

    #[test]
    fn test_end_clamped_by_total() {
        let mut w = window();
        w.set_scroll_top(3900.0);
        assert_eq!(w.visible_end(), 99);
        assert!(w.visible_start() <= w.visible_end());
    }

    #[test]
    fn test_empty_window() {
        let mut w = VirtualWindow::new(400.0, 40.0, 5);
        w.set_total_items(0);
        assert_eq!(w.visible_range(), 0..0);
        assert_eq!(w.total_height(), 0.0);
    }

    #[test]
    fn test_scroll_to_item() {
        let mut w = window();
        assert_eq!(w.scroll_to_item(50), 2000.0);
        assert_eq!(w.scroll_top(), 2000.0);
    }

    #[test]
    fn test_scroll_to_item_if_needed() {
        let mut w = window();
        // Index 10 is already rendered at the top.
        assert_eq!(w.scroll_to_item_if_needed(10), None);
        // Index 60 is not.
        assert_eq!(w.scroll_to_item_if_needed(60), Some(2400.0));
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let mut w = window();
        w.set_scroll_top(1234.0);
        let json = w.export_state();
        let mut other = VirtualWindow::new(1.0, 1.0, 0);
        other.import_state(&json);
        assert_eq!(other, w);
    }
}
