//! Virtualization window tests
//!
//! Fixed-height formulas, bounds properties across input sweeps, scroll
//! helpers, and the variable-height extension.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use gridstate::{VariableVirtualWindow, VirtualWindow};

// =============================================================================
// FIXED HEIGHT
// =============================================================================

#[test]
fn test_window_at_top_of_hundred_rows() {
    let mut w = VirtualWindow::new(400.0, 40.0, 5);
    w.set_total_items(100);
    assert_eq!(w.visible_start(), 0);
    assert_eq!(w.visible_end(), 19);
    assert_eq!(w.total_height(), 4000.0);
    assert_eq!(w.offset_y(), 0.0);
    assert_eq!(w.visible_count(), 10);
}

#[test]
fn test_overscan_applies_on_both_sides_mid_list() {
    let mut w = VirtualWindow::new(400.0, 40.0, 5);
    w.set_total_items(100);
    w.set_scroll_top(2000.0);
    assert_eq!(w.visible_start(), 45);
    assert_eq!(w.visible_end(), 65);
    assert_eq!(w.offset_y(), 1800.0);
}

#[test]
fn test_bounds_hold_across_input_sweep() {
    for total in [0usize, 1, 9, 10, 11, 250, 10_000] {
        for scroll in [0.0_f32, 39.9, 40.0, 555.0, 399_960.0, 1_000_000.0] {
            for overscan in [0usize, 1, 5, 50] {
                let mut w = VirtualWindow::new(400.0, 40.0, overscan);
                w.set_total_items(total);
                w.set_scroll_top(scroll);

                assert!(w.visible_start() <= w.visible_end());
                assert!(w.visible_end() <= total.saturating_sub(1).max(0));
                let range = w.visible_range();
                assert!(range.end <= total);
                if total > 0 {
                    // The rendered range must cover at least the viewport
                    // capacity whenever enough rows exist below the start.
                    let span = w.visible_end() - w.visible_start() + 1;
                    if w.visible_start() + w.visible_count() <= total {
                        assert!(span >= w.visible_count().min(total));
                    }
                }
            }
        }
    }
}

#[test]
fn test_zero_item_height_yields_empty_window() {
    let mut w = VirtualWindow::new(400.0, 0.0, 5);
    w.set_total_items(100);
    assert_eq!(w.visible_range(), 0..0);
    assert_eq!(w.total_height(), 0.0);
}

#[test]
fn test_scroll_to_item_returns_new_scroll_top() {
    let mut w = VirtualWindow::new(400.0, 40.0, 5);
    w.set_total_items(100);
    assert_eq!(w.scroll_to_item(25), 1000.0);
    assert_eq!(w.visible_start(), 20);
}

#[test]
fn test_scroll_to_item_if_needed_noop_when_visible() {
    let mut w = VirtualWindow::new(400.0, 40.0, 5);
    w.set_total_items(100);
    assert_eq!(w.scroll_to_item_if_needed(19), None);
    assert_eq!(w.scroll_to_item_if_needed(20), Some(800.0));
    // After the jump, the target is visible and a repeat is a no-op.
    assert_eq!(w.scroll_to_item_if_needed(20), None);
}

#[test]
fn test_total_items_shrink_reclamps_end() {
    let mut w = VirtualWindow::new(400.0, 40.0, 5);
    w.set_total_items(100);
    w.set_scroll_top(3000.0);
    w.set_total_items(10);
    assert!(w.visible_end() <= 9);
}

// =============================================================================
// VARIABLE HEIGHT
// =============================================================================

#[test]
fn test_variable_offsets_accumulate() {
    let w = VariableVirtualWindow::new(100.0, 0, 4, |i| (i as f32 + 1.0) * 10.0);
    // Heights 10, 20, 30, 40 -> offsets 0, 10, 30, 60, total 100.
    assert_eq!(w.total_height(), 100.0);
    assert_eq!(w.item_height(2), 30.0);
    assert_eq!(w.scroll_top(), 0.0);
}

#[test]
fn test_variable_start_by_binary_search() {
    let mut w = VariableVirtualWindow::new(50.0, 0, 4, |i| (i as f32 + 1.0) * 10.0);
    w.set_scroll_top(35.0);
    // 35px lands inside row 2 (30..60).
    assert_eq!(w.visible_start(), 2);
    assert_eq!(w.offset_y(), 30.0);
}

#[test]
fn test_variable_scroll_to_item_returns_offset() {
    let mut w = VariableVirtualWindow::new(50.0, 0, 10, |_| 25.0);
    assert_eq!(w.scroll_to_item(4), 100.0);
    assert_eq!(w.scroll_to_item_if_needed(4), None);
    assert!(w.scroll_to_item_if_needed(9).is_some());
}

#[test]
fn test_variable_estimator_swap_rebuilds() {
    let mut w = VariableVirtualWindow::new(100.0, 0, 5, |_| 10.0);
    assert_eq!(w.total_height(), 50.0);
    w.set_estimator(|_| 30.0);
    assert_eq!(w.total_height(), 150.0);
}

#[test]
fn test_variable_bounds_with_overscan() {
    let mut w = VariableVirtualWindow::new(120.0, 3, 50, |i| if i % 3 == 0 { 44.0 } else { 22.0 });
    for scroll in [0.0_f32, 100.0, 500.0, 10_000.0] {
        w.set_scroll_top(scroll);
        assert!(w.visible_start() <= w.visible_end());
        assert!(w.visible_end() < 50);
    }
}
