//! Column manager tests
//!
//! Ordering, visibility, locking, auto-sizing, grouping, and layout
//! snapshots.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::people_columns;
use gridstate::{Column, ColumnEvent, ColumnGroup, ColumnManager, LockSide};

fn manager() -> ColumnManager<serde_json::Value> {
    ColumnManager::new(people_columns())
}

fn visible_ids(m: &ColumnManager<serde_json::Value>) -> Vec<String> {
    m.visible_columns().iter().map(|c| c.id.clone()).collect()
}

// =============================================================================
// ORDERING
// =============================================================================

#[test]
fn test_definition_order_by_default() {
    let m = manager();
    assert_eq!(visible_ids(&m), vec!["id", "name", "age", "city", "tags"]);
}

#[test]
fn test_reorder_appends_missing_ids_stably() {
    let mut m = manager();
    let events = m.reorder(&["age".into(), "name".into()]);
    assert_eq!(visible_ids(&m), vec!["age", "name", "id", "city", "tags"]);
    // id moved 0->2, name 1->1 (unchanged), age 2->0, city/tags shifted? No:
    // city stays at 3 and tags at 4, so exactly two events fire.
    assert_eq!(events.len(), 2);
    assert!(events.contains(&ColumnEvent::Moved { id: "age".into(), from: 2, to: 0 }));
    assert!(events.contains(&ColumnEvent::Moved { id: "id".into(), from: 0, to: 2 }));
}

#[test]
fn test_reorder_with_unknown_id_is_ignored() {
    let mut m = manager();
    let events = m.reorder(&["ghost".into(), "name".into()]);
    assert!(events.is_empty());
    assert_eq!(visible_ids(&m), vec!["id", "name", "age", "city", "tags"]);
}

#[test]
fn test_reorder_noop_emits_nothing() {
    let mut m = manager();
    let events = m.reorder(&[
        "id".into(),
        "name".into(),
        "age".into(),
        "city".into(),
        "tags".into(),
    ]);
    assert!(events.is_empty());
}

#[test]
fn test_move_column() {
    let mut m = manager();
    let event = m.move_column("tags", 0).unwrap();
    assert_eq!(event, ColumnEvent::Moved { id: "tags".into(), from: 4, to: 0 });
    assert_eq!(visible_ids(&m), vec!["tags", "id", "name", "age", "city"]);

    assert!(m.move_column("tags", 0).is_none());
    assert!(m.move_column("ghost", 1).is_none());
}

#[test]
fn test_added_column_renders_last() {
    let mut m = manager();
    m.reorder(&["age".into(), "name".into()]);
    m.add_column(Column::new("email"));
    assert_eq!(
        visible_ids(&m),
        vec!["age", "name", "id", "city", "tags", "email"]
    );
}

// =============================================================================
// REMOVAL
// =============================================================================

#[test]
fn test_remove_column_purges_everywhere() {
    let mut m = manager();
    m.reorder(&["age".into(), "name".into()]);
    m.set_width("age", 120.0);
    m.lock("age", LockSide::Left);
    m.set_hidden("age", true);
    m.set_groups(vec![ColumnGroup::new(
        "numbers",
        "Numbers",
        vec!["id".into(), "age".into()],
    )]);

    let event = m.remove_column("age");
    assert_eq!(event, Some(ColumnEvent::Removed { id: "age".into() }));
    assert!(m.column("age").is_none());
    assert!(m.width("age").is_none());
    assert_eq!(m.lock_side("age"), None);
    assert!(!m.is_hidden("age"));
    assert_eq!(m.groups()[0].children, vec!["id".to_string()]);
    assert_eq!(visible_ids(&m), vec!["name", "id", "city", "tags"]);

    assert!(m.remove_column("age").is_none());
}

// =============================================================================
// VISIBILITY AND LOCKING
// =============================================================================

#[test]
fn test_hidden_set_and_column_flag_both_hide() {
    let mut m = ColumnManager::new(vec![
        Column::<serde_json::Value>::new("a"),
        Column::new("b").hidden(true),
        Column::new("c"),
    ]);
    m.set_hidden("c", true);
    assert_eq!(visible_ids(&m), vec!["a"]);
    m.set_hidden("c", false);
    assert_eq!(visible_ids(&m), vec!["a", "c"]);
}

#[test]
fn test_lock_switches_sides_silently() {
    let mut m = manager();
    m.lock("name", LockSide::Left);
    assert_eq!(m.lock_side("name"), Some(LockSide::Left));
    m.lock("name", LockSide::Right);
    assert_eq!(m.lock_side("name"), Some(LockSide::Right));

    let partition = m.partition();
    assert!(partition.left.is_empty());
    assert_eq!(partition.right.len(), 1);
    assert_eq!(partition.center.len(), 4);

    m.unlock("name");
    assert_eq!(m.lock_side("name"), None);
}

#[test]
fn test_partition_preserves_display_order() {
    let mut m = manager();
    m.lock("tags", LockSide::Left);
    m.lock("id", LockSide::Left);
    let partition = m.partition();
    // Lock partitions follow display order, not lock order.
    let left: Vec<&str> = partition.left.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(left, vec!["id", "tags"]);
}

// =============================================================================
// WIDTHS
// =============================================================================

#[test]
fn test_set_width_and_event() {
    let mut m = manager();
    let event = m.set_width("name", 200.0);
    assert_eq!(event, Some(ColumnEvent::Resized { id: "name".into(), width: 200.0 }));
    assert_eq!(m.width("name"), Some(200.0));
    assert!(m.set_width("ghost", 100.0).is_none());
}

#[test]
fn test_auto_size_with_measurement_adds_padding() {
    let mut m = manager();
    m.auto_size("name", Some(150.0));
    assert_eq!(m.width("name"), Some(166.0));
}

#[test]
fn test_auto_size_estimates_from_header_with_floor() {
    let mut m = manager();
    // "ID" estimates below the floor.
    m.auto_size("id", None);
    assert_eq!(m.width("id"), Some(60.0));
    // A long header estimates above it.
    m.add_column(Column::new("address").header("Full Street Address"));
    m.auto_size("address", None);
    assert_eq!(m.width("address"), Some(19.0 * 8.0 + 16.0));
}

// =============================================================================
// GROUPS
// =============================================================================

#[test]
fn test_grouped_columns_first_group_wins() {
    let mut m = manager();
    m.set_groups(vec![
        ColumnGroup::new("identity", "Identity", vec!["id".into(), "name".into()]),
        ColumnGroup::new("also-name", "Also Name", vec!["name".into(), "age".into()]),
    ]);
    let buckets = m.grouped_columns();
    assert_eq!(buckets.len(), 3);

    let first: Vec<&str> = buckets[0].columns.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(first, vec!["id", "name"]);

    // name is already claimed; the second group only gets age.
    let second: Vec<&str> = buckets[1].columns.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(second, vec!["age"]);

    let rest: Vec<&str> = buckets[2].columns.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(rest, vec!["city", "tags"]);
    assert!(buckets[2].group.is_none());
}

#[test]
fn test_toggle_group() {
    let mut m = manager();
    m.set_groups(vec![ColumnGroup::new("g", "G", vec!["id".into()])]);
    assert!(m.groups()[0].expanded);
    m.toggle_group("g");
    assert!(!m.groups()[0].expanded);
}

// =============================================================================
// SNAPSHOTS
// =============================================================================

#[test]
fn test_snapshot_roundtrip() {
    let mut m = manager();
    m.reorder(&["age".into(), "name".into()]);
    m.set_width("name", 180.0);
    m.lock("id", LockSide::Left);
    m.lock("tags", LockSide::Right);
    m.set_hidden("city", true);
    m.set_groups(vec![ColumnGroup::new("g", "G", vec!["age".into()])]);

    let json = m.export_state();
    let mut other = ColumnManager::new(people_columns());
    other.import_state(&json);

    assert_eq!(visible_ids(&other), visible_ids(&m));
    assert_eq!(other.width("name"), Some(180.0));
    assert_eq!(other.lock_side("id"), Some(LockSide::Left));
    assert_eq!(other.lock_side("tags"), Some(LockSide::Right));
    assert!(other.is_hidden("city"));
    assert_eq!(other.groups().len(), 1);
}

#[test]
fn test_malformed_snapshot_leaves_state() {
    let mut m = manager();
    m.set_width("name", 180.0);
    m.import_state("{not json");
    assert_eq!(m.width("name"), Some(180.0));
}

#[test]
fn test_import_rejects_double_locks() {
    let mut m = manager();
    m.import_state(r#"{"lockedLeft":["name"],"lockedRight":["name"]}"#);
    assert_eq!(m.lock_side("name"), Some(LockSide::Left));
}
