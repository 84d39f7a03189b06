//! State snapshot tests
//!
//! Export/import round-trips, partial and malformed imports, and
//! store-backed persistence.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{ids, people_engine, MemoryStore};
use gridstate::{
    AdvancedFilter, FilterOperator, GridOptions, RowKey, SelectionMode, SmartFilterEngine,
    SortDirection,
};

fn configured_engine() -> gridstate::GridEngine<serde_json::Value> {
    let mut engine = people_engine(GridOptions {
        selection_mode: SelectionMode::Multiple,
        multi_sort: true,
        page_size: 3,
        ..GridOptions::default()
    });
    engine.sort_by("age", Some(SortDirection::Descending));
    engine.sort_by("id", Some(SortDirection::Ascending));
    engine.set_filter("name", "a", FilterOperator::Contains);
    engine.set_page(2);
    engine.select_row(RowKey::Int(1), true);
    engine.select_row(RowKey::Int(6), true);
    engine
}

// =============================================================================
// GRID ENGINE SNAPSHOTS
// =============================================================================

#[test]
fn test_import_of_export_is_a_noop() {
    let mut engine = configured_engine();
    let before_rows = ids(engine.processed_rows());
    let before = engine.export_state();

    engine.import_state(&before);

    assert_eq!(engine.export_state(), before);
    assert_eq!(ids(engine.processed_rows()), before_rows);
}

#[test]
fn test_snapshot_restores_into_fresh_engine() {
    let source = configured_engine();
    let mut target = people_engine(GridOptions {
        selection_mode: SelectionMode::Multiple,
        multi_sort: true,
        page_size: 10,
        ..GridOptions::default()
    });

    target.import_state(&source.export_state());

    assert_eq!(target.sort_spec(), source.sort_spec());
    assert_eq!(target.filters(), source.filters());
    assert_eq!(target.pagination().current_page, source.pagination().current_page);
    assert_eq!(target.pagination().page_size, source.pagination().page_size);
    assert_eq!(
        target.selection().sorted_keys(),
        source.selection().sorted_keys()
    );
    assert_eq!(ids(target.processed_rows()), ids(source.processed_rows()));
}

#[test]
fn test_snapshot_has_exactly_four_keys() {
    let engine = configured_engine();
    let value: serde_json::Value = serde_json::from_str(&engine.export_state()).unwrap();
    let object = value.as_object().unwrap();
    let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["filters", "pagination", "selection", "sort"]);
}

#[test]
fn test_malformed_import_leaves_state_unchanged() {
    let mut engine = configured_engine();
    let before = engine.export_state();
    let revision = engine.revision();

    engine.import_state("{definitely not json");

    assert_eq!(engine.export_state(), before);
    assert_eq!(engine.revision(), revision);
    assert!(engine.try_import_state("{still bad").is_err());
    assert_eq!(engine.export_state(), before);
}

#[test]
fn test_missing_keys_leave_state_untouched() {
    let mut engine = configured_engine();
    let sort_before = engine.sort_spec().to_vec();

    engine.import_state(r#"{"pagination":{"currentPage":1,"pageSize":5}}"#);

    assert_eq!(engine.sort_spec(), sort_before.as_slice());
    assert_eq!(engine.filters().len(), 1);
    assert_eq!(engine.pagination().page_size, 5);
}

#[test]
fn test_unknown_keys_are_ignored() {
    let mut engine = configured_engine();
    engine.import_state(r#"{"sort":[],"futureFeature":{"x":1}}"#);
    assert!(engine.sort_spec().is_empty());
}

#[test]
fn test_selection_keys_survive_roundtrip() {
    let mut engine = configured_engine();
    engine.import_state(&engine.export_state());
    assert!(engine.selection().is_selected(&RowKey::Int(1)));
    assert!(engine.selection().is_selected(&RowKey::Int(6)));
    assert!(engine.selection().indeterminate);
}

// =============================================================================
// STORE-BACKED PERSISTENCE
// =============================================================================

#[test]
fn test_persist_and_reload_via_store() {
    let store = MemoryStore::default();
    let options = GridOptions {
        persist_key: Some("grid-a".into()),
        ..GridOptions::default()
    };

    let mut engine = gridstate::GridEngine::new().with_store(store.clone());
    engine.initialize(common::people(), common::people_columns(), options.clone());
    engine.sort_by("name", Some(SortDirection::Descending));
    engine.persist();
    assert!(store.entries.borrow().contains_key("grid-a"));

    // A new engine over the same store picks the snapshot up during
    // initialize.
    let mut revived = gridstate::GridEngine::new().with_store(store.clone());
    revived.initialize(common::people(), common::people_columns(), options);
    assert_eq!(revived.sort_spec().len(), 1);
    assert_eq!(revived.sort_spec()[0].direction, SortDirection::Descending);
}

#[test]
fn test_persist_without_key_is_noop() {
    let store = MemoryStore::default();
    let mut engine = gridstate::GridEngine::new().with_store(store.clone());
    engine.initialize(
        common::people(),
        common::people_columns(),
        GridOptions::default(),
    );
    engine.persist();
    assert!(store.entries.borrow().is_empty());
}

// =============================================================================
// SMART FILTER SNAPSHOTS
// =============================================================================

#[test]
fn test_smart_filter_snapshot_roundtrip() {
    let mut engine = SmartFilterEngine::new();
    engine.set_filter(AdvancedFilter::new("age", FilterOperator::Between, 30.0).value2(50.0));
    engine.set_filter(AdvancedFilter::new("city", FilterOperator::Equals, "London").or());
    engine.set_global_search("ada");
    engine.flush_search();
    engine.save_preset("p1");
    engine.set_default_preset("p1");

    let json = engine.export_state();
    let mut other = SmartFilterEngine::new();
    other.import_state(&json);

    assert_eq!(other.filters(), engine.filters());
    assert_eq!(other.global_search_term(), "ada");
    assert_eq!(other.presets().len(), 1);
    assert_eq!(other.default_preset().unwrap().name, "p1");
}

#[test]
fn test_smart_filter_malformed_import_ignored() {
    let mut engine = SmartFilterEngine::new();
    engine.set_filter(AdvancedFilter::new("age", FilterOperator::GreaterThan, 1.0));
    engine.import_state("[1,2,");
    assert_eq!(engine.filters().len(), 1);
}
