//! Pure pipeline stages: filter → sort → paginate.
//!
//! Each stage is a function of the previous stage's output; the engine
//! composes them in this fixed order on every recomputation. Sorting lives
//! in [`crate::compare`]; the stages here cover filtering and slicing.

use crate::predicate::matches_basic;
use crate::record::Record;
use crate::types::{Column, FilterSpec, Pagination, Row};

/// Keep rows that pass every active filter (implicit AND across columns).
///
/// A column's custom `filter_predicate` is used exclusively when present.
/// A filter naming a missing or non-filterable column keeps the row — a
/// stale filter must not hide data.
pub(crate) fn apply_filters<T: Record + Clone>(
    rows: &[Row<T>],
    filters: &[FilterSpec],
    columns: &[Column<T>],
) -> Vec<Row<T>> {
    if filters.is_empty() {
        return rows.to_vec();
    }
    rows.iter()
        .filter(|row| {
            filters.iter().all(|spec| {
                let Some(column) = columns
                    .iter()
                    .find(|c| c.id == spec.column_id && c.filterable)
                else {
                    return true;
                };
                let value = column.value_for(&row.record);
                match &column.filter_predicate {
                    Some(custom) => custom(&value, &spec.value),
                    None => matches_basic(spec.operator, &value, &spec.value),
                }
            })
        })
        .cloned()
        .collect()
}

/// Slice the current page out of the filtered, sorted rows.
///
/// Totals must already be up to date on `pagination` (the engine calls
/// [`Pagination::set_total_items`] first).
pub(crate) fn paginate<T>(rows: Vec<Row<T>>, pagination: &Pagination) -> Vec<Row<T>> {
    let start = pagination.offset().min(rows.len());
    rows.into_iter()
        .skip(start)
        .take(pagination.page_size)
        .collect()
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
    use crate::record::resolve_key;
    use crate::types::FilterOperator;
    use serde_json::json;

    fn rows(records: Vec<serde_json::Value>) -> Vec<Row<serde_json::Value>> {
        records
            .into_iter()
            .enumerate()
            .map(|(i, r)| {
                let key = resolve_key(&r, i);
                Row::new(r, key, i)
            })
            .collect()
    }

    #[test]
    fn test_filters_and_across_columns() {
        let all = rows(vec![
            json!({"id": 1, "name": "Ada", "age": 36}),
            json!({"id": 2, "name": "Alan", "age": 41}),
            json!({"id": 3, "name": "Grace", "age": 36}),
        ]);
        let columns = vec![Column::new("name"), Column::new("age")];
        let filters = vec![
            FilterSpec::new("name", "a", FilterOperator::Contains),
            FilterSpec::new("age", 36.0, FilterOperator::Equals),
        ];
        let kept = apply_filters(&all, &filters, &columns);
        let names: Vec<String> = kept
            .iter()
            .map(|r| r.record.field("name").display())
            .collect();
        assert_eq!(names, vec!["Ada", "Grace"]);
    }

    #[test]
    fn test_filter_on_missing_column_keeps_rows() {
        let all = rows(vec![json!({"id": 1})]);
        let columns: Vec<Column<serde_json::Value>> = vec![Column::new("id")];
        let filters = vec![FilterSpec::new("ghost", "x", FilterOperator::Contains)];
        assert_eq!(apply_filters(&all, &filters, &columns).len(), 1);
    }

    #[test]
    fn test_custom_predicate_is_exclusive() {
        let all = rows(vec![
            json!({"id": 1, "name": "Ada"}),
            json!({"id": 2, "name": "Alan"}),
        ]);
        // Inverted matching: keep rows that do NOT contain the term.
        let columns = vec![
            Column::<serde_json::Value>::new("name")
                .filter_with(|cell, filter| !cell.display().contains(&filter.display())),
        ];
        let filters = vec![FilterSpec::new("name", "Ada", FilterOperator::Contains)];
        let kept = apply_filters(&all, &filters, &columns);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].record.field("name").display(), "Alan");
    }

    #[test]
    fn test_paginate_slices_and_clamps() {
        let all = rows((0..5).map(|i| json!({"id": i})).collect());
        let mut p = Pagination::new(2);
        p.set_total_items(5);
        p.current_page = 3;
        let page = paginate(all.clone(), &p);
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].record.field("id").display(), "4");

        p.current_page = 1;
        assert_eq!(paginate(all, &p).len(), 2);
    }
}
