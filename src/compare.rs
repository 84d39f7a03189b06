//! Default sort comparison and the stable multi-key sort driver.

use std::cmp::Ordering;

use crate::record::Record;
use crate::types::{Column, Row, SortDirection, SortKey};
use crate::value::CellValue;

/// Default typed comparison between two cell values.
///
/// Null sorts before any defined value. Text compares case-insensitively
/// with a case-sensitive tiebreak so ordering stays total. Mixed types fall
/// back to comparing display strings.
pub fn compare_values(a: &CellValue, b: &CellValue) -> Ordering {
    match (a, b) {
        (CellValue::Null, CellValue::Null) => Ordering::Equal,
        (CellValue::Null, _) => Ordering::Less,
        (_, CellValue::Null) => Ordering::Greater,
        (CellValue::Number(x), CellValue::Number(y)) => {
            x.partial_cmp(y).unwrap_or(Ordering::Equal)
        }
        (CellValue::Date(x), CellValue::Date(y)) => {
            x.timestamp_millis().cmp(&y.timestamp_millis())
        }
        (CellValue::Bool(x), CellValue::Bool(y)) => x.cmp(y),
        (CellValue::Text(x), CellValue::Text(y)) => compare_text(x, y),
        _ => compare_text(&a.display(), &b.display()),
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    let folded = a.to_lowercase().cmp(&b.to_lowercase());
    if folded != Ordering::Equal {
        return folded;
    }
    a.cmp(b)
}

/// Sort rows by the ordered key list, preserving input order on full ties.
///
/// Cell values are extracted once per row per key (decorate, sort,
/// undecorate) so accessors run O(rows × keys) rather than O(comparisons).
/// A key naming a missing or non-sortable column is skipped.
pub(crate) fn sort_rows<T: Record + Clone>(
    rows: Vec<Row<T>>,
    sort: &[SortKey],
    columns: &[Column<T>],
) -> Vec<Row<T>> {
    let keyed: Vec<(&Column<T>, SortDirection)> = sort
        .iter()
        .filter_map(|key| {
            columns
                .iter()
                .find(|c| c.id == key.column_id && c.sortable)
                .map(|c| (c, key.direction))
        })
        .collect();
    if keyed.is_empty() {
        return rows;
    }

    let mut decorated: Vec<(Vec<CellValue>, Row<T>)> = rows
        .into_iter()
        .map(|row| {
            let values = keyed
                .iter()
                .map(|(col, _)| col.value_for(&row.record))
                .collect();
            (values, row)
        })
        .collect();

    // Vec::sort_by is stable: rows equal on every key keep their order.
    decorated.sort_by(|(a_vals, _), (b_vals, _)| {
        for (i, (col, direction)) in keyed.iter().enumerate() {
            let a = a_vals.get(i).unwrap_or(&CellValue::Null);
            let b = b_vals.get(i).unwrap_or(&CellValue::Null);
            let ordering = match &col.sort_compare {
                Some(custom) => custom(a, b),
                None => compare_values(a, b),
            };
            let ordering = match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });

    decorated.into_iter().map(|(_, row)| row).collect()
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
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_null_sorts_first() {
        assert_eq!(
            compare_values(&CellValue::Null, &CellValue::Number(-1.0)),
            Ordering::Less
        );
        assert_eq!(
            compare_values(&CellValue::Text("a".into()), &CellValue::Null),
            Ordering::Greater
        );
    }

    #[test]
    fn test_numbers_numeric_not_lexicographic() {
        assert_eq!(
            compare_values(&CellValue::Number(9.0), &CellValue::Number(10.0)),
            Ordering::Less
        );
    }

    #[test]
    fn test_text_case_insensitive_with_tiebreak() {
        assert_eq!(
            compare_values(&CellValue::from("apple"), &CellValue::from("Banana")),
            Ordering::Less
        );
        // Same letters, different case: still a total order.
        assert_ne!(
            compare_values(&CellValue::from("Apple"), &CellValue::from("apple")),
            Ordering::Equal
        );
    }

    #[test]
    fn test_dates_by_timestamp() {
        let early = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        assert_eq!(
            compare_values(&CellValue::Date(early), &CellValue::Date(late)),
            Ordering::Less
        );
    }

    #[test]
    fn test_mixed_types_compare_by_display() {
        // Number 2 vs text "10": display strings "2" vs "10".
        assert_eq!(
            compare_values(&CellValue::Number(2.0), &CellValue::Text("10".into())),
            Ordering::Greater
        );
    }
}
