//! Default filter-operator semantics.
//!
//! Text operators compare case-insensitively over the string coercion of
//! the cell value; numeric operators coerce both sides with
//! [`CellValue::as_number`] and are false whenever either side fails to
//! parse. A null cell value fails every basic operator.

use crate::types::FilterOperator;
use crate::value::CellValue;

/// Lower-cased string coercions of both sides.
fn text_pair(cell: &CellValue, filter: &CellValue) -> (String, String) {
    (
        cell.display().to_lowercase(),
        filter.display().to_lowercase(),
    )
}

/// Numeric coercions of both sides, or `None` when either fails.
fn number_pair(cell: &CellValue, filter: &CellValue) -> Option<(f64, f64)> {
    Some((cell.as_number()?, filter.as_number()?))
}

/// Evaluate a basic operator against one cell value.
///
/// Extended operators (`Between`, `In`, ... `Regex`) are the smart filter
/// engine's business and evaluate to false here; the engine's basic filters
/// never produce them.
pub fn matches_basic(operator: FilterOperator, cell: &CellValue, filter: &CellValue) -> bool {
    if matches!(cell, CellValue::Null) {
        return false;
    }
    match operator {
        FilterOperator::Equals => {
            let (a, b) = text_pair(cell, filter);
            a == b
        }
        FilterOperator::Contains => {
            let (a, b) = text_pair(cell, filter);
            a.contains(&b)
        }
        FilterOperator::StartsWith => {
            let (a, b) = text_pair(cell, filter);
            a.starts_with(&b)
        }
        FilterOperator::EndsWith => {
            let (a, b) = text_pair(cell, filter);
            a.ends_with(&b)
        }
        FilterOperator::GreaterThan => number_pair(cell, filter).is_some_and(|(a, b)| a > b),
        FilterOperator::LessThan => number_pair(cell, filter).is_some_and(|(a, b)| a < b),
        _ => false,
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
    use test_case::test_case;

    #[test_case(FilterOperator::Equals, "Alice", "alice", true; "equals ignores case")]
    #[test_case(FilterOperator::Equals, "Alice", "Ali", false; "equals is not prefix")]
    #[test_case(FilterOperator::Contains, "Wonderland", "DER", true; "contains ignores case")]
    #[test_case(FilterOperator::Contains, "Wonderland", "xyz", false; "contains misses")]
    #[test_case(FilterOperator::StartsWith, "Wonderland", "won", true; "starts with")]
    #[test_case(FilterOperator::StartsWith, "Wonderland", "land", false; "starts with misses")]
    #[test_case(FilterOperator::EndsWith, "Wonderland", "LAND", true; "ends with")]
    #[test_case(FilterOperator::EndsWith, "Wonderland", "won", false; "ends with misses")]
    fn test_text_operators(op: FilterOperator, cell: &str, filter: &str, expected: bool) {
        assert_eq!(
            matches_basic(op, &CellValue::from(cell), &CellValue::from(filter)),
            expected
        );
    }

    #[test_case(30.0, 25.0, true; "thirty gt twenty five")]
    #[test_case(25.0, 25.0, false; "not strictly greater")]
    #[test_case(20.0, 25.0, false; "twenty not gt")]
    fn test_greater_than(cell: f64, filter: f64, expected: bool) {
        assert_eq!(
            matches_basic(
                FilterOperator::GreaterThan,
                &CellValue::Number(cell),
                &CellValue::Number(filter)
            ),
            expected
        );
    }

    #[test]
    fn test_numeric_operator_parses_text() {
        assert!(matches_basic(
            FilterOperator::LessThan,
            &CellValue::Text("9".into()),
            &CellValue::Text("10".into())
        ));
    }

    #[test]
    fn test_non_numeric_comparand_is_false() {
        assert!(!matches_basic(
            FilterOperator::GreaterThan,
            &CellValue::Text("abc".into()),
            &CellValue::Number(5.0)
        ));
        assert!(!matches_basic(
            FilterOperator::LessThan,
            &CellValue::Number(5.0),
            &CellValue::Text("abc".into())
        ));
    }

    #[test]
    fn test_null_cell_fails_everything() {
        for op in [
            FilterOperator::Equals,
            FilterOperator::Contains,
            FilterOperator::GreaterThan,
        ] {
            assert!(!matches_basic(op, &CellValue::Null, &CellValue::from("x")));
        }
    }
}
