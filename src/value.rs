//! The coerced value domain every cell accessor produces.
//!
//! Filtering and sorting never see raw records directly — a column accessor
//! reduces a record to a `CellValue` first, and all operator/comparator
//! semantics are defined over this enum.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single cell's coerced value.
///
/// Serialized untagged: `null`, booleans, and numbers map to their JSON
/// counterparts; dates round-trip as RFC 3339 text. `Date` is listed before
/// `Text` so a serialized date deserializes back as a date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Absent / null / undefined.
    Null,
    Bool(bool),
    Number(f64),
    Date(DateTime<Utc>),
    Text(String),
    /// Multiple values (membership filters, multi-value cells).
    List(Vec<CellValue>),
}

impl CellValue {
    /// True for null, empty text, and empty lists.
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Text(s) => s.is_empty(),
            CellValue::List(items) => items.is_empty(),
            _ => false,
        }
    }

    /// Numeric coercion for comparison operators.
    ///
    /// Text is parsed as `f64`; unparseable text yields `None`, which makes
    /// numeric predicates false rather than erroring. Dates coerce to
    /// milliseconds since the epoch so range filters work on them.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            CellValue::Text(s) => s.trim().parse::<f64>().ok(),
            CellValue::Date(d) => Some(d.timestamp_millis() as f64),
            CellValue::Null | CellValue::List(_) => None,
        }
    }

    /// String coercion used by text operators and suggestions.
    ///
    /// Null renders as the empty string; numbers use `f64` display (no
    /// trailing `.0` for integral values); dates render as RFC 3339.
    pub fn display(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Date(d) => d.to_rfc3339(),
            CellValue::Text(s) => s.clone(),
            CellValue::List(items) => {
                let parts: Vec<String> = items.iter().map(CellValue::display).collect();
                parts.join(", ")
            }
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<DateTime<Utc>> for CellValue {
    fn from(d: DateTime<Utc>) -> Self {
        CellValue::Date(d)
    }
}

impl<V: Into<CellValue>> From<Option<V>> for CellValue {
    fn from(v: Option<V>) -> Self {
        v.map_or(CellValue::Null, Into::into)
    }
}

impl<V: Into<CellValue>> From<Vec<V>> for CellValue {
    fn from(items: Vec<V>) -> Self {
        CellValue::List(items.into_iter().map(Into::into).collect())
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

    #[test]
    fn test_is_empty() {
        assert!(CellValue::Null.is_empty());
        assert!(CellValue::Text(String::new()).is_empty());
        assert!(CellValue::List(Vec::new()).is_empty());
        assert!(!CellValue::Number(0.0).is_empty());
        assert!(!CellValue::Bool(false).is_empty());
        assert!(!CellValue::Text("x".to_string()).is_empty());
    }

    #[test]
    fn test_as_number_coercion() {
        assert_eq!(CellValue::Number(2.5).as_number(), Some(2.5));
        assert_eq!(CellValue::Text(" 42 ".into()).as_number(), Some(42.0));
        assert_eq!(CellValue::Text("abc".into()).as_number(), None);
        assert_eq!(CellValue::Null.as_number(), None);
        assert_eq!(CellValue::Bool(true).as_number(), Some(1.0));
    }

    #[test]
    fn test_display_formats() {
        assert_eq!(CellValue::Number(30.0).display(), "30");
        assert_eq!(CellValue::Number(30.5).display(), "30.5");
        assert_eq!(CellValue::Null.display(), "");
        let list: CellValue = vec!["a", "b"].into();
        assert_eq!(list.display(), "a, b");
    }

    #[test]
    fn test_date_roundtrips_before_text() {
        let d = CellValue::Date(Utc::now());
        let json = serde_json::to_string(&d).unwrap();
        let back: CellValue = serde_json::from_str(&json).unwrap();
        assert!(matches!(back, CellValue::Date(_)));
    }
}
