//! Record access and row identity resolution.
//!
//! Records stay opaque to the engine: the only thing it ever asks of one is
//! "give me the value of this named field". Identity is derived, not stored,
//! so selection survives re-filtering as long as the underlying identity
//! field is stable.

use serde::{Deserialize, Serialize};

use crate::value::CellValue;

/// Field names probed for row identity, in priority order.
const IDENTITY_FIELDS: [&str; 3] = ["id", "_id", "uuid"];

/// Read access to an application record.
///
/// Implemented for `serde_json::Value` out of the box; applications
/// implement it for their own row structs. Missing fields return
/// [`CellValue::Null`].
pub trait Record {
    /// The value of the field named `name`, or `Null` when absent.
    fn field(&self, name: &str) -> CellValue;
}

impl Record for serde_json::Value {
    fn field(&self, name: &str) -> CellValue {
        match self.get(name) {
            Some(v) => json_to_value(v),
            None => CellValue::Null,
        }
    }
}

fn json_to_value(v: &serde_json::Value) -> CellValue {
    match v {
        serde_json::Value::Null => CellValue::Null,
        serde_json::Value::Bool(b) => CellValue::Bool(*b),
        serde_json::Value::Number(n) => CellValue::Number(n.as_f64().unwrap_or(f64::NAN)),
        serde_json::Value::String(s) => CellValue::Text(s.clone()),
        serde_json::Value::Array(items) => CellValue::List(items.iter().map(json_to_value).collect()),
        serde_json::Value::Object(_) => CellValue::Text(v.to_string()),
    }
}

/// Stable row identity.
///
/// Integral numeric ids collapse to `Int` so that a record id of `7` and a
/// positional fallback of `7` compare the way the selection set expects.
/// Serialized untagged (plain JSON number or string).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowKey {
    Int(i64),
    Text(String),
}

impl RowKey {
    /// Positional fallback key for a record with no identity field.
    pub fn index(index: usize) -> Self {
        RowKey::Int(i64::try_from(index).unwrap_or(i64::MAX))
    }
}

impl std::fmt::Display for RowKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowKey::Int(n) => write!(f, "{n}"),
            RowKey::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for RowKey {
    fn from(n: i64) -> Self {
        RowKey::Int(n)
    }
}

impl From<&str> for RowKey {
    fn from(s: &str) -> Self {
        RowKey::Text(s.to_string())
    }
}

impl From<String> for RowKey {
    fn from(s: String) -> Self {
        RowKey::Text(s)
    }
}

/// Resolve a record's stable key.
///
/// Probes `id`, `_id`, `uuid` in order and takes the first usable value;
/// falls back to the positional index. Re-applied on every recomputation
/// pass so keys never go stale against mutated records.
pub fn resolve_key<T: Record>(record: &T, index: usize) -> RowKey {
    for name in IDENTITY_FIELDS {
        match record.field(name) {
            CellValue::Null => {}
            CellValue::Text(s) if s.is_empty() => {}
            CellValue::Number(n) => {
                // Integral ids become Int; anything else keys by display text.
                if let Ok(i) = n.to_string().parse::<i64>() {
                    return RowKey::Int(i);
                }
                return RowKey::Text(n.to_string());
            }
            CellValue::Text(s) => return RowKey::Text(s),
            other => return RowKey::Text(other.display()),
        }
    }
    RowKey::index(index)
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
    use serde_json::json;

    #[test]
    fn test_identity_field_priority() {
        let r = json!({"id": 7, "_id": "seven", "uuid": "u-7"});
        assert_eq!(resolve_key(&r, 0), RowKey::Int(7));

        let r = json!({"_id": "seven", "uuid": "u-7"});
        assert_eq!(resolve_key(&r, 0), RowKey::Text("seven".into()));

        let r = json!({"uuid": "u-7"});
        assert_eq!(resolve_key(&r, 0), RowKey::Text("u-7".into()));
    }

    #[test]
    fn test_positional_fallback() {
        let r = json!({"name": "anonymous"});
        assert_eq!(resolve_key(&r, 3), RowKey::Int(3));
    }

    #[test]
    fn test_null_and_empty_ids_skipped() {
        let r = json!({"id": null, "_id": "", "uuid": "u-1"});
        assert_eq!(resolve_key(&r, 0), RowKey::Text("u-1".into()));
    }

    #[test]
    fn test_fractional_id_keys_by_text() {
        let r = json!({"id": 1.5});
        assert_eq!(resolve_key(&r, 0), RowKey::Text("1.5".into()));
    }

    #[test]
    fn test_json_field_access() {
        let r = json!({"age": 30, "tags": ["a", "b"], "active": true});
        assert_eq!(r.field("age"), CellValue::Number(30.0));
        assert_eq!(r.field("active"), CellValue::Bool(true));
        assert_eq!(r.field("missing"), CellValue::Null);
        assert!(matches!(r.field("tags"), CellValue::List(_)));
    }

    #[test]
    fn test_key_serde_roundtrip() {
        let keys = vec![RowKey::Int(3), RowKey::Text("u-9".into())];
        let json = serde_json::to_string(&keys).unwrap();
        assert_eq!(json, r#"[3,"u-9"]"#);
        let back: Vec<RowKey> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, keys);
    }
}
