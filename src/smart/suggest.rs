//! Value-frequency suggestions for filter dropdowns.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::record::Record;
use crate::types::Column;

/// One suggested filter value with its occurrence count.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ValueSuggestion {
    pub value: String,
    pub count: usize,
}

/// Count distinct display values of a column over the supplied records.
///
/// List cells contribute each element separately (a tag column suggests
/// tags, not tag tuples). Results are sorted by descending count with a
/// label tiebreak, optionally narrowed by a case-insensitive substring
/// query, and capped to `limit`.
pub fn value_suggestions<T: Record>(
    records: &[T],
    columns: &[Column<T>],
    column_id: &str,
    query: Option<&str>,
    limit: usize,
) -> Vec<ValueSuggestion> {
    let column = columns.iter().find(|c| c.id == column_id);
    let mut counts: HashMap<String, usize> = HashMap::new();
    for record in records {
        let value = match column {
            Some(col) => col.value_for(record),
            None => record.field(column_id),
        };
        let labels: Vec<String> = match value {
            crate::value::CellValue::List(items) => {
                items.iter().map(crate::value::CellValue::display).collect()
            }
            other => vec![other.display()],
        };
        for label in labels {
            if label.is_empty() {
                continue;
            }
            *counts.entry(label).or_insert(0) += 1;
        }
    }

    let needle = query.map(str::to_lowercase);
    let mut suggestions: Vec<ValueSuggestion> = counts
        .into_iter()
        .filter(|(label, _)| match &needle {
            Some(q) => label.to_lowercase().contains(q),
            None => true,
        })
        .map(|(value, count)| ValueSuggestion { value, count })
        .collect();
    suggestions.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
    suggestions.truncate(limit);
    suggestions
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

    fn records() -> Vec<serde_json::Value> {
        vec![
            json!({"city": "Lisbon"}),
            json!({"city": "Lisbon"}),
            json!({"city": "Porto"}),
            json!({"city": "Lagos"}),
            json!({"city": null}),
        ]
    }

    #[test]
    fn test_sorted_by_count_then_label() {
        let cols: Vec<Column<serde_json::Value>> = vec![Column::new("city")];
        let s = value_suggestions(&records(), &cols, "city", None, 10);
        assert_eq!(s[0].value, "Lisbon");
        assert_eq!(s[0].count, 2);
        // Porto and Lagos both count 1; label order breaks the tie.
        assert_eq!(s[1].value, "Lagos");
        assert_eq!(s[2].value, "Porto");
    }

    #[test]
    fn test_query_narrows_case_insensitively() {
        let cols: Vec<Column<serde_json::Value>> = vec![Column::new("city")];
        let s = value_suggestions(&records(), &cols, "city", Some("l"), 10);
        let labels: Vec<&str> = s.iter().map(|v| v.value.as_str()).collect();
        assert_eq!(labels, vec!["Lisbon", "Lagos"]);
    }

    #[test]
    fn test_limit_caps_results() {
        let cols: Vec<Column<serde_json::Value>> = vec![Column::new("city")];
        let s = value_suggestions(&records(), &cols, "city", None, 1);
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn test_list_cells_count_elements() {
        let records = vec![
            json!({"tags": ["red", "blue"]}),
            json!({"tags": ["red"]}),
        ];
        let cols: Vec<Column<serde_json::Value>> = vec![Column::new("tags")];
        let s = value_suggestions(&records, &cols, "tags", None, 10);
        assert_eq!(s[0], ValueSuggestion { value: "red".into(), count: 2 });
        assert_eq!(s[1], ValueSuggestion { value: "blue".into(), count: 1 });
    }
}
