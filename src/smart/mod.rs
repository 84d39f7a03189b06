//! Smart filtering: AND/OR composition, extended operators, global search,
//! presets, and value suggestions.
//!
//! A superset of the basic filter evaluator. Rows pass when every `And`
//! filter passes and (the `Or` set is empty or at least one `Or` filter
//! passes), further narrowed by the applied global search term.

mod presets;
mod search;
mod suggest;

pub use presets::FilterPreset;
pub use search::DEFAULT_DEBOUNCE;
pub use suggest::{value_suggestions, ValueSuggestion};

use std::time::{Duration, Instant};

use chrono::Utc;
use regex::RegexBuilder;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::record::Record;
use crate::types::{AdvancedFilter, Column, FilterCondition, FilterOperator, Row};
use crate::value::CellValue;

use search::GlobalSearch;

/// The smart filter engine. Holds no row data; [`apply`] evaluates against
/// whatever rows the caller hands it.
///
/// [`apply`]: SmartFilterEngine::apply
#[derive(Debug, Clone, Default)]
pub struct SmartFilterEngine {
    filters: Vec<AdvancedFilter>,
    search: GlobalSearch,
    presets: Vec<FilterPreset>,
}

impl SmartFilterEngine {
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Filters
    // -------------------------------------------------------------------------

    /// Add or replace a filter. Replace semantics key on the
    /// `(column_id, operator)` pair, so a column can carry several
    /// conditions with different operators.
    pub fn set_filter(&mut self, filter: AdvancedFilter) {
        match self
            .filters
            .iter_mut()
            .find(|f| f.column_id == filter.column_id && f.operator == filter.operator)
        {
            Some(slot) => *slot = filter,
            None => self.filters.push(filter),
        }
    }

    /// Remove one filter by its `(column_id, operator)` key.
    pub fn remove_filter(&mut self, column_id: &str, operator: FilterOperator) -> bool {
        let before = self.filters.len();
        self.filters
            .retain(|f| !(f.column_id == column_id && f.operator == operator));
        self.filters.len() != before
    }

    /// Remove every filter on a column.
    pub fn clear_column(&mut self, column_id: &str) {
        self.filters.retain(|f| f.column_id != column_id);
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
    }

    pub fn filters(&self) -> &[AdvancedFilter] {
        &self.filters
    }

    // -------------------------------------------------------------------------
    // Global search
    // -------------------------------------------------------------------------

    /// Stage a search term (debounced). The empty term clears the search
    /// immediately; terms below the minimum length are ignored.
    pub fn set_global_search(&mut self, term: &str) {
        self.search.stage(term, Instant::now());
    }

    /// Clock-injected variant of [`set_global_search`] for host loops and
    /// tests.
    ///
    /// [`set_global_search`]: SmartFilterEngine::set_global_search
    pub fn set_global_search_at(&mut self, term: &str, now: Instant) {
        self.search.stage(term, now);
    }

    /// Apply a pending term whose debounce deadline has passed. Returns
    /// true when the applied term changed.
    pub fn poll_search(&mut self) -> bool {
        self.search.poll(Instant::now())
    }

    /// Clock-injected variant of [`poll_search`].
    ///
    /// [`poll_search`]: SmartFilterEngine::poll_search
    pub fn poll_search_at(&mut self, now: Instant) -> bool {
        self.search.poll(now)
    }

    /// Apply any pending term immediately.
    pub fn flush_search(&mut self) -> bool {
        self.search.flush()
    }

    /// The currently applied search term.
    pub fn global_search_term(&self) -> &str {
        self.search.term()
    }

    /// Restrict the global search to a column subset (`None` = all).
    pub fn set_search_columns(&mut self, columns: Option<Vec<String>>) {
        self.search.set_columns(columns);
    }

    pub fn set_search_debounce(&mut self, debounce: Duration) {
        self.search.set_debounce(debounce);
    }

    pub fn set_search_min_length(&mut self, min_length: usize) {
        self.search.set_min_length(min_length);
    }

    // -------------------------------------------------------------------------
    // Evaluation
    // -------------------------------------------------------------------------

    /// Filter rows by the current configuration.
    pub fn apply<T: Record + Clone>(&self, rows: &[Row<T>], columns: &[Column<T>]) -> Vec<Row<T>> {
        let compiled = self.compile();
        let term = self.search.term().to_lowercase();
        rows.iter()
            .filter(|row| {
                self.passes_filters(&compiled, &row.record, columns)
                    && self.passes_search(&term, &row.record, columns)
            })
            .cloned()
            .collect()
    }

    /// Evaluate one record without cloning anything.
    pub fn matches<T: Record>(&self, record: &T, columns: &[Column<T>]) -> bool {
        let compiled = self.compile();
        let term = self.search.term().to_lowercase();
        self.passes_filters(&compiled, record, columns) && self.passes_search(&term, record, columns)
    }

    /// Regexes compile once per evaluation pass, not once per row. A
    /// pattern that fails to compile stays `None` and rejects every row.
    fn compile(&self) -> Vec<CompiledFilter<'_>> {
        self.filters
            .iter()
            .map(|filter| {
                let regex = if filter.operator == FilterOperator::Regex {
                    RegexBuilder::new(&filter.value.display())
                        .case_insensitive(!filter.case_sensitive)
                        .build()
                        .ok()
                } else {
                    None
                };
                CompiledFilter { filter, regex }
            })
            .collect()
    }

    fn passes_filters<T: Record>(
        &self,
        compiled: &[CompiledFilter<'_>],
        record: &T,
        columns: &[Column<T>],
    ) -> bool {
        let mut any_or = false;
        let mut or_passed = false;
        for c in compiled {
            let value = cell_value(record, columns, &c.filter.column_id);
            let passed = c.matches(&value);
            match c.filter.condition {
                FilterCondition::And => {
                    if !passed {
                        return false;
                    }
                }
                FilterCondition::Or => {
                    any_or = true;
                    or_passed = or_passed || passed;
                }
            }
        }
        !any_or || or_passed
    }

    fn passes_search<T: Record>(&self, term: &str, record: &T, columns: &[Column<T>]) -> bool {
        if term.is_empty() {
            return true;
        }
        match self.search.columns() {
            Some(subset) => subset.iter().any(|id| {
                cell_value(record, columns, id)
                    .display()
                    .to_lowercase()
                    .contains(term)
            }),
            None => columns.iter().any(|col| {
                col.value_for(record)
                    .display()
                    .to_lowercase()
                    .contains(term)
            }),
        }
    }

    // -------------------------------------------------------------------------
    // Presets
    // -------------------------------------------------------------------------

    /// Snapshot the current filters and search term under a name. Saving
    /// an existing name replaces that preset (fresh timestamp, default
    /// flag preserved).
    pub fn save_preset(&mut self, name: &str) {
        let was_default = self
            .presets
            .iter()
            .find(|p| p.name == name)
            .is_some_and(|p| p.is_default);
        let preset = FilterPreset {
            name: name.to_string(),
            filters: self.filters.clone(),
            global_search_term: self.search.term().to_string(),
            created_at: Utc::now(),
            is_default: was_default,
        };
        self.presets.retain(|p| p.name != name);
        self.presets.push(preset);
    }

    /// Replace current filters and search term with a preset's. Returns
    /// false (and changes nothing) for an unknown name.
    pub fn load_preset(&mut self, name: &str) -> bool {
        let Some(preset) = self.presets.iter().find(|p| p.name == name).cloned() else {
            return false;
        };
        self.filters = preset.filters;
        self.search.apply_term(&preset.global_search_term);
        true
    }

    pub fn delete_preset(&mut self, name: &str) -> bool {
        let before = self.presets.len();
        self.presets.retain(|p| p.name != name);
        self.presets.len() != before
    }

    /// Flag one preset as the default, unflagging all others.
    pub fn set_default_preset(&mut self, name: &str) -> bool {
        if !self.presets.iter().any(|p| p.name == name) {
            return false;
        }
        for p in &mut self.presets {
            p.is_default = p.name == name;
        }
        true
    }

    pub fn default_preset(&self) -> Option<&FilterPreset> {
        self.presets.iter().find(|p| p.is_default)
    }

    pub fn presets(&self) -> &[FilterPreset] {
        &self.presets
    }

    // -------------------------------------------------------------------------
    // Suggestions
    // -------------------------------------------------------------------------

    /// Value-frequency suggestions for a column (see
    /// [`value_suggestions`]).
    pub fn suggestions<T: Record>(
        &self,
        records: &[T],
        columns: &[Column<T>],
        column_id: &str,
        query: Option<&str>,
        limit: usize,
    ) -> Vec<ValueSuggestion> {
        value_suggestions(records, columns, column_id, query, limit)
    }

    // -------------------------------------------------------------------------
    // Snapshots
    // -------------------------------------------------------------------------

    /// Serialize `{filters, globalSearchTerm, presets}`.
    pub fn export_state(&self) -> String {
        let snap = SmartFilterSnapshot {
            filters: Some(self.filters.clone()),
            global_search_term: Some(self.search.term().to_string()),
            presets: Some(self.presets.clone()),
        };
        serde_json::to_string(&snap).unwrap_or_else(|e| {
            log::warn!("failed to serialize smart filter snapshot: {e}");
            "{}".to_string()
        })
    }

    /// Restore from a snapshot; malformed input is logged and ignored.
    pub fn import_state(&mut self, json: &str) {
        if let Err(e) = self.try_import_state(json) {
            log::warn!("ignoring malformed smart filter snapshot: {e}");
        }
    }

    /// Like [`import_state`] but surfaces the parse error.
    ///
    /// [`import_state`]: SmartFilterEngine::import_state
    pub fn try_import_state(&mut self, json: &str) -> Result<()> {
        let snap: SmartFilterSnapshot = serde_json::from_str(json)?;
        if let Some(filters) = snap.filters {
            self.filters = filters;
        }
        if let Some(term) = snap.global_search_term {
            self.search.apply_term(&term);
        }
        if let Some(presets) = snap.presets {
            self.presets = presets;
        }
        Ok(())
    }
}

/// Serializable smart filter state.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct SmartFilterSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<AdvancedFilter>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_search_term: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presets: Option<Vec<FilterPreset>>,
}

struct CompiledFilter<'a> {
    filter: &'a AdvancedFilter,
    regex: Option<regex::Regex>,
}

impl CompiledFilter<'_> {
    fn matches(&self, value: &CellValue) -> bool {
        let f = self.filter;
        match f.operator {
            // Emptiness checks bypass the null short-circuit below.
            FilterOperator::IsEmpty => value.is_empty(),
            FilterOperator::IsNotEmpty => !value.is_empty(),
            _ if matches!(value, CellValue::Null) => false,
            FilterOperator::Equals => text_equals(value, &f.value, f.case_sensitive),
            FilterOperator::Contains => {
                let (a, b) = text_pair(value, &f.value, f.case_sensitive);
                a.contains(&b)
            }
            FilterOperator::StartsWith => {
                let (a, b) = text_pair(value, &f.value, f.case_sensitive);
                a.starts_with(&b)
            }
            FilterOperator::EndsWith => {
                let (a, b) = text_pair(value, &f.value, f.case_sensitive);
                a.ends_with(&b)
            }
            FilterOperator::GreaterThan => {
                numeric_pair(value, &f.value).is_some_and(|(a, b)| a > b)
            }
            FilterOperator::LessThan => numeric_pair(value, &f.value).is_some_and(|(a, b)| a < b),
            FilterOperator::Between => {
                let Some(upper) = &f.value2 else {
                    return false;
                };
                let lower = numeric_pair(value, &f.value);
                let upper = numeric_pair(value, upper);
                match (lower, upper) {
                    (Some((v, lo)), Some((_, hi))) => v >= lo && v <= hi,
                    _ => false,
                }
            }
            FilterOperator::In => membership(value, &f.value, f.case_sensitive),
            FilterOperator::NotIn => !membership(value, &f.value, f.case_sensitive),
            FilterOperator::Regex => self
                .regex
                .as_ref()
                .is_some_and(|re| re.is_match(&value.display())),
        }
    }
}

fn text_pair(cell: &CellValue, filter: &CellValue, case_sensitive: bool) -> (String, String) {
    if case_sensitive {
        (cell.display(), filter.display())
    } else {
        (
            cell.display().to_lowercase(),
            filter.display().to_lowercase(),
        )
    }
}

fn text_equals(cell: &CellValue, filter: &CellValue, case_sensitive: bool) -> bool {
    let (a, b) = text_pair(cell, filter, case_sensitive);
    a == b
}

fn numeric_pair(cell: &CellValue, filter: &CellValue) -> Option<(f64, f64)> {
    Some((cell.as_number()?, filter.as_number()?))
}

/// Membership against a `List` filter value, each element compared via the
/// equals rule. A non-list filter value degrades to a single-element check.
fn membership(cell: &CellValue, filter: &CellValue, case_sensitive: bool) -> bool {
    match filter {
        CellValue::List(items) => items
            .iter()
            .any(|item| text_equals(cell, item, case_sensitive)),
        other => text_equals(cell, other, case_sensitive),
    }
}

fn cell_value<T: Record>(record: &T, columns: &[Column<T>], column_id: &str) -> CellValue {
    match columns.iter().find(|c| c.id == column_id) {
        Some(col) => col.value_for(record),
        None => record.field(column_id),
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

    fn eval(filter: AdvancedFilter, value: CellValue) -> bool {
        let mut engine = SmartFilterEngine::new();
        engine.set_filter(filter);
        let compiled = engine.compile();
        compiled[0].matches(&value)
    }

    #[test_case(10.0, 5.0, 15.0, true; "inside range")]
    #[test_case(5.0, 5.0, 15.0, true; "lower bound inclusive")]
    #[test_case(15.0, 5.0, 15.0, true; "upper bound inclusive")]
    #[test_case(16.0, 5.0, 15.0, false; "above range")]
    fn test_between(value: f64, lo: f64, hi: f64, expected: bool) {
        let f = AdvancedFilter::new("n", FilterOperator::Between, lo).value2(hi);
        assert_eq!(eval(f, CellValue::Number(value)), expected);
    }

    #[test]
    fn test_between_without_upper_bound_is_false() {
        let f = AdvancedFilter::new("n", FilterOperator::Between, 5.0);
        assert!(!eval(f, CellValue::Number(10.0)));
    }

    #[test]
    fn test_in_and_not_in() {
        let list: CellValue = vec!["red", "blue"].into();
        let f = AdvancedFilter::new("c", FilterOperator::In, list.clone());
        assert!(eval(f.clone(), CellValue::from("RED")));
        assert!(!eval(f, CellValue::from("green")));

        let f = AdvancedFilter::new("c", FilterOperator::NotIn, list);
        assert!(eval(f.clone(), CellValue::from("green")));
        assert!(!eval(f, CellValue::from("blue")));
    }

    #[test]
    fn test_is_empty_sees_null() {
        let f = AdvancedFilter::new("c", FilterOperator::IsEmpty, CellValue::Null);
        assert!(eval(f.clone(), CellValue::Null));
        assert!(eval(f.clone(), CellValue::Text(String::new())));
        assert!(eval(f.clone(), CellValue::List(Vec::new())));
        assert!(!eval(f, CellValue::from("x")));

        let f = AdvancedFilter::new("c", FilterOperator::IsNotEmpty, CellValue::Null);
        assert!(eval(f, CellValue::from("x")));
    }

    #[test]
    fn test_regex_case_modes() {
        let f = AdvancedFilter::new("c", FilterOperator::Regex, "^ada");
        assert!(eval(f, CellValue::from("Ada Lovelace")));

        let f = AdvancedFilter::new("c", FilterOperator::Regex, "^ada").case_sensitive(true);
        assert!(!eval(f, CellValue::from("Ada Lovelace")));
    }

    #[test]
    fn test_invalid_regex_rejects_all_rows() {
        let f = AdvancedFilter::new("c", FilterOperator::Regex, "([unclosed");
        assert!(!eval(f, CellValue::from("anything")));
    }
}
