use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::value::CellValue;

/// Filter operators, basic and extended.
///
/// The basic set (`Equals` through `LessThan`) is what the engine's
/// per-column filters use; the extended set is evaluated by the smart
/// filter engine. Operators round-trip as camelCase strings; an unknown
/// string deserializes as `Contains`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterOperator {
    Equals,
    #[default]
    Contains,
    StartsWith,
    EndsWith,
    GreaterThan,
    LessThan,
    /// Inclusive numeric range; the upper bound lives in `value2`.
    Between,
    /// Membership against a `List` value, each element via the equals rule.
    In,
    NotIn,
    IsEmpty,
    IsNotEmpty,
    Regex,
}

impl FilterOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            FilterOperator::Equals => "equals",
            FilterOperator::Contains => "contains",
            FilterOperator::StartsWith => "startsWith",
            FilterOperator::EndsWith => "endsWith",
            FilterOperator::GreaterThan => "greaterThan",
            FilterOperator::LessThan => "lessThan",
            FilterOperator::Between => "between",
            FilterOperator::In => "in",
            FilterOperator::NotIn => "notIn",
            FilterOperator::IsEmpty => "isEmpty",
            FilterOperator::IsNotEmpty => "isNotEmpty",
            FilterOperator::Regex => "regex",
        }
    }

    /// Unknown names fall back to `Contains`.
    pub fn parse(name: &str) -> Self {
        match name {
            "equals" => FilterOperator::Equals,
            "startsWith" => FilterOperator::StartsWith,
            "endsWith" => FilterOperator::EndsWith,
            "greaterThan" => FilterOperator::GreaterThan,
            "lessThan" => FilterOperator::LessThan,
            "between" => FilterOperator::Between,
            "in" => FilterOperator::In,
            "notIn" => FilterOperator::NotIn,
            "isEmpty" => FilterOperator::IsEmpty,
            "isNotEmpty" => FilterOperator::IsNotEmpty,
            "regex" => FilterOperator::Regex,
            _ => FilterOperator::Contains,
        }
    }
}

impl Serialize for FilterOperator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FilterOperator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(FilterOperator::parse(&name))
    }
}

/// How an advanced filter combines with the others on the row.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FilterCondition {
    /// Must pass (default).
    #[default]
    And,
    /// At least one `Or` filter must pass, when any exist.
    Or,
}

/// A basic per-column filter. One active filter per column: setting a new
/// one replaces the old, an empty value removes it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    pub column_id: String,
    pub value: CellValue,
    #[serde(default)]
    pub operator: FilterOperator,
}

impl FilterSpec {
    pub fn new(column_id: impl Into<String>, value: impl Into<CellValue>, operator: FilterOperator) -> Self {
        Self {
            column_id: column_id.into(),
            value: value.into(),
            operator,
        }
    }
}

/// A smart filter condition; multiple per column are allowed, keyed by
/// `(column_id, operator)` for replace semantics.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedFilter {
    pub column_id: String,
    #[serde(default)]
    pub operator: FilterOperator,
    #[serde(default = "null_value")]
    pub value: CellValue,
    /// Upper bound for `Between`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value2: Option<CellValue>,
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(default)]
    pub condition: FilterCondition,
}

fn null_value() -> CellValue {
    CellValue::Null
}

impl AdvancedFilter {
    pub fn new(
        column_id: impl Into<String>,
        operator: FilterOperator,
        value: impl Into<CellValue>,
    ) -> Self {
        Self {
            column_id: column_id.into(),
            operator,
            value: value.into(),
            value2: None,
            case_sensitive: false,
            condition: FilterCondition::And,
        }
    }

    pub fn value2(mut self, value: impl Into<CellValue>) -> Self {
        self.value2 = Some(value.into());
        self
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn or(mut self) -> Self {
        self.condition = FilterCondition::Or;
        self
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
    fn test_operator_string_roundtrip() {
        for op in [
            FilterOperator::Equals,
            FilterOperator::Contains,
            FilterOperator::StartsWith,
            FilterOperator::EndsWith,
            FilterOperator::GreaterThan,
            FilterOperator::LessThan,
            FilterOperator::Between,
            FilterOperator::In,
            FilterOperator::NotIn,
            FilterOperator::IsEmpty,
            FilterOperator::IsNotEmpty,
            FilterOperator::Regex,
        ] {
            assert_eq!(FilterOperator::parse(op.as_str()), op);
        }
    }

    #[test]
    fn test_unknown_operator_defaults_to_contains() {
        assert_eq!(FilterOperator::parse("fuzzyish"), FilterOperator::Contains);
        let spec: FilterSpec =
            serde_json::from_str(r#"{"columnId":"a","value":"x","operator":"nope"}"#).unwrap();
        assert_eq!(spec.operator, FilterOperator::Contains);
    }

    #[test]
    fn test_advanced_filter_defaults() {
        let f: AdvancedFilter =
            serde_json::from_str(r#"{"columnId":"age","operator":"between","value":1}"#).unwrap();
        assert_eq!(f.condition, FilterCondition::And);
        assert!(!f.case_sensitive);
        assert_eq!(f.value2, None);
    }
}
