//! Named filter presets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::AdvancedFilter;

/// A named, timestamped snapshot of the smart filter configuration.
///
/// Presets persist until explicitly deleted; at most one carries the
/// default flag at a time.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FilterPreset {
    pub name: String,
    pub filters: Vec<AdvancedFilter>,
    #[serde(default)]
    pub global_search_term: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub is_default: bool,
}
