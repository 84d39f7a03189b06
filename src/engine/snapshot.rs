//! Serializable view-state snapshot for the grid engine.
//!
//! Exactly four top-level keys: `sort`, `filters`, `pagination`,
//! `selection`. Raw data and column definitions are never part of a
//! snapshot. On import, missing keys leave the corresponding state
//! untouched and unknown keys are ignored.

use serde::{Deserialize, Serialize};

use crate::record::RowKey;
use crate::types::{FilterSpec, SelectionMode, SortKey};

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct GridSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<Vec<SortKey>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<FilterSpec>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<SelectionSnapshot>,
}

/// Only the caller-driven half of pagination is persisted; totals are
/// derived on the next recomputation.
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
#[serde(rename_all = "camelCase")]
pub struct PaginationSnapshot {
    pub current_page: usize,
    pub page_size: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SelectionSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<SelectionMode>,
    /// Sorted on export so snapshots are byte-stable.
    #[serde(default)]
    pub selected: Vec<RowKey>,
}
