//! Narrow collaborator interfaces.
//!
//! The engine core never performs I/O itself. Remote loading and snapshot
//! persistence are delegated through these traits; both are optional.

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::record::RowKey;
use crate::types::{FilterSpec, SortKey};

/// View parameters handed to a data source when the caller wants the
/// source, rather than the engine, to apply them.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct DataSourceParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub sort: Vec<SortKey>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub filters: Vec<FilterSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub columns: Vec<String>,
}

/// What a data source returns for one load.
#[derive(Debug, Clone)]
pub struct DataSourceResult<T> {
    pub data: Vec<T>,
    /// Total matching records before pagination, for page math.
    pub total_count: usize,
}

/// A source of records. Mutation methods are optional; the defaults refuse.
pub trait DataSource<T> {
    fn load(&self, params: &DataSourceParams) -> Result<DataSourceResult<T>>;

    fn create(&self, _record: &T) -> Result<()> {
        Err(GridError::Unsupported("create"))
    }

    fn update(&self, _key: &RowKey, _record: &T) -> Result<()> {
        Err(GridError::Unsupported("update"))
    }

    fn delete(&self, _key: &RowKey) -> Result<()> {
        Err(GridError::Unsupported("delete"))
    }
}

/// Keyed snapshot persistence (localStorage-shaped).
///
/// `load` returning `None` means no snapshot; a malformed stored snapshot
/// surfaces later as an ignored import, never as a failed initialize.
pub trait StateStore {
    fn load(&self, key: &str) -> Option<String>;
    fn save(&self, key: &str, snapshot: &str);
}
