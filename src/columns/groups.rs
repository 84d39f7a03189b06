//! Column grouping metadata.

use serde::{Deserialize, Serialize};

/// A named group of columns, rendered as one header bucket.
///
/// Groups are pure metadata: membership never affects the pipeline, only
/// how headers are partitioned for rendering.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ColumnGroup {
    pub id: String,
    pub header: String,
    /// Member column ids. A column claimed by an earlier group is not
    /// claimed again by a later one.
    pub children: Vec<String>,
    #[serde(default = "expanded_default")]
    pub expanded: bool,
}

fn expanded_default() -> bool {
    true
}

impl ColumnGroup {
    pub fn new(id: impl Into<String>, header: impl Into<String>, children: Vec<String>) -> Self {
        Self {
            id: id.into(),
            header: header.into(),
            children,
            expanded: true,
        }
    }
}
