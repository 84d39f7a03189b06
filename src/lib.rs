//! gridstate - data grid state engine
//!
//! Derives the visible slice of rows from an arbitrary record collection:
//! - Filter → sort → paginate pipeline, recomputed synchronously on every
//!   state mutation
//! - Smart filtering: AND/OR composition, extended operators, debounced
//!   global search, presets, value suggestions
//! - Column management: order, widths, visibility, locking, groups
//! - Virtualization window math (fixed and variable row heights)
//! - Zero UI-framework dependencies
//!
//! # Usage
//!
//! ```
//! use gridstate::{Column, FilterOperator, GridEngine, GridOptions, SortDirection};
//! use serde_json::json;
//!
//! let mut engine: GridEngine<serde_json::Value> = GridEngine::new();
//! engine.initialize(
//!     vec![
//!         json!({"id": 1, "name": "Ada", "age": 36}),
//!         json!({"id": 2, "name": "Alan", "age": 41}),
//!     ],
//!     vec![Column::new("name"), Column::new("age")],
//!     GridOptions::default(),
//! );
//! engine.sort_by("age", Some(SortDirection::Descending));
//! engine.set_filter("name", "a", FilterOperator::Contains);
//! assert_eq!(engine.processed_rows().len(), 2);
//! ```

// Shared primitives
pub mod compare;
pub mod error;
pub mod predicate;
pub mod record;
pub mod source;
pub mod types;
pub mod value;

// Subsystems
pub mod columns;
pub mod engine;
pub mod smart;
pub mod virtualized;

pub use columns::{ColumnEvent, ColumnGroup, ColumnManager, ColumnPartition, LockSide};
pub use engine::{GridEngine, GridOptions, GridSnapshot};
pub use error::{GridError, Result};
pub use record::{resolve_key, Record, RowKey};
pub use smart::{FilterPreset, SmartFilterEngine, ValueSuggestion};
pub use types::*;
pub use value::CellValue;
pub use virtualized::{VariableVirtualWindow, VirtualWindow, DEFAULT_OVERSCAN};

/// Get the library version
#[must_use]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
