//! Structured error types for gridstate.
//!
//! Invalid UI-driven input (out-of-range pages, unknown columns in a move)
//! is deliberately NOT an error anywhere in the crate — those calls are
//! silent no-ops. Errors are reserved for snapshot (de)serialization and
//! data-source collaborators.

/// All errors that can occur in gridstate operations.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// State snapshot could not be parsed or produced.
    #[error("Snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// An operation referenced a column id that does not exist.
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// A data source does not implement an optional operation.
    #[error("Unsupported data source operation: {0}")]
    Unsupported(&'static str),

    /// A data source failed to load.
    #[error("Data source: {0}")]
    Source(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;
