use crate::record::RowKey;

/// A record wrapped with derived identity, position, and transient UI flags.
///
/// Rows are rebuilt on every recomputation pass; the flags mirror engine
/// state (selection, expansion) at the time the pass ran and are read-only
/// for consumers.
#[derive(Debug, Clone)]
pub struct Row<T> {
    /// The application record.
    pub record: T,
    /// Stable identity, resolved per [`crate::record::resolve_key`].
    pub key: RowKey,
    /// Position in the unfiltered collection.
    pub index: usize,
    pub selected: bool,
    pub expanded: bool,
    pub disabled: bool,
}

impl<T> Row<T> {
    pub fn new(record: T, key: RowKey, index: usize) -> Self {
        Self {
            record,
            key,
            index,
            selected: false,
            expanded: false,
            disabled: false,
        }
    }
}
