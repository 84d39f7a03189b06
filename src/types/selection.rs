use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::record::RowKey;

/// Selection mode for the grid.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// No selection allowed.
    #[default]
    None,
    /// At most one row selected.
    Single,
    /// Any number of rows selected.
    Multiple,
}

/// Tracks selected rows by key.
///
/// `select_all` is true iff every key of the full unfiltered row set is
/// selected (and the set is non-empty); `indeterminate` is true iff the
/// selection is non-empty but not `select_all`. Both are recomputed by the
/// engine after every selection mutation.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    pub mode: SelectionMode,
    pub selected: HashSet<RowKey>,
    pub select_all: bool,
    pub indeterminate: bool,
}

impl SelectionState {
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Apply one select/deselect per the mode's semantics. Returns true if
    /// the set changed. `None` mode never changes anything.
    pub fn set(&mut self, key: RowKey, selected: bool) -> bool {
        match self.mode {
            SelectionMode::None => false,
            SelectionMode::Single => {
                if selected {
                    let already = self.selected.len() == 1 && self.selected.contains(&key);
                    self.selected.clear();
                    self.selected.insert(key);
                    !already
                } else {
                    self.selected.remove(&key)
                }
            }
            SelectionMode::Multiple => {
                if selected {
                    self.selected.insert(key)
                } else {
                    self.selected.remove(&key)
                }
            }
        }
    }

    pub fn is_selected(&self, key: &RowKey) -> bool {
        self.selected.contains(key)
    }

    pub fn clear(&mut self) {
        self.selected.clear();
        self.select_all = false;
        self.indeterminate = false;
    }

    /// Recompute `select_all`/`indeterminate` against the full key set.
    pub fn recompute_flags<'a>(&mut self, all_keys: impl Iterator<Item = &'a RowKey>) {
        let mut any = false;
        let mut all = true;
        for key in all_keys {
            any = true;
            if !self.selected.contains(key) {
                all = false;
                break;
            }
        }
        self.select_all = any && all;
        self.indeterminate = !self.selected.is_empty() && !self.select_all;
    }

    /// Keys in deterministic order, for snapshots and tests.
    pub fn sorted_keys(&self) -> Vec<RowKey> {
        let mut keys: Vec<RowKey> = self.selected.iter().cloned().collect();
        keys.sort();
        keys
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
    fn test_none_mode_is_inert() {
        let mut s = SelectionState::new(SelectionMode::None);
        assert!(!s.set(RowKey::Int(1), true));
        assert!(s.selected.is_empty());
    }

    #[test]
    fn test_single_mode_replaces() {
        let mut s = SelectionState::new(SelectionMode::Single);
        s.set(RowKey::Int(1), true);
        s.set(RowKey::Int(2), true);
        assert_eq!(s.sorted_keys(), vec![RowKey::Int(2)]);
        s.set(RowKey::Int(2), false);
        assert!(s.selected.is_empty());
    }

    #[test]
    fn test_multiple_mode_accumulates() {
        let mut s = SelectionState::new(SelectionMode::Multiple);
        s.set(RowKey::Int(1), true);
        s.set(RowKey::Int(2), true);
        assert_eq!(s.selected.len(), 2);
        s.set(RowKey::Int(1), false);
        assert_eq!(s.sorted_keys(), vec![RowKey::Int(2)]);
    }

    #[test]
    fn test_flag_recompute() {
        let keys = vec![RowKey::Int(1), RowKey::Int(2)];
        let mut s = SelectionState::new(SelectionMode::Multiple);

        s.recompute_flags(keys.iter());
        assert!(!s.select_all);
        assert!(!s.indeterminate);

        s.set(RowKey::Int(1), true);
        s.recompute_flags(keys.iter());
        assert!(!s.select_all);
        assert!(s.indeterminate);

        s.set(RowKey::Int(2), true);
        s.recompute_flags(keys.iter());
        assert!(s.select_all);
        assert!(!s.indeterminate);
    }

    #[test]
    fn test_empty_row_set_is_never_select_all() {
        let mut s = SelectionState::new(SelectionMode::Multiple);
        s.recompute_flags(std::iter::empty());
        assert!(!s.select_all);
    }
}
