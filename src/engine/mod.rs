//! The grid state engine — the primary entry point of the crate.
//!
//! `GridEngine` owns the record collection, column definitions, and all
//! view state (sort, filters, pagination, selection), and keeps the
//! processed-rows derivation consistent across mutations:
//!
//! - every mutation recomputes the pipeline (filter → sort → paginate)
//!   synchronously before returning, so reads never observe stale state
//! - a revision counter is the memo key: derived views are plain field
//!   reads until the next mutation
//! - invalid UI-driven input (out-of-range page, unknown column) is a
//!   silent no-op, not an error

mod pipeline;
mod snapshot;

pub use snapshot::{GridSnapshot, PaginationSnapshot, SelectionSnapshot};

use std::collections::HashSet;

use crate::compare::sort_rows;
use crate::error::Result;
use crate::record::{resolve_key, Record, RowKey};
use crate::source::{DataSourceParams, StateStore};
use crate::types::{
    Column, FilterOperator, FilterSpec, Pagination, Row, SelectionMode, SelectionState,
    SortDirection, SortKey,
};
use crate::value::CellValue;

/// Engine configuration, applied at `initialize`.
#[derive(Clone)]
pub struct GridOptions {
    pub sortable: bool,
    pub filterable: bool,
    pub paginate: bool,
    /// Multi-column sort with tie-break chaining; off means the sort list
    /// never holds more than one entry.
    pub multi_sort: bool,
    pub page_size: usize,
    pub selection_mode: SelectionMode,
    pub default_sort: Vec<SortKey>,
    pub default_filters: Vec<FilterSpec>,
    /// When set and a store is attached, `initialize` restores the
    /// persisted snapshot under this key and `persist` writes it back.
    pub persist_key: Option<String>,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            sortable: true,
            filterable: true,
            paginate: true,
            multi_sort: false,
            page_size: 10,
            selection_mode: SelectionMode::None,
            default_sort: Vec::new(),
            default_filters: Vec::new(),
            persist_key: None,
        }
    }
}

/// The grid state engine. One instance per grid; instances share nothing.
pub struct GridEngine<T> {
    records: Vec<T>,
    columns: Vec<Column<T>>,
    options: GridOptions,
    sort: Vec<SortKey>,
    filters: Vec<FilterSpec>,
    pagination: Pagination,
    selection: SelectionState,
    expanded: HashSet<RowKey>,
    disabled: HashSet<RowKey>,
    all_rows: Vec<Row<T>>,
    processed: Vec<Row<T>>,
    revision: u64,
    store: Option<Box<dyn StateStore>>,
}

impl<T: Record + Clone> Default for GridEngine<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record + Clone> GridEngine<T> {
    /// An empty engine with default options. Call [`initialize`] to load
    /// data.
    ///
    /// [`initialize`]: GridEngine::initialize
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            columns: Vec::new(),
            options: GridOptions::default(),
            sort: Vec::new(),
            filters: Vec::new(),
            pagination: Pagination::default(),
            selection: SelectionState::default(),
            expanded: HashSet::new(),
            disabled: HashSet::new(),
            all_rows: Vec::new(),
            processed: Vec::new(),
            revision: 0,
            store: None,
        }
    }

    /// Attach a snapshot store for `persist_key` handling.
    pub fn with_store(mut self, store: impl StateStore + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    /// Replace all state: records, columns, options, and view state from
    /// the options' defaults. Restores a persisted snapshot when a store
    /// is attached and `options.persist_key` is set.
    pub fn initialize(&mut self, records: Vec<T>, columns: Vec<Column<T>>, options: GridOptions) {
        self.records = records;
        self.columns = columns;
        self.sort = if options.multi_sort {
            options.default_sort.clone()
        } else {
            options.default_sort.iter().take(1).cloned().collect()
        };
        self.filters = options.default_filters.clone();
        self.pagination = Pagination::new(options.page_size);
        self.selection = SelectionState::new(options.selection_mode);
        self.expanded.clear();
        self.disabled.clear();
        self.options = options;
        self.recompute();

        let persisted = match (&self.store, &self.options.persist_key) {
            (Some(store), Some(key)) => store.load(key),
            _ => None,
        };
        if let Some(snapshot) = persisted {
            self.import_state(&snapshot);
        }
    }

    /// Restore the options' default view state, keeping records and
    /// columns.
    pub fn reset(&mut self) {
        self.sort = if self.options.multi_sort {
            self.options.default_sort.clone()
        } else {
            self.options.default_sort.iter().take(1).cloned().collect()
        };
        self.filters = self.options.default_filters.clone();
        self.pagination = Pagination::new(self.options.page_size);
        self.selection = SelectionState::new(self.options.selection_mode);
        self.expanded.clear();
        self.disabled.clear();
        self.recompute();
    }

    /// Replace the record collection, keeping view state.
    pub fn set_records(&mut self, records: Vec<T>) {
        self.records = records;
        self.recompute();
    }

    /// Replace the column definitions, keeping view state.
    pub fn set_columns(&mut self, columns: Vec<Column<T>>) {
        self.columns = columns;
        self.recompute();
    }

    // -------------------------------------------------------------------------
    // Sorting
    // -------------------------------------------------------------------------

    /// Sort by a column. With `direction` omitted: an unsorted column
    /// starts ascending, a sorted one toggles. In multi-sort mode an
    /// existing entry updates in place (keeping its tie-break position) and
    /// a new column appends; in single-sort mode the list is replaced.
    /// No-op when sorting is disabled or the column is not sortable.
    pub fn sort_by(&mut self, column_id: &str, direction: Option<SortDirection>) {
        if !self.options.sortable {
            return;
        }
        if !self
            .columns
            .iter()
            .any(|c| c.id == column_id && c.sortable)
        {
            return;
        }

        let existing = self.sort.iter().position(|k| k.column_id == column_id);
        let direction = direction.unwrap_or_else(|| match existing {
            Some(i) => self
                .sort
                .get(i)
                .map(|k| k.direction.toggled())
                .unwrap_or_default(),
            None => SortDirection::Ascending,
        });
        let entry = SortKey {
            column_id: column_id.to_string(),
            direction,
        };

        if self.options.multi_sort {
            match existing {
                Some(i) => {
                    if let Some(slot) = self.sort.get_mut(i) {
                        *slot = entry;
                    }
                }
                None => self.sort.push(entry),
            }
        } else {
            self.sort = vec![entry];
        }
        self.recompute();
    }

    /// Drop one column's sort entry, or all entries when `column_id` is
    /// omitted.
    pub fn clear_sort(&mut self, column_id: Option<&str>) {
        match column_id {
            Some(id) => self.sort.retain(|k| k.column_id != id),
            None => self.sort.clear(),
        }
        self.recompute();
    }

    // -------------------------------------------------------------------------
    // Filtering
    // -------------------------------------------------------------------------

    /// Set the filter for a column, replacing any previous one. An empty
    /// value removes the column's filter. Every filter change resets to
    /// page 1. No-op when filtering is disabled.
    pub fn set_filter(&mut self, column_id: &str, value: impl Into<CellValue>, operator: FilterOperator) {
        if !self.options.filterable {
            return;
        }
        let value = value.into();
        self.filters.retain(|f| f.column_id != column_id);
        if !value.is_empty() {
            self.filters.push(FilterSpec {
                column_id: column_id.to_string(),
                value,
                operator,
            });
        }
        self.pagination.current_page = 1;
        self.recompute();
    }

    /// Remove all filters and return to page 1.
    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.pagination.current_page = 1;
        self.recompute();
    }

    // -------------------------------------------------------------------------
    // Pagination
    // -------------------------------------------------------------------------

    /// Go to a page. Ignored unless `1 <= page <= total_pages` — a stale
    /// pager button is a race, not an error.
    pub fn set_page(&mut self, page: usize) {
        if page >= 1 && page <= self.pagination.total_pages {
            self.pagination.current_page = page;
            self.recompute();
        }
    }

    /// Change the page size and return to page 1. Zero is ignored.
    pub fn set_page_size(&mut self, size: usize) {
        if size == 0 {
            return;
        }
        self.pagination.page_size = size;
        self.pagination.current_page = 1;
        self.recompute();
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Select or deselect one row by key. `None` mode ignores the call;
    /// `Single` mode replaces the selection; `Multiple` mode adds/removes.
    pub fn select_row(&mut self, key: RowKey, selected: bool) {
        if self.selection.set(key, selected) {
            self.recompute();
        }
    }

    /// Flip one row's selection.
    pub fn toggle_row(&mut self, key: RowKey) {
        let selected = !self.selection.is_selected(&key);
        self.select_row(key, selected);
    }

    /// Select or clear every row. Only meaningful in `Multiple` mode.
    pub fn select_all_rows(&mut self, selected: bool) {
        if self.selection.mode != SelectionMode::Multiple {
            return;
        }
        if selected {
            for row in &self.all_rows {
                self.selection.selected.insert(row.key.clone());
            }
        } else {
            self.selection.selected.clear();
        }
        self.recompute();
    }

    /// Mark a row expanded/collapsed (transient UI flag).
    pub fn set_row_expanded(&mut self, key: RowKey, expanded: bool) {
        let changed = if expanded {
            self.expanded.insert(key)
        } else {
            self.expanded.remove(&key)
        };
        if changed {
            self.recompute();
        }
    }

    /// Mark a row disabled (transient UI flag).
    pub fn set_row_disabled(&mut self, key: RowKey, disabled: bool) {
        let changed = if disabled {
            self.disabled.insert(key)
        } else {
            self.disabled.remove(&key)
        };
        if changed {
            self.recompute();
        }
    }

    // -------------------------------------------------------------------------
    // Derived views
    // -------------------------------------------------------------------------

    /// The filter → sort → paginate result.
    pub fn processed_rows(&self) -> &[Row<T>] {
        &self.processed
    }

    /// All rows with identity and flags, unfiltered and unsorted.
    pub fn all_rows(&self) -> &[Row<T>] {
        &self.all_rows
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn columns(&self) -> &[Column<T>] {
        &self.columns
    }

    pub fn sort_spec(&self) -> &[SortKey] {
        &self.sort
    }

    pub fn filters(&self) -> &[FilterSpec] {
        &self.filters
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    /// Bumped on every recomputation; equal revisions mean identical
    /// derived views.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Current view parameters in the shape a [`crate::source::DataSource`]
    /// consumes.
    pub fn data_source_params(&self) -> DataSourceParams {
        DataSourceParams {
            page: self.options.paginate.then_some(self.pagination.current_page),
            page_size: self.options.paginate.then_some(self.pagination.page_size),
            sort: self.sort.clone(),
            filters: self.filters.clone(),
            search: None,
            columns: self.columns.iter().map(|c| c.id.clone()).collect(),
        }
    }

    // -------------------------------------------------------------------------
    // Recomputation
    // -------------------------------------------------------------------------

    /// Force a full pipeline recomputation without changing inputs. Needed
    /// when record contents were mutated in place.
    pub fn refresh(&mut self) {
        self.recompute();
    }

    fn recompute(&mut self) {
        // Identity pass: keys re-resolved every time so they never go
        // stale against mutated records.
        self.all_rows = self
            .records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let key = resolve_key(record, index);
                let mut row = Row::new(record.clone(), key, index);
                row.selected = self.selection.is_selected(&row.key);
                row.expanded = self.expanded.contains(&row.key);
                row.disabled = self.disabled.contains(&row.key);
                row
            })
            .collect();

        let filtered = pipeline::apply_filters(&self.all_rows, &self.filters, &self.columns);
        let sorted = sort_rows(filtered, &self.sort, &self.columns);
        self.pagination.set_total_items(sorted.len());
        self.processed = if self.options.paginate {
            pipeline::paginate(sorted, &self.pagination)
        } else {
            sorted
        };

        self.selection
            .recompute_flags(self.all_rows.iter().map(|r| &r.key));
        self.revision += 1;
        log::debug!(
            "recomputed pipeline: {} rows -> {} filtered -> {} on page {} (rev {})",
            self.all_rows.len(),
            self.pagination.total_items,
            self.processed.len(),
            self.pagination.current_page,
            self.revision
        );
    }

    // -------------------------------------------------------------------------
    // Snapshots
    // -------------------------------------------------------------------------

    fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            sort: Some(self.sort.clone()),
            filters: Some(self.filters.clone()),
            pagination: Some(PaginationSnapshot {
                current_page: self.pagination.current_page,
                page_size: self.pagination.page_size,
            }),
            selection: Some(SelectionSnapshot {
                mode: Some(self.selection.mode),
                selected: self.selection.sorted_keys(),
            }),
        }
    }

    /// Serialize `{sort, filters, pagination, selection}` — never raw data
    /// or columns.
    pub fn export_state(&self) -> String {
        serde_json::to_string(&self.snapshot()).unwrap_or_else(|e| {
            log::warn!("failed to serialize grid snapshot: {e}");
            "{}".to_string()
        })
    }

    /// Restore view state from a snapshot. A malformed snapshot is logged
    /// and leaves the state unchanged — the engine is never left partially
    /// updated.
    pub fn import_state(&mut self, json: &str) {
        if let Err(e) = self.try_import_state(json) {
            log::warn!("ignoring malformed grid snapshot: {e}");
        }
    }

    /// Like [`import_state`] but surfaces the parse error.
    ///
    /// [`import_state`]: GridEngine::import_state
    pub fn try_import_state(&mut self, json: &str) -> Result<()> {
        // Parse fully before touching any state so failure is atomic.
        let snap: GridSnapshot = serde_json::from_str(json)?;
        if let Some(sort) = snap.sort {
            self.sort = if self.options.multi_sort {
                sort
            } else {
                sort.into_iter().take(1).collect()
            };
        }
        if let Some(filters) = snap.filters {
            self.filters = filters;
        }
        if let Some(p) = snap.pagination {
            if p.page_size > 0 {
                self.pagination.page_size = p.page_size;
            }
            if p.current_page > 0 {
                self.pagination.current_page = p.current_page;
            }
        }
        if let Some(sel) = snap.selection {
            if let Some(mode) = sel.mode {
                self.selection.mode = mode;
            }
            self.selection.selected = sel.selected.into_iter().collect();
        }
        self.recompute();
        Ok(())
    }

    /// Write the current snapshot to the attached store under
    /// `options.persist_key`. No-op without both.
    pub fn persist(&self) {
        if let (Some(store), Some(key)) = (&self.store, &self.options.persist_key) {
            store.save(key, &self.export_state());
        }
    }
}

impl<T> std::fmt::Debug for GridEngine<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridEngine")
            .field("records", &self.records.len())
            .field("columns", &self.columns.len())
            .field("sort", &self.sort)
            .field("filters", &self.filters.len())
            .field("pagination", &self.pagination)
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}
