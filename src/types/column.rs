use std::cmp::Ordering;
use std::sync::Arc;

use crate::record::Record;
use crate::value::CellValue;

/// Custom comparator override for a column: `(a, b) -> Ordering` over cell
/// values, before the sort direction is applied.
pub type SortCompareFn = Arc<dyn Fn(&CellValue, &CellValue) -> Ordering + Send + Sync>;

/// Custom predicate override for a column: `(cell value, filter value) ->
/// keep?`. When present it is used exclusively — the default operator
/// semantics are skipped for that column.
pub type FilterPredicateFn = Arc<dyn Fn(&CellValue, &CellValue) -> bool + Send + Sync>;

/// How a column derives its cell value from a record.
pub enum Accessor<T> {
    /// Read the named field off the record.
    Field(String),
    /// Compute the value with a function. Takes precedence over field
    /// access wherever both could apply.
    Derived(Arc<dyn Fn(&T) -> CellValue + Send + Sync>),
}

impl<T> Clone for Accessor<T> {
    fn clone(&self) -> Self {
        match self {
            Accessor::Field(name) => Accessor::Field(name.clone()),
            Accessor::Derived(f) => Accessor::Derived(Arc::clone(f)),
        }
    }
}

impl<T> std::fmt::Debug for Accessor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Accessor::Field(name) => f.debug_tuple("Field").field(name).finish(),
            Accessor::Derived(_) => f.write_str("Derived(..)"),
        }
    }
}

/// A column definition: one data dimension of the grid.
///
/// The `id` uniquely identifies the dimension; when no accessor is given,
/// the cell value is the record field named `id`.
pub struct Column<T> {
    pub id: String,
    pub header: String,
    pub accessor: Option<Accessor<T>>,
    /// Comparator override; `None` uses the default typed comparison.
    pub sort_compare: Option<SortCompareFn>,
    /// Predicate override; `None` uses the default operator semantics.
    pub filter_predicate: Option<FilterPredicateFn>,
    pub sortable: bool,
    pub filterable: bool,
    /// Per-column hidden flag (the column manager keeps its own hidden set
    /// on top of this).
    pub hidden: bool,
    /// Preferred width in pixels, if the caller has one.
    pub width: Option<f32>,
}

impl<T> Column<T> {
    /// A sortable, filterable, visible column whose header is its id.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            header: id.clone(),
            id,
            accessor: None,
            sort_compare: None,
            filter_predicate: None,
            sortable: true,
            filterable: true,
            hidden: false,
            width: None,
        }
    }

    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    /// Read the cell value from the named field instead of the id field.
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.accessor = Some(Accessor::Field(name.into()));
        self
    }

    /// Derive the cell value with a function.
    pub fn derived(mut self, f: impl Fn(&T) -> CellValue + Send + Sync + 'static) -> Self {
        self.accessor = Some(Accessor::Derived(Arc::new(f)));
        self
    }

    pub fn sort_with(
        mut self,
        f: impl Fn(&CellValue, &CellValue) -> Ordering + Send + Sync + 'static,
    ) -> Self {
        self.sort_compare = Some(Arc::new(f));
        self
    }

    pub fn filter_with(
        mut self,
        f: impl Fn(&CellValue, &CellValue) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.filter_predicate = Some(Arc::new(f));
        self
    }

    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    pub fn filterable(mut self, filterable: bool) -> Self {
        self.filterable = filterable;
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }
}

impl<T: Record> Column<T> {
    /// Resolve this column's cell value for a record.
    pub fn value_for(&self, record: &T) -> CellValue {
        match &self.accessor {
            Some(Accessor::Derived(f)) => f(record),
            Some(Accessor::Field(name)) => record.field(name),
            None => record.field(&self.id),
        }
    }
}

impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            header: self.header.clone(),
            accessor: self.accessor.clone(),
            sort_compare: self.sort_compare.clone(),
            filter_predicate: self.filter_predicate.clone(),
            sortable: self.sortable,
            filterable: self.filterable,
            hidden: self.hidden,
            width: self.width,
        }
    }
}

impl<T> std::fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Column")
            .field("id", &self.id)
            .field("header", &self.header)
            .field("accessor", &self.accessor)
            .field("sortable", &self.sortable)
            .field("filterable", &self.filterable)
            .field("hidden", &self.hidden)
            .field("width", &self.width)
            .finish_non_exhaustive()
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
    use serde_json::json;

    #[test]
    fn test_default_accessor_reads_id_field() {
        let col: Column<serde_json::Value> = Column::new("name");
        let record = json!({"name": "Ada"});
        assert_eq!(col.value_for(&record), CellValue::Text("Ada".into()));
    }

    #[test]
    fn test_derived_accessor_wins() {
        let col: Column<serde_json::Value> = Column::new("name")
            .field("ignored")
            .derived(|r: &serde_json::Value| CellValue::Text(format!("{}!", r.field("name").display())));
        let record = json!({"name": "Ada", "ignored": "x"});
        assert_eq!(col.value_for(&record), CellValue::Text("Ada!".into()));
    }
}
