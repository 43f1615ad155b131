//! Tabular rows and result sets.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::value::Value;

/// One row of a result set.
///
/// Cells are stored in column order; the column-name list is shared between
/// all rows of the same result set.
#[derive(Debug, Clone)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl Row {
    /// Create a row from a shared column list and ordered cell values.
    pub fn new(columns: Arc<[String]>, values: Vec<Value>) -> Self {
        Self { columns, values }
    }

    /// Number of cells in the row.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the row has no cells.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Cell at a zero-based column position, `None` if out of range.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Cell by column name, `None` if the result set has no such column.
    pub fn value(&self, column: &str) -> Option<&Value> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.values.get(idx)
    }

    /// All cells in column order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Column names shared by the result set this row came from.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Decode the cell at `index` as `i64`.
    pub fn i64_at(&self, index: usize) -> Result<i64> {
        self.cell(index)?.as_i64()
    }

    /// Borrow the cell at `index` as `&str`.
    pub fn str_at(&self, index: usize) -> Result<&str> {
        self.cell(index)?.as_str()
    }

    fn cell(&self, index: usize) -> Result<&Value> {
        self.values
            .get(index)
            .ok_or_else(|| Error::Decode(format!("column index {} out of range", index)))
    }
}

/// An in-memory tabular result returned by `Accessor::get_data`.
#[derive(Debug, Clone)]
pub struct DataSet {
    columns: Arc<[String]>,
    rows: Vec<Row>,
}

impl DataSet {
    /// Create an empty result set with the given column names.
    pub fn new<S: Into<String>>(columns: Vec<S>) -> Self {
        let columns: Arc<[String]> =
            columns.into_iter().map(Into::into).collect::<Vec<_>>().into();
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row of cell values, in column order.
    pub fn push_row(&mut self, values: Vec<Value>) {
        self.rows.push(Row::new(Arc::clone(&self.columns), values));
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Column names.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Borrow the rows.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Consume the result set, keeping only the rows.
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}
