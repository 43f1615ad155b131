//! The external data access interface.
//!
//! The core does not speak any wire protocol. Everything that touches a real
//! database goes through [`Accessor`], implemented by a driver adapter
//! outside this crate. The sequencer and the copy pipeline only assume the
//! capabilities declared here.

use crate::error::Result;
use crate::opts::Opts;
use crate::row::{DataSet, Row};
use crate::value::Value;

/// Execution summary of a mutating statement.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExecSummary {
    /// Number of rows the statement affected.
    pub rows_affected: i64,
    /// Last generated identifier, `0` when the driver has none.
    pub last_insert_id: i64,
}

/// A forward-only cursor over the rows of a source query.
///
/// The underlying driver cursor is released when the reader is dropped, so
/// every exit path out of a streaming loop releases it.
pub trait RowReader {
    /// Advance and return the next row, `None` once the cursor is exhausted.
    fn next_row(&mut self) -> Result<Option<Row>>;
}

/// One database session, as the core sees it.
///
/// All methods block until the driver call returns; the core adds no
/// scheduling of its own. An implementation owns exactly one logical
/// connection at a time.
pub trait Accessor {
    /// Open the session named by `connection_id`. Returns whether the
    /// session is connected afterwards.
    fn connect(&mut self, connection_id: &str) -> Result<bool>;

    /// Close the session. Must be safe to call when not connected.
    fn disconnect(&mut self);

    /// Run a read and collect the full result set.
    fn get_data(&mut self, query: &str, args: &[Value]) -> Result<DataSet>;

    /// Run a mutating statement.
    fn exec(&mut self, query: &str, args: &[Value]) -> Result<ExecSummary>;

    /// Start a transaction.
    fn begin(&mut self) -> Result<()>;

    /// Commit the current transaction.
    fn commit(&mut self) -> Result<()>;

    /// Roll back the current transaction.
    fn rollback(&mut self) -> Result<()>;

    /// Run an existence probe. True if the query yields at least one row.
    fn exists(&mut self, query: &str, args: &[Value]) -> Result<bool>;

    /// Open a streaming cursor over a read. The accessor stays borrowed
    /// until the reader is dropped.
    fn get_data_reader<'a>(
        &'a mut self,
        query: &str,
        args: &[Value],
    ) -> Result<Box<dyn RowReader + 'a>>;

    /// Read-only settings of the session this accessor manages.
    fn settings(&self) -> &Opts;
}
