//! Fail-fast sequential query execution and streaming row import.
//!
//! # Features
//!
//! - **Fail-fast sequencing**: the first failed command parks the sequencer
//!   in a sticky error state; later commands are skipped without touching
//!   the database until the error is waived or a reconnect succeeds
//! - **Action counters**: every command is numbered globally and per named
//!   scope, so failures in long command chains are easy to locate
//! - **Streaming copy**: rows flow from a source query to a destination
//!   insert one at a time, with optional per-row deduplication and partial
//!   counts on failure
//! - **Pluggable access layer**: no wire protocol here; any driver adapter
//!   implementing [`Accessor`] plugs in
//!
//! # Example
//!
//! ```no_run
//! use batchquery::BatchQuery;
//! # use batchquery::{Accessor, DataSet, ExecSummary, Opts, Result, RowReader, Value};
//! # struct Driver(Opts);
//! # impl Accessor for Driver {
//! #     fn connect(&mut self, _id: &str) -> Result<bool> { Ok(true) }
//! #     fn disconnect(&mut self) {}
//! #     fn get_data(&mut self, _q: &str, _a: &[Value]) -> Result<DataSet> { Ok(DataSet::new(Vec::<String>::new())) }
//! #     fn exec(&mut self, _q: &str, _a: &[Value]) -> Result<ExecSummary> { Ok(ExecSummary::default()) }
//! #     fn begin(&mut self) -> Result<()> { Ok(()) }
//! #     fn commit(&mut self) -> Result<()> { Ok(()) }
//! #     fn rollback(&mut self) -> Result<()> { Ok(()) }
//! #     fn exists(&mut self, _q: &str, _a: &[Value]) -> Result<bool> { Ok(false) }
//! #     fn get_data_reader<'a>(&'a mut self, _q: &str, _a: &[Value]) -> Result<Box<dyn RowReader + 'a>> { unimplemented!() }
//! #     fn settings(&self) -> &Opts { &self.0 }
//! # }
//!
//! fn main() {
//!     let mut bq = BatchQuery::new(Driver(Opts::default()));
//!     if !bq.connect("APPSDB") {
//!         return;
//!     }
//!
//!     bq.begin();
//!     bq.scope_name("post_invoice");
//!     let qr = bq.get("SELECT WhseID FROM tcoWarehouse ORDER BY WhseID", &[]);
//!     if qr.has_data {
//!         println!("first warehouse: {:?}", qr.first());
//!     }
//!     bq.set("UPDATE tcoWarehouse SET Active = 1", &[]);
//!
//!     if bq.ok() {
//!         bq.commit();
//!     } else {
//!         println!(
//!             "failed on action {}: {}",
//!             bq.last_action_number(),
//!             bq.last_error_text()
//!         );
//!         bq.rollback();
//!     }
//!     bq.disconnect();
//! }
//! ```

pub mod access;
pub mod batch;
pub mod copy;
pub mod error;
pub mod opts;
pub mod row;
pub mod value;

pub use access::{Accessor, ExecSummary, RowReader};
pub use batch::{BatchQuery, QueryResult};
pub use copy::{CopyError, CopyJob, CopyStats, QuerySpec};
pub use error::{Error, Result};
pub use opts::Opts;
pub use row::{DataSet, Row};
pub use value::Value;
