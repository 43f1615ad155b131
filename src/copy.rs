//! Streaming source-to-destination row transfer.
//!
//! [`CopyJob`] reads rows from a source query and feeds them, one by one, to
//! a destination insert statement. An optional existence check runs before
//! each insert so a job can be re-run without duplicating rows. The first
//! failure halts the stream; counts accumulated up to that point travel with
//! the error so the caller can report or resume the partial transfer.

use thiserror::Error as ThisError;

use crate::access::Accessor;
use crate::error::Error;
use crate::row::Row;
use crate::value::Value;

/// One query and its positional arguments.
#[derive(Debug, Clone, Default)]
pub struct QuerySpec {
    /// Prepared statement text.
    pub query: String,
    /// Positional arguments, in order.
    pub args: Vec<Value>,
}

impl QuerySpec {
    /// A statement with no arguments yet.
    pub fn new<S: Into<String>>(query: S) -> Self {
        Self {
            query: query.into(),
            args: Vec::new(),
        }
    }

    /// Replace the positional arguments.
    pub fn set_args(&mut self, args: Vec<Value>) {
        self.args = args;
    }
}

/// Progress counters of one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyStats {
    /// Rows submitted for insertion (check-skipped rows are not counted).
    pub selected: i64,
    /// Sum of affected-row counts reported by the destination.
    pub inserted: i64,
}

impl std::fmt::Display for CopyStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} selected, {} inserted", self.selected, self.inserted)
    }
}

/// A halted run: the failure plus the counts accumulated before it.
///
/// No rollback happens here; transaction boundaries belong to the caller.
#[derive(Debug, ThisError)]
#[error("copy job {id} halted after {stats}: {source}")]
pub struct CopyError {
    /// Id of the job that halted.
    pub id: String,
    /// Partial progress at the point of failure.
    pub stats: CopyStats,
    /// The failure that halted the stream.
    #[source]
    pub source: Error,
}

/// A configured source-to-destination transfer.
///
/// Construct once, run as often as needed. Without an existence check a
/// re-run inserts everything again; with one, already-present rows are
/// skipped.
#[derive(Debug, Clone, Default)]
pub struct CopyJob {
    /// Job identifier, used in diagnostics.
    pub id: String,
    /// Source read.
    pub source: QuerySpec,
    /// Destination insert statement.
    pub destination: QuerySpec,
    /// Existence probe run against the destination before each insert.
    /// Only consulted when a checker index is also set.
    pub destination_check: Option<QuerySpec>,
    /// Emit diagnostic log lines.
    pub log: bool,
    checker_index: Vec<usize>,
}

impl CopyJob {
    /// A job with the given id, source read, and destination insert.
    pub fn new<S: Into<String>>(id: S, source: QuerySpec, destination: QuerySpec) -> Self {
        Self {
            id: id.into(),
            source,
            destination,
            destination_check: None,
            log: false,
            checker_index: Vec::new(),
        }
    }

    /// Record which source-row column positions feed the existence check,
    /// in argument order.
    pub fn set_checker_index(&mut self, index: Vec<usize>) {
        self.checker_index = index;
    }

    /// Stream all source rows to the destination.
    ///
    /// Rows are inserted in cursor delivery order, each using the full
    /// source row as positional arguments. The source cursor is released on
    /// every exit path. On failure the partial counts come back inside the
    /// [`CopyError`].
    pub fn run<S, D>(
        &self,
        source: &mut S,
        destination: &mut D,
    ) -> core::result::Result<CopyStats, CopyError>
    where
        S: Accessor + ?Sized,
        D: Accessor + ?Sized,
    {
        let mut stats = CopyStats::default();

        let mut reader = match source.get_data_reader(&self.source.query, &self.source.args) {
            Ok(reader) => reader,
            Err(err) => {
                if self.log {
                    tracing::error!("copy {}: source query failed: {}", self.id, err);
                }
                return Err(self.halted(stats, err));
            }
        };

        loop {
            let row = match reader.next_row() {
                Ok(Some(row)) => row,
                Ok(None) => break,
                Err(err) => {
                    if self.log {
                        tracing::error!(
                            "copy {}: source cursor failed after {}: {}",
                            self.id,
                            stats,
                            err
                        );
                    }
                    return Err(self.halted(stats, err));
                }
            };

            if let Some(check) = &self.destination_check {
                if !check.query.is_empty() && !self.checker_index.is_empty() {
                    let check_args = match self.check_args(&row) {
                        Ok(args) => args,
                        Err(err) => {
                            if self.log {
                                tracing::error!(
                                    "copy {}: existence check failed after {}: {}",
                                    self.id,
                                    stats,
                                    err
                                );
                            }
                            return Err(self.halted(stats, err));
                        }
                    };

                    match destination.exists(&check.query, &check_args) {
                        Ok(true) => {
                            if self.log {
                                tracing::debug!("copy {}: record exists, skipping", self.id);
                            }
                            continue;
                        }
                        Ok(false) => {}
                        Err(err) => {
                            if self.log {
                                tracing::error!(
                                    "copy {}: existence check failed after {}: {}",
                                    self.id,
                                    stats,
                                    err
                                );
                            }
                            return Err(self.halted(stats, err));
                        }
                    }
                }
            }

            match destination.exec(&self.destination.query, row.values()) {
                Ok(summary) => {
                    stats.inserted += summary.rows_affected;
                    stats.selected += 1;
                }
                Err(err) => {
                    if self.log {
                        tracing::error!(
                            "copy {}: insert failed after {}: {}",
                            self.id,
                            stats,
                            err
                        );
                    }
                    return Err(self.halted(stats, err));
                }
            }
        }

        if self.log {
            tracing::info!("copy {}: finished, {}", self.id, stats);
        }
        Ok(stats)
    }

    /// Extract the existence-check arguments from a source row, in the
    /// configured column order.
    fn check_args(&self, row: &Row) -> core::result::Result<Vec<Value>, Error> {
        let mut args = Vec::with_capacity(self.checker_index.len());
        for &idx in &self.checker_index {
            let value = row.get(idx).ok_or_else(|| {
                Error::InvalidUsage(format!(
                    "checker index {} out of range for source row of {} columns",
                    idx,
                    row.len()
                ))
            })?;
            args.push(value.clone());
        }
        Ok(args)
    }

    fn halted(&self, stats: CopyStats, source: Error) -> CopyError {
        CopyError {
            id: self.id.clone(),
            stats,
            source,
        }
    }
}
