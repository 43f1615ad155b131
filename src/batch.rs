//! Fail-fast sequential command execution.
//!
//! [`BatchQuery`] owns one database session and runs commands against it in
//! order. The first failure makes the sequencer sticky-errored: every guarded
//! command after that returns an empty result without touching the accessor,
//! until the error is waived or a fresh connect succeeds. This lets a long
//! chain of commands be written without per-command checks, with one `ok()`
//! inspection at the end deciding between commit and rollback.
//!
//! Two action counters (one global, one per named scope) number each command
//! for diagnostics, so a failure report can say "action 17 of scope
//! `post_invoice`" instead of pointing at nothing.

use crate::access::{Accessor, ExecSummary};
use crate::error::Error;
use crate::opts::Opts;
use crate::row::{DataSet, Row};
use crate::value::Value;

/// Outcome of one command.
///
/// An all-default value (`ok == false`, no rows) is what every guarded
/// command returns when the sequencer is errored or disconnected.
#[derive(Debug, Clone, Default)]
pub struct QueryResult {
    /// True if the command reached the accessor and succeeded.
    pub ok: bool,
    /// True if at least one row came back.
    pub has_data: bool,
    /// True if a mutating statement affected at least one row.
    pub has_affected_rows: bool,
    /// Returned rows, in delivery order. Empty when `ok` is false.
    pub rows: Vec<Row>,
}

impl QueryResult {
    /// Row at a zero-based position, `None` for an empty result or an
    /// out-of-range index (`index >= row count` is out of range).
    pub fn get(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// First row, `None` only when the result has no rows.
    pub fn first(&self) -> Option<&Row> {
        self.rows.first()
    }

    fn from_data(data: DataSet) -> Self {
        Self {
            ok: true,
            has_data: data.row_count() > 0,
            has_affected_rows: false,
            rows: data.into_rows(),
        }
    }

    fn from_exec(summary: ExecSummary) -> Self {
        let mut data = DataSet::new(vec!["Affected", "LastInsertId"]);
        data.push_row(vec![
            Value::Int(summary.rows_affected),
            Value::Int(summary.last_insert_id),
        ]);
        Self {
            ok: true,
            has_data: true,
            has_affected_rows: summary.rows_affected != 0,
            rows: data.into_rows(),
        }
    }
}

/// Prefix a statement with `EXECUTE ` unless its first token is already an
/// invocation keyword (case-insensitive `exec` or `execute`).
fn normalize_procedure(query: &str) -> String {
    let first = query
        .split_whitespace()
        .next()
        .unwrap_or("")
        .to_lowercase();
    if first == "exec" || first == "execute" {
        query.to_string()
    } else {
        format!("EXECUTE {}", query)
    }
}

/// A fail-fast command sequencer over one database session.
///
/// Not safe for concurrent use: the sticky error and the counters are plain
/// fields. Use one instance per unit of work, or serialize access externally.
pub struct BatchQuery<A: Accessor> {
    accessor: A,
    connected: bool,
    error: String,
    action_number: u32,
    scope_action_number: u32,
    scope_name: String,
    last_query: String,
}

impl<A: Accessor> BatchQuery<A> {
    /// Wrap an accessor. The default scope name is `main`; no session is
    /// open until [`connect`](Self::connect).
    pub fn new(accessor: A) -> Self {
        Self {
            accessor,
            connected: false,
            error: String::new(),
            action_number: 0,
            scope_action_number: 0,
            scope_name: "main".to_string(),
            last_query: String::new(),
        }
    }

    /// Open the session named by `connection_id`.
    ///
    /// Always resets the sticky error, the last-query text, and both action
    /// counters to their connect baseline of 1, whether or not the attempt
    /// succeeds. Returns false and records the failure as the sticky error
    /// if the accessor refuses.
    pub fn connect(&mut self, connection_id: &str) -> bool {
        self.error.clear();
        self.last_query.clear();
        self.action_number = 1;
        self.scope_action_number = 1;

        match self.accessor.connect(connection_id) {
            Ok(connected) => {
                self.connected = connected;
                self.connected
            }
            Err(err) => {
                self.error = err.to_string();
                false
            }
        }
    }

    /// Close the session and reset all diagnostic state to zero.
    /// Safe to call when not connected.
    pub fn disconnect(&mut self) {
        self.action_number = 0;
        self.scope_action_number = 0;
        self.error.clear();
        self.last_query.clear();
        self.accessor.disconnect();
        self.connected = false;
    }

    /// Run a read and collect its rows.
    pub fn get(&mut self, query: &str, args: &[Value]) -> QueryResult {
        if !self.guard() {
            return QueryResult::default();
        }
        self.note_action(query);

        match self.accessor.get_data(query, args) {
            Ok(data) => QueryResult::from_data(data),
            Err(err) => self.fail(err),
        }
    }

    /// Run a mutating statement.
    ///
    /// The result always carries one synthetic row with integer columns
    /// `Affected` and `LastInsertId`; `has_affected_rows` reflects whether
    /// the affected count was nonzero.
    pub fn set(&mut self, query: &str, args: &[Value]) -> QueryResult {
        if !self.guard() {
            return QueryResult::default();
        }
        self.note_action(query);

        match self.accessor.exec(query, args) {
            Ok(summary) => QueryResult::from_exec(summary),
            Err(err) => self.fail(err),
        }
    }

    /// Invoke a stored procedure. The statement is prefixed with `EXECUTE `
    /// unless it already starts with `exec` or `execute` (any case). The
    /// procedure may return rows, which are collected like a read.
    pub fn call(&mut self, query: &str, args: &[Value]) -> QueryResult {
        if !self.guard() {
            return QueryResult::default();
        }
        let query = normalize_procedure(query);
        self.note_action(&query);

        match self.accessor.get_data(&query, args) {
            Ok(data) => QueryResult::from_data(data),
            Err(err) => self.fail(err),
        }
    }

    /// Start a transaction.
    ///
    /// Transaction control is never short-circuited by the sticky error:
    /// a transaction opened before a failure must still be closable.
    pub fn begin(&mut self) {
        self.action_number += 1;
        self.scope_action_number += 1;
        if let Err(err) = self.accessor.begin() {
            self.error = err.to_string();
        }
    }

    /// Commit the current transaction. Runs even while errored, like
    /// [`begin`](Self::begin).
    pub fn commit(&mut self) {
        self.action_number += 1;
        self.scope_action_number += 1;
        if let Err(err) = self.accessor.commit() {
            self.error = err.to_string();
        }
    }

    /// Roll back the current transaction. Runs even while errored, like
    /// [`begin`](Self::begin).
    pub fn rollback(&mut self) {
        self.action_number += 1;
        self.scope_action_number += 1;
        if let Err(err) = self.accessor.rollback() {
            self.error = err.to_string();
        }
    }

    /// True while no command has failed since the last connect or waive.
    pub fn ok(&self) -> bool {
        self.error.is_empty()
    }

    /// Clear the sticky error, letting guarded commands run again.
    /// Counters and last-query text are untouched.
    pub fn waive(&mut self) {
        self.error.clear();
    }

    /// Label the commands that follow with a scope name, for diagnostics.
    /// Resets the scope counter; the global counter and error state are
    /// untouched.
    pub fn scope_name(&mut self, name: &str) {
        self.scope_action_number = 0;
        self.scope_name = name.to_string();
    }

    /// Current scope label.
    pub fn last_scope_name(&self) -> &str {
        &self.scope_name
    }

    /// Number of the last action within the current scope.
    pub fn last_scope_action_number(&self) -> u32 {
        self.scope_action_number
    }

    /// Number of the last action since connect.
    pub fn last_action_number(&self) -> u32 {
        self.action_number
    }

    /// Text of the sticky error, empty when [`ok`](Self::ok).
    pub fn last_error_text(&self) -> &str {
        &self.error
    }

    /// Text of the last guarded command that reached the accessor.
    pub fn last_query(&self) -> &str {
        &self.last_query
    }

    /// Read-only settings of the underlying session.
    pub fn settings(&self) -> &Opts {
        self.accessor.settings()
    }

    /// Shared guard for get/set/call: refuse while errored, and turn a
    /// missing session into the sticky "Not connected" error.
    fn guard(&mut self) -> bool {
        if !self.error.is_empty() {
            return false;
        }
        if !self.connected {
            self.error = Error::NotConnected.to_string();
            return false;
        }
        true
    }

    fn note_action(&mut self, query: &str) {
        self.action_number += 1;
        self.scope_action_number += 1;
        self.last_query = query.to_string();
    }

    fn fail(&mut self, err: Error) -> QueryResult {
        self.error = err.to_string();
        QueryResult::default()
    }
}
