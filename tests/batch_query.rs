//! Tests for the BatchQuery sequencer against a scripted accessor.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use batchquery::{
    Accessor, BatchQuery, DataSet, Error, ExecSummary, Opts, Result, RowReader, Value,
};

/// One scripted reply for a guarded command.
enum Reply {
    Data(DataSet),
    Exec(ExecSummary),
    Fail(String),
}

/// Accessor that replays a fixed script and records every query that
/// actually reaches it.
struct Scripted {
    opts: Opts,
    replies: VecDeque<Reply>,
    seen: Arc<Mutex<Vec<String>>>,
    connect_ok: bool,
    tx_error: Option<String>,
    tx_calls: Arc<AtomicU32>,
}

impl Scripted {
    fn new(replies: Vec<Reply>) -> Self {
        Self {
            opts: Opts::default(),
            replies: replies.into(),
            seen: Arc::new(Mutex::new(Vec::new())),
            connect_ok: true,
            tx_error: None,
            tx_calls: Arc::new(AtomicU32::new(0)),
        }
    }

    fn next_reply(&mut self, query: &str) -> Result<Reply> {
        self.seen.lock().unwrap().push(query.to_string());
        match self.replies.pop_front() {
            Some(Reply::Fail(msg)) => Err(Error::Execution(msg)),
            Some(reply) => Ok(reply),
            None => Err(Error::InvalidUsage("script exhausted".into())),
        }
    }

    fn tx(&mut self) -> Result<()> {
        self.tx_calls.fetch_add(1, Ordering::SeqCst);
        match &self.tx_error {
            Some(msg) => Err(Error::Transaction(msg.clone())),
            None => Ok(()),
        }
    }
}

impl Accessor for Scripted {
    fn connect(&mut self, _connection_id: &str) -> Result<bool> {
        if self.connect_ok {
            Ok(true)
        } else {
            Err(Error::Connect("login refused".into()))
        }
    }

    fn disconnect(&mut self) {}

    fn get_data(&mut self, query: &str, _args: &[Value]) -> Result<DataSet> {
        match self.next_reply(query)? {
            Reply::Data(data) => Ok(data),
            _ => Err(Error::InvalidUsage("expected a read in the script".into())),
        }
    }

    fn exec(&mut self, query: &str, _args: &[Value]) -> Result<ExecSummary> {
        match self.next_reply(query)? {
            Reply::Exec(summary) => Ok(summary),
            _ => Err(Error::InvalidUsage("expected a write in the script".into())),
        }
    }

    fn begin(&mut self) -> Result<()> {
        self.tx()
    }

    fn commit(&mut self) -> Result<()> {
        self.tx()
    }

    fn rollback(&mut self) -> Result<()> {
        self.tx()
    }

    fn exists(&mut self, _query: &str, _args: &[Value]) -> Result<bool> {
        Err(Error::InvalidUsage("not scripted".into()))
    }

    fn get_data_reader<'a>(
        &'a mut self,
        _query: &str,
        _args: &[Value],
    ) -> Result<Box<dyn RowReader + 'a>> {
        Err(Error::InvalidUsage("not scripted".into()))
    }

    fn settings(&self) -> &Opts {
        &self.opts
    }
}

fn one_row_data() -> DataSet {
    let mut data = DataSet::new(vec!["n"]);
    data.push_row(vec![Value::Int(1)]);
    data
}

#[test]
fn sticky_error_skips_later_commands() {
    let scripted = Scripted::new(vec![
        Reply::Fail("syntax error".into()),
        Reply::Data(one_row_data()),
    ]);
    let seen = Arc::clone(&scripted.seen);
    let mut bq = BatchQuery::new(scripted);
    assert!(bq.connect("DB"));

    let qr = bq.get("SELECT broken", &[]);
    assert!(!qr.ok);
    assert!(!bq.ok());
    assert_eq!(bq.last_error_text(), "Execution failed: syntax error");

    // Every guarded command is now skipped without reaching the accessor.
    let qr = bq.get("SELECT 1", &[]);
    assert!(!qr.ok);
    assert!(qr.rows.is_empty());
    let qr = bq.set("UPDATE t SET x = 1", &[]);
    assert!(!qr.ok);
    let qr = bq.call("mySP", &[]);
    assert!(!qr.ok);

    assert_eq!(bq.settings().host, "");
    // Only the failing query reached the accessor; counters stopped with it.
    let reached = seen.lock().unwrap();
    assert_eq!(reached.len(), 1);
    assert_eq!(reached[0], "SELECT broken");
    drop(reached);
    assert_eq!(bq.last_action_number(), 2);
    assert_eq!(bq.last_query(), "SELECT broken");
}

#[test]
fn waive_restores_execution() {
    let mut bq = BatchQuery::new(Scripted::new(vec![
        Reply::Fail("boom".into()),
        Reply::Data(one_row_data()),
    ]));
    assert!(bq.connect("DB"));

    bq.get("SELECT broken", &[]);
    assert!(!bq.ok());
    let n = bq.last_action_number();

    bq.waive();
    assert!(bq.ok());
    // Waive clears only the error text.
    assert_eq!(bq.last_action_number(), n);
    assert_eq!(bq.last_query(), "SELECT broken");

    let qr = bq.get("SELECT 1", &[]);
    assert!(qr.ok);
    assert!(qr.has_data);
}

#[test]
fn not_connected_is_a_sticky_error() {
    let mut bq = BatchQuery::new(Scripted::new(vec![Reply::Data(one_row_data())]));

    let qr = bq.get("SELECT 1", &[]);
    assert!(!qr.ok);
    assert_eq!(bq.last_error_text(), "Not connected");
    // The guard fired before any counter moved or any call went out.
    assert_eq!(bq.last_action_number(), 0);
    assert_eq!(bq.last_query(), "");
}

#[test]
fn connect_resets_state_even_when_it_fails() {
    let mut scripted = Scripted::new(vec![Reply::Fail("boom".into())]);
    scripted.connect_ok = false;
    let mut bq = BatchQuery::new(scripted);

    assert!(!bq.connect("DB"));
    assert_eq!(bq.last_error_text(), "Connect failed: login refused");
    assert_eq!(bq.last_action_number(), 1);
    assert_eq!(bq.last_scope_action_number(), 1);
    assert_eq!(bq.last_query(), "");
}

#[test]
fn connect_clears_a_prior_sticky_error() {
    let mut bq = BatchQuery::new(Scripted::new(vec![
        Reply::Fail("boom".into()),
        Reply::Data(one_row_data()),
    ]));
    assert!(bq.connect("DB"));
    bq.get("SELECT broken", &[]);
    assert!(!bq.ok());

    assert!(bq.connect("DB"));
    assert!(bq.ok());
    assert_eq!(bq.last_action_number(), 1);
    assert_eq!(bq.last_scope_action_number(), 1);
    assert_eq!(bq.last_query(), "");

    let qr = bq.get("SELECT 1", &[]);
    assert!(qr.ok);
}

#[test]
fn disconnect_resets_to_zero_and_is_idempotent() {
    let mut bq = BatchQuery::new(Scripted::new(vec![]));
    assert!(bq.connect("DB"));
    assert_eq!(bq.last_action_number(), 1);

    bq.disconnect();
    assert_eq!(bq.last_action_number(), 0);
    assert_eq!(bq.last_scope_action_number(), 0);
    assert_eq!(bq.last_error_text(), "");

    // Safe when already disconnected.
    bq.disconnect();
    assert_eq!(bq.last_action_number(), 0);
}

#[test]
fn scope_name_resets_only_the_scope_counter() {
    let mut bq = BatchQuery::new(Scripted::new(vec![
        Reply::Data(one_row_data()),
        Reply::Data(one_row_data()),
    ]));
    assert!(bq.connect("DB"));
    bq.get("SELECT 1", &[]);
    assert_eq!(bq.last_action_number(), 2);
    assert_eq!(bq.last_scope_action_number(), 2);

    bq.scope_name("post_invoice");
    assert_eq!(bq.last_scope_name(), "post_invoice");
    assert_eq!(bq.last_scope_action_number(), 0);
    assert_eq!(bq.last_action_number(), 2);

    bq.get("SELECT 2", &[]);
    assert_eq!(bq.last_scope_action_number(), 1);
    assert_eq!(bq.last_action_number(), 3);
}

#[test]
fn default_scope_is_main() {
    let bq = BatchQuery::new(Scripted::new(vec![]));
    assert_eq!(bq.last_scope_name(), "main");
}

#[test]
fn set_with_zero_affected_rows() {
    let mut bq = BatchQuery::new(Scripted::new(vec![Reply::Exec(ExecSummary {
        rows_affected: 0,
        last_insert_id: 0,
    })]));
    assert!(bq.connect("DB"));

    let qr = bq.set("UPDATE t SET x = 1 WHERE 1 = 0", &[]);
    assert!(qr.ok);
    assert!(qr.has_data);
    assert!(!qr.has_affected_rows);
    let row = qr.first().unwrap();
    assert_eq!(row.value("Affected").unwrap().as_i64().unwrap(), 0);
}

#[test]
fn set_reports_affected_and_last_insert_id() {
    let mut bq = BatchQuery::new(Scripted::new(vec![Reply::Exec(ExecSummary {
        rows_affected: 3,
        last_insert_id: 101,
    })]));
    assert!(bq.connect("DB"));

    let qr = bq.set("INSERT INTO t (x) VALUES (?)", &[Value::Int(9)]);
    assert!(qr.ok);
    assert!(qr.has_affected_rows);
    let row = qr.first().unwrap();
    assert_eq!(row.value("Affected").unwrap().as_i64().unwrap(), 3);
    assert_eq!(row.value("LastInsertId").unwrap().as_i64().unwrap(), 101);
}

#[test]
fn call_prefixes_execute_when_needed() {
    let mut bq = BatchQuery::new(Scripted::new(vec![
        Reply::Data(one_row_data()),
        Reply::Data(one_row_data()),
        Reply::Data(one_row_data()),
    ]));
    assert!(bq.connect("DB"));

    bq.call("mySP", &[]);
    assert_eq!(bq.last_query(), "EXECUTE mySP");
    bq.call("EXEC mySP", &[]);
    assert_eq!(bq.last_query(), "EXEC mySP");
    bq.call("execute mySP 1, 2", &[]);
    assert_eq!(bq.last_query(), "execute mySP 1, 2");
}

#[test]
fn transaction_control_runs_while_errored() {
    let scripted = Scripted::new(vec![Reply::Fail("boom".into())]);
    let tx_calls = Arc::clone(&scripted.tx_calls);
    let mut bq = BatchQuery::new(scripted);
    assert!(bq.connect("DB"));
    bq.begin();
    bq.get("SELECT broken", &[]);
    assert!(!bq.ok());
    let n = bq.last_action_number();

    // Rollback must still reach the accessor to close the transaction.
    bq.rollback();
    assert_eq!(bq.last_action_number(), n + 1);
    assert_eq!(tx_calls.load(Ordering::SeqCst), 2);
    // The sticky error from the failed read is still in place.
    assert!(!bq.ok());
}

#[test]
fn transaction_failure_becomes_sticky() {
    let mut scripted = Scripted::new(vec![]);
    scripted.tx_error = Some("deadlock victim".into());
    let mut bq = BatchQuery::new(scripted);
    assert!(bq.connect("DB"));

    bq.commit();
    assert!(!bq.ok());
    assert_eq!(
        bq.last_error_text(),
        "Transaction control failed: deadlock victim"
    );
}
