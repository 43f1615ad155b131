//! Copy rows between two in-memory accessors.
//!
//! Real deployments implement `Accessor` over an actual database driver;
//! this demo fakes both ends so it can run standalone.

use std::collections::VecDeque;

use batchquery::{
    Accessor, CopyJob, DataSet, Error, ExecSummary, Opts, QuerySpec, Result, Row, RowReader,
    Value,
};

struct MemReader {
    rows: VecDeque<Row>,
}

impl RowReader for MemReader {
    fn next_row(&mut self) -> Result<Option<Row>> {
        Ok(self.rows.pop_front())
    }
}

/// A toy accessor holding one table in memory.
struct MemAccessor {
    opts: Opts,
    table: DataSet,
}

impl MemAccessor {
    fn new(table: DataSet) -> Self {
        Self {
            opts: Opts::default(),
            table,
        }
    }
}

impl Accessor for MemAccessor {
    fn connect(&mut self, _connection_id: &str) -> Result<bool> {
        Ok(true)
    }

    fn disconnect(&mut self) {}

    fn get_data(&mut self, _query: &str, _args: &[Value]) -> Result<DataSet> {
        Ok(self.table.clone())
    }

    fn exec(&mut self, _query: &str, args: &[Value]) -> Result<ExecSummary> {
        self.table.push_row(args.to_vec());
        Ok(ExecSummary {
            rows_affected: 1,
            last_insert_id: self.table.row_count() as i64,
        })
    }

    fn begin(&mut self) -> Result<()> {
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        Ok(())
    }

    fn exists(&mut self, _query: &str, args: &[Value]) -> Result<bool> {
        Ok(self
            .table
            .rows()
            .iter()
            .any(|row| row.get(0) == args.first()))
    }

    fn get_data_reader<'a>(
        &'a mut self,
        _query: &str,
        _args: &[Value],
    ) -> Result<Box<dyn RowReader + 'a>> {
        Ok(Box::new(MemReader {
            rows: self.table.rows().to_vec().into(),
        }))
    }

    fn settings(&self) -> &Opts {
        &self.opts
    }
}

fn main() -> core::result::Result<(), Error> {
    tracing_subscriber::fmt().init();

    let mut src_table = DataSet::new(vec!["id", "name"]);
    for (id, name) in [(1, "bolts"), (2, "nuts"), (3, "washers")] {
        src_table.push_row(vec![Value::Int(id), Value::Text(name.into())]);
    }
    let mut source = MemAccessor::new(src_table);

    let mut dst_table = DataSet::new(vec!["id", "name"]);
    dst_table.push_row(vec![Value::Int(2), Value::Text("nuts".into())]);
    let mut destination = MemAccessor::new(dst_table);

    let mut job = CopyJob::new(
        "parts-sync",
        QuerySpec::new("SELECT id, name FROM parts ORDER BY id"),
        QuerySpec::new("INSERT INTO parts (id, name) VALUES (?, ?)"),
    );
    job.destination_check = Some(QuerySpec::new("SELECT 1 FROM parts WHERE id = ?"));
    job.set_checker_index(vec![0]);
    job.log = true;

    let stats = job.run(&mut source, &mut destination).map_err(|e| e.source)?;
    println!("done: {}", stats);
    Ok(())
}
