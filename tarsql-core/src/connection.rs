//! Connection facade.
//!
//! Wraps a single SQL client behind the operations an ORM connection
//! exposes. The grammars are installed when the connection is built.

use std::mem;
use std::time::{Duration, Instant};

use smol_str::format_smolstr;

use crate::backend::sql::query::{Grammar, InsertValues, TarantoolGrammar};
use crate::backend::sql::schema::SchemaGrammar;
use crate::config::ConnectionConfig;
use crate::dsn::build_dsn;
use crate::errors::{Action, Entity, TarsqlError};
use crate::executor::cursor::Cursor;
use crate::executor::engine::{Connector, SqlClient};
use crate::executor::result::{ConsumerResult, ExecuteResult, ProducerResult, Record};
use crate::executor::Executor;
use crate::ir::blueprint::Blueprint;
use crate::ir::value::Value;
use crate::{debug, error};

pub const DRIVER_NAME: &str = "tarantool";

/// A statement that ran (or would have run) on the connection.
#[derive(Clone, Debug, PartialEq)]
pub struct QueryLogEntry {
    pub query: String,
    pub bindings: Vec<Value>,
    pub time: Duration,
}

pub struct Connection<C: SqlClient> {
    config: ConnectionConfig,
    dsn: String,
    executor: Executor<C>,
    query_grammar: TarantoolGrammar,
    schema_grammar: SchemaGrammar,
    records_modified: bool,
    logging_queries: bool,
    query_log: Vec<QueryLogEntry>,
    pretending: bool,
}

impl<C: SqlClient> Connection<C> {
    /// Build the DSN and connect.
    ///
    /// # Errors
    /// - The configuration does not describe a connection.
    /// - The connector failed to create a client.
    pub fn new<K>(config: ConnectionConfig, connector: &K) -> Result<Self, TarsqlError>
    where
        K: Connector<Client = C>,
    {
        let dsn = build_dsn(&config)?;
        let client = connector.connect(&dsn).map_err(|e| {
            error!(Option::from("connection"), &format!("{e}"));
            TarsqlError::FailedTo(
                Action::Connect,
                Some(Entity::Connection),
                format_smolstr!("{e}"),
            )
        })?;
        debug!(
            Option::from("connection"),
            &format!("{DRIVER_NAME} connection established"),
        );
        Ok(Connection {
            config,
            dsn,
            executor: Executor::new(client),
            query_grammar: TarantoolGrammar::new(),
            schema_grammar: SchemaGrammar::new(),
            records_modified: false,
            logging_queries: false,
            query_log: Vec::new(),
            pretending: false,
        })
    }

    #[must_use]
    pub fn driver_name(&self) -> &'static str {
        DRIVER_NAME
    }

    #[must_use]
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    #[must_use]
    pub fn dsn(&self) -> &str {
        &self.dsn
    }

    #[must_use]
    pub fn client(&self) -> &C {
        self.executor.client()
    }

    #[must_use]
    pub fn query_grammar(&self) -> &TarantoolGrammar {
        &self.query_grammar
    }

    #[must_use]
    pub fn schema_grammar(&self) -> &SchemaGrammar {
        &self.schema_grammar
    }

    /// Run the callback unless pretending, then log the statement.
    fn run<T>(
        &mut self,
        sql: &str,
        bindings: &[Value],
        pretend: impl FnOnce() -> T,
        callback: impl FnOnce(&Executor<C>) -> Result<T, TarsqlError>,
    ) -> Result<T, TarsqlError> {
        let start = Instant::now();
        let result = if self.pretending {
            pretend()
        } else {
            callback(&self.executor)?
        };
        self.log_query(sql, bindings, start.elapsed());
        Ok(result)
    }

    fn execute(&mut self, sql: &str, bindings: &[Value]) -> Result<ExecuteResult, TarsqlError> {
        let pretend = || {
            if crate::executor::statement_kind(sql) == "SELECT" {
                ExecuteResult::Query(ProducerResult::new())
            } else {
                ExecuteResult::Update(ConsumerResult::default())
            }
        };
        self.run(sql, bindings, pretend, |executor| {
            executor.execute(sql, bindings)
        })
    }

    /// Run a query and normalize its rows into records.
    ///
    /// # Errors
    /// - The client failed to run the statement.
    pub fn select(&mut self, sql: &str, bindings: &[Value]) -> Result<Vec<Record>, TarsqlError> {
        Ok(self.execute(sql, bindings)?.records())
    }

    /// First record of the query, if any.
    ///
    /// # Errors
    /// - The client failed to run the statement.
    pub fn select_one(
        &mut self,
        sql: &str,
        bindings: &[Value],
    ) -> Result<Option<Record>, TarsqlError> {
        Ok(self.select(sql, bindings)?.into_iter().next())
    }

    /// # Errors
    /// - The client failed to run the statement.
    pub fn insert(&mut self, sql: &str, bindings: &[Value]) -> Result<ExecuteResult, TarsqlError> {
        self.execute(sql, bindings)
    }

    /// Compile an insert of the rows into the table and run it.
    ///
    /// # Errors
    /// - The rows do not share their columns.
    /// - The client failed to run the statement.
    pub fn insert_values(
        &mut self,
        table: &str,
        values: &InsertValues,
    ) -> Result<ExecuteResult, TarsqlError> {
        let pattern = self.query_grammar.compile_insert(table, values)?;
        self.insert(&pattern.pattern, &pattern.params)
    }

    /// # Errors
    /// - The client failed to run the statement.
    pub fn update(&mut self, sql: &str, bindings: &[Value]) -> Result<ExecuteResult, TarsqlError> {
        self.execute(sql, bindings)
    }

    /// Returns 1 when the statement affected any row and 0 otherwise.
    /// The exact number of deleted rows is not reported.
    ///
    /// # Errors
    /// - The client failed to run the statement.
    pub fn delete(&mut self, sql: &str, bindings: &[Value]) -> Result<u64, TarsqlError> {
        let count = self.execute(sql, bindings)?.row_count();
        Ok(u64::from(count != 0))
    }

    /// Run a raw statement without bindings and without the session
    /// command.
    ///
    /// # Errors
    /// - The client failed to run the statement.
    pub fn unprepared(&mut self, sql: &str) -> Result<bool, TarsqlError> {
        let pretending = self.pretending;
        let changed = self.run(
            sql,
            &[],
            || true,
            |executor| executor.run(sql, &[]).map(|_| true),
        )?;
        if !pretending {
            self.records_have_been_modified(changed);
        }
        Ok(changed)
    }

    /// Run a statement and report success.
    ///
    /// # Errors
    /// - The client failed to run the statement.
    pub fn statement(&mut self, sql: &str, bindings: &[Value]) -> Result<bool, TarsqlError> {
        let pretending = self.pretending;
        let done = self.run(
            sql,
            bindings,
            || true,
            |executor| executor.execute(sql, bindings).map(|_| true),
        )?;
        if !pretending {
            self.records_have_been_modified(true);
        }
        Ok(done)
    }

    /// Run a query and iterate over its records.
    ///
    /// # Errors
    /// - The client failed to run the statement.
    pub fn cursor(&mut self, sql: &str, bindings: &[Value]) -> Result<Cursor, TarsqlError> {
        Ok(Cursor::from(self.execute(sql, bindings)?))
    }

    /// Run an insert and return the identifier it generated.
    ///
    /// # Errors
    /// - The client failed to run the statement.
    /// - The statement generated no identifier.
    pub fn insert_get_id(&mut self, sql: &str, bindings: &[Value]) -> Result<Value, TarsqlError> {
        if let ExecuteResult::Update(result) = self.insert(sql, bindings)? {
            if let Some(id) = result.autoincrement_ids.into_iter().next() {
                return Ok(id);
            }
        }
        Err(TarsqlError::NotFound(
            Entity::Value,
            format_smolstr!("autoincrement id of statement {sql}"),
        ))
    }

    /// # Errors
    /// - The client failed to query the system space.
    pub fn has_table(&mut self, table: &str) -> Result<bool, TarsqlError> {
        let sql = self.schema_grammar.compile_table_exists();
        Ok(!self.select(sql, &[Value::from(table)])?.is_empty())
    }

    /// Compile the blueprint and run its statements in order.
    ///
    /// # Errors
    /// - The client failed to run one of the statements. The statements
    ///   before it stay applied.
    pub fn build(&mut self, blueprint: &Blueprint) -> Result<(), TarsqlError> {
        for sql in self.schema_grammar.to_sql(blueprint) {
            self.statement(&sql, &[])?;
        }
        Ok(())
    }

    /// Mark the connection as having modified records. Once set, the
    /// mark is not cleared.
    pub fn records_have_been_modified(&mut self, value: bool) {
        if !self.records_modified {
            self.records_modified = value;
        }
    }

    #[must_use]
    pub fn has_modified_records(&self) -> bool {
        self.records_modified
    }

    fn log_query(&mut self, sql: &str, bindings: &[Value], time: Duration) {
        if self.logging_queries {
            self.query_log.push(QueryLogEntry {
                query: sql.to_string(),
                bindings: bindings.to_vec(),
                time,
            });
        }
    }

    pub fn enable_query_log(&mut self) {
        self.logging_queries = true;
    }

    pub fn disable_query_log(&mut self) {
        self.logging_queries = false;
    }

    #[must_use]
    pub fn logging(&self) -> bool {
        self.logging_queries
    }

    #[must_use]
    pub fn query_log(&self) -> &[QueryLogEntry] {
        &self.query_log
    }

    pub fn flush_query_log(&mut self) {
        self.query_log.clear();
    }

    #[must_use]
    pub fn pretending(&self) -> bool {
        self.pretending
    }

    /// Run the callback without touching the client and return the
    /// statements it would have run.
    ///
    /// # Errors
    /// - The callback failed.
    pub fn pretend<F>(&mut self, callback: F) -> Result<Vec<QueryLogEntry>, TarsqlError>
    where
        F: FnOnce(&mut Self) -> Result<(), TarsqlError>,
    {
        let logging = mem::replace(&mut self.logging_queries, true);
        let saved_log = mem::take(&mut self.query_log);
        self.pretending = true;

        let result = callback(self);

        self.pretending = false;
        self.logging_queries = logging;
        let pretended = mem::replace(&mut self.query_log, saved_log);
        result.map(|()| pretended)
    }
}
