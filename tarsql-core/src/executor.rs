//! Executor module.
//!
//! Sends statements to the SQL client. Statements are routed by their
//! leading keyword: `SELECT` produces tuples, anything else consumes
//! them. Every data statement is preceded by a session command that
//! allows full scans, as Tarantool rejects scans without a matching
//! index by default.

use crate::debug;
use crate::errors::TarsqlError;
use crate::executor::engine::SqlClient;
use crate::executor::result::ExecuteResult;
use crate::ir::value::Value;

pub mod cursor;
pub mod engine;
pub mod result;

/// Session command issued before every data statement.
pub const SEQ_SCAN_SQL: &str = "SET SESSION \"sql_seq_scan\" = true;";

/// Upper-cased leading keyword of the statement, empty for blank input.
#[must_use]
pub fn statement_kind(sql: &str) -> String {
    sql.split_whitespace()
        .next()
        .map(str::to_uppercase)
        .unwrap_or_default()
}

/// Statement executor over a SQL client.
#[derive(Debug)]
pub struct Executor<C: SqlClient> {
    client: C,
}

impl<C: SqlClient> Executor<C> {
    #[must_use]
    pub fn new(client: C) -> Self {
        Executor { client }
    }

    #[must_use]
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Enable full scans for the session, then run the statement.
    ///
    /// # Errors
    /// - The client failed on the session command or on the statement.
    pub fn execute(&self, sql: &str, params: &[Value]) -> Result<ExecuteResult, TarsqlError> {
        self.client
            .execute(SEQ_SCAN_SQL)
            .map_err(|e| e.in_query(SEQ_SCAN_SQL, &[]))?;
        self.run(sql, params)
    }

    /// Run the statement as is.
    ///
    /// # Errors
    /// - The client failed on the statement.
    pub fn run(&self, sql: &str, params: &[Value]) -> Result<ExecuteResult, TarsqlError> {
        let kind = statement_kind(sql);
        debug!(
            Option::from("executor"),
            &format!("{kind} statement: {sql}, parameters: {params:?}"),
        );
        let result = if kind == "SELECT" {
            self.client
                .execute_query(sql, params)
                .map(ExecuteResult::Query)
        } else {
            self.client
                .execute_update(sql, params)
                .map(ExecuteResult::Update)
        };
        result.map_err(|e| e.in_query(sql, params))
    }
}
