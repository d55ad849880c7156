//! Engine module.
//!
//! Traits of the SQL client the connection delegates to.

use crate::errors::TarsqlError;
use crate::executor::result::{ConsumerResult, ExecuteResult, ProducerResult};
use crate::ir::value::Value;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

/// A client able to run SQL on a Tarantool instance.
pub trait SqlClient {
    /// Run a statement producing tuples.
    ///
    /// # Errors
    /// - The instance rejected the statement or the transport failed.
    fn execute_query(&self, sql: &str, params: &[Value]) -> Result<ProducerResult, TarsqlError>;

    /// Run a statement consuming tuples (DML, DDL).
    ///
    /// # Errors
    /// - The instance rejected the statement or the transport failed.
    fn execute_update(&self, sql: &str, params: &[Value]) -> Result<ConsumerResult, TarsqlError>;

    /// Run a session command without bindings.
    ///
    /// # Errors
    /// - The instance rejected the command or the transport failed.
    fn execute(&self, sql: &str) -> Result<ExecuteResult, TarsqlError>;
}

/// Builds clients from connection URIs.
pub trait Connector {
    type Client: SqlClient;

    /// # Errors
    /// - The URI is malformed or the instance is unreachable.
    fn connect(&self, dsn: &str) -> Result<Self::Client, TarsqlError>;
}
