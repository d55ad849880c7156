use smol_str::{format_smolstr, SmolStr, ToSmolStr};
use std::fmt;

use crate::ir::value::Value;

/// Reason or object of errors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Entity {
    /// general variant for a table column
    Column,
    /// corresponding to struct ConnectionConfig
    Config,
    /// corresponding to struct Connection
    Connection,
    /// connection URI
    Dsn,
    /// column metadata of a query result
    Metadata,
    /// raw msgpack payload
    MsgPack,
    /// corresponds to struct PatternWithParams
    PatternWithParams,
    /// SQL query
    Query,
    /// corresponds to struct ProducerResult
    ProducerResult,
    /// corresponds to struct ConsumerResult
    ConsumerResult,
    /// general variant for result rows
    Row,
    /// SQL statement
    Statement,
    /// table (space) of the instance
    Table,
    /// tarantool instance
    Tarantool,
    /// general variant for value of some object
    Value,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let p = match self {
            Entity::Column => "column".to_smolstr(),
            Entity::Config => "configuration".to_smolstr(),
            Entity::Connection => "connection".to_smolstr(),
            Entity::ConsumerResult => "consumer result".to_smolstr(),
            Entity::Dsn => "DSN".to_smolstr(),
            Entity::Metadata => "metadata".to_smolstr(),
            Entity::MsgPack => "msgpack".to_smolstr(),
            Entity::PatternWithParams => "pattern with parameters".to_smolstr(),
            Entity::ProducerResult => "producer result".to_smolstr(),
            Entity::Query => "query".to_smolstr(),
            Entity::Row => "row".to_smolstr(),
            Entity::Statement => "statement".to_smolstr(),
            Entity::Table => "table".to_smolstr(),
            Entity::Tarantool => "tarantool".to_smolstr(),
            Entity::Value => "value".to_smolstr(),
        };
        write!(f, "{p}")
    }
}

/// Action that failed
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Connect,
    Decode,
    Encode,
    Execute,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let p = match self {
            Action::Connect => "connect".to_smolstr(),
            Action::Decode => "decode".to_smolstr(),
            Action::Encode => "encode".to_smolstr(),
            Action::Execute => "execute".to_smolstr(),
        };
        write!(f, "{p}")
    }
}

/// A failed statement together with everything needed to reproduce it.
#[derive(Clone, Debug, PartialEq)]
pub struct QueryError {
    pub sql: String,
    pub params: Vec<Value>,
    pub cause: TarsqlError,
}

impl QueryError {
    #[must_use]
    pub fn new(sql: &str, params: &[Value], cause: TarsqlError) -> Self {
        QueryError {
            sql: sql.to_string(),
            params: params.to_vec(),
            cause,
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let params = self
            .params
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<String>>()
            .join(", ");
        write!(
            f,
            "{} (SQL: {}, bindings: [{params}])",
            self.cause, self.sql
        )
    }
}

/// Types of error
#[derive(Clone, Debug, PartialEq)]
pub enum TarsqlError {
    /// Process of Action variant failed.
    /// Second param represents object of action.
    /// Third param represents reason of fail.
    FailedTo(Action, Option<Entity>, SmolStr),
    /// Object is invalid.
    /// Second param represents description and can be empty (None).
    Invalid(Entity, Option<SmolStr>),
    /// Object not found.
    /// Second param represents description or name that let to identify object.
    NotFound(Entity, SmolStr),
    /// Error raised by object parsing.
    /// Second param represents error description.
    ParsingError(Entity, SmolStr),
    /// A statement sent to the client failed.
    Query(Box<QueryError>),
    /// Object is not supported.
    /// Second param represents description or name that let to identify object.
    /// and can be empty (None).
    Unsupported(Entity, Option<SmolStr>),
    Other(SmolStr),
}

impl TarsqlError {
    /// Attach the failed statement and its bindings to the error.
    #[must_use]
    pub fn in_query(self, sql: &str, params: &[Value]) -> Self {
        TarsqlError::Query(Box::new(QueryError::new(sql, params, self)))
    }
}

impl fmt::Display for TarsqlError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let p: SmolStr = match self {
            TarsqlError::FailedTo(a, e, s) => match e {
                Some(entity) => format_smolstr!("failed to {a} {entity}: {s}"),
                None => format_smolstr!("failed to {a} {s}"),
            },
            TarsqlError::Invalid(e, s) => match s {
                Some(msg) => format_smolstr!("invalid {e}: {msg}"),
                None => format_smolstr!("invalid {e}"),
            },
            TarsqlError::NotFound(e, s) => format_smolstr!("{e} {s} not found"),
            TarsqlError::ParsingError(e, s) => format_smolstr!("{e} parsing error: {s}"),
            TarsqlError::Query(err) => format_smolstr!("{err}"),
            TarsqlError::Unsupported(e, s) => match s {
                Some(msg) => format_smolstr!("unsupported {e}: {msg}"),
                None => format_smolstr!("unsupported {e}"),
            },
            TarsqlError::Other(s) => s.clone(),
        };

        write!(f, "{p}")
    }
}

impl std::error::Error for TarsqlError {}

impl From<serde_yaml::Error> for TarsqlError {
    fn from(error: serde_yaml::Error) -> Self {
        TarsqlError::Invalid(Entity::Config, Some(format_smolstr!("{error}")))
    }
}

impl From<rmpv::decode::Error> for TarsqlError {
    fn from(error: rmpv::decode::Error) -> Self {
        TarsqlError::FailedTo(
            Action::Decode,
            Some(Entity::MsgPack),
            format_smolstr!("{error}"),
        )
    }
}

#[cfg(feature = "tarantool")]
impl From<tarantool::error::Error> for TarsqlError {
    fn from(error: tarantool::error::Error) -> Self {
        TarsqlError::FailedTo(
            Action::Execute,
            Some(Entity::Tarantool),
            format_smolstr!("{error}"),
        )
    }
}

#[cfg(test)]
mod tests;
