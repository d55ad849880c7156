//! SQL client over Tarantool `net.box`.
//!
//! Statements are evaluated remotely through `box.execute`. The client
//! runs inside a Tarantool process, as `net.box` is driven by its fibers.

use std::time::Duration;

use smol_str::format_smolstr;
use tarantool::net_box::{Conn, ConnOptions, Options};
use tarantool::tuple::TupleBuffer;

use tarsql::backend::sql::ir::PatternWithParams;
use tarsql::dsn::Dsn;
use tarsql::errors::{Action, Entity, TarsqlError};
use tarsql::executor::engine::{Connector, SqlClient};
use tarsql::executor::result::{ConsumerResult, ExecuteResult, ProducerResult};
use tarsql::ir::value::Value;
use tarsql::{debug, warn};

/// Port of a Tarantool instance when the URI names none.
pub const DEFAULT_PORT: u16 = 3301;

/// Connection timeout when the URI has no `connect_timeout` option.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

const EXECUTE_LUA: &str = r"
local sql, params = ...
local result, err = box.execute(sql, params)
if err ~= nil then
    error(err)
end
return result
";

/// Opens `net.box` connections from `tcp://` URIs.
#[derive(Clone, Copy, Debug, Default)]
pub struct NetBoxConnector;

impl Connector for NetBoxConnector {
    type Client = NetBoxClient;

    fn connect(&self, dsn: &str) -> Result<NetBoxClient, TarsqlError> {
        let dsn = Dsn::parse(dsn)?;
        if dsn.scheme != "tcp" {
            return Err(TarsqlError::Unsupported(
                Entity::Dsn,
                Some(format_smolstr!("connection type {}", dsn.scheme)),
            ));
        }
        let connect_timeout = dsn
            .duration("connect_timeout")?
            .unwrap_or(DEFAULT_CONNECT_TIMEOUT);
        let port = dsn.port.unwrap_or(DEFAULT_PORT);
        let options = ConnOptions {
            user: dsn.user.clone().unwrap_or_default(),
            password: dsn.password.clone().unwrap_or_default(),
            connect_timeout,
            ..ConnOptions::default()
        };

        let conn = Conn::new((dsn.host.as_str(), port), options, None)?;
        if !conn.wait_connected(Some(connect_timeout))? {
            return Err(TarsqlError::FailedTo(
                Action::Connect,
                Some(Entity::Tarantool),
                format_smolstr!("{}:{port} is not reachable", dsn.host),
            ));
        }
        debug!(
            Option::from("net.box"),
            &format!("connected to {}:{port}", dsn.host),
        );
        Ok(NetBoxClient { conn })
    }
}

pub struct NetBoxClient {
    conn: Conn,
}

impl NetBoxClient {
    fn eval(&self, sql: &str, params: &[Value]) -> Result<ExecuteResult, TarsqlError> {
        let pattern = PatternWithParams::new(sql.to_string(), params.to_vec());
        let args = rmp_serde::to_vec(&pattern).map_err(|e| {
            TarsqlError::FailedTo(
                Action::Encode,
                Some(Entity::PatternWithParams),
                format_smolstr!("{e}"),
            )
        })?;
        let args = TupleBuffer::try_from_vec(args)?;

        let Some(tuple) = self.conn.eval(EXECUTE_LUA, &args, &Options::default())? else {
            return Err(TarsqlError::NotFound(
                Entity::ProducerResult,
                format_smolstr!("in the reply to {sql}"),
            ));
        };
        let mut values = tuple.decode::<Vec<rmpv::Value>>()?;
        if values.is_empty() {
            return Err(TarsqlError::NotFound(
                Entity::ProducerResult,
                format_smolstr!("in the reply to {sql}"),
            ));
        }
        ExecuteResult::try_from(values.swap_remove(0))
    }
}

impl SqlClient for NetBoxClient {
    fn execute_query(&self, sql: &str, params: &[Value]) -> Result<ProducerResult, TarsqlError> {
        match self.eval(sql, params)? {
            ExecuteResult::Query(result) => Ok(result),
            ExecuteResult::Update(_) => Err(TarsqlError::Invalid(
                Entity::ProducerResult,
                Some(format_smolstr!("statement {sql} returned no tuples")),
            )),
        }
    }

    fn execute_update(&self, sql: &str, params: &[Value]) -> Result<ConsumerResult, TarsqlError> {
        match self.eval(sql, params)? {
            ExecuteResult::Update(result) => Ok(result),
            ExecuteResult::Query(result) => {
                warn!(
                    Option::from("net.box"),
                    &format!("statement {sql} returned tuples, only their count is kept"),
                );
                Ok(ConsumerResult::new(result.rows.len() as u64))
            }
        }
    }

    fn execute(&self, sql: &str) -> Result<ExecuteResult, TarsqlError> {
        self.eval(sql, &[])
    }
}
