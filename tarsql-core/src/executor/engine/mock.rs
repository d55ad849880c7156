use std::cell::RefCell;
use std::collections::VecDeque;

use smol_str::format_smolstr;

use crate::backend::sql::ir::PatternWithParams;
use crate::errors::{Action, Entity, TarsqlError};
use crate::executor::engine::{Connector, SqlClient};
use crate::executor::result::{ConsumerResult, ExecuteResult, ProducerResult};
use crate::ir::value::Value;

/// A call received by the mock client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MockCall {
    Query(PatternWithParams),
    Update(PatternWithParams),
    Execute(String),
}

/// In-memory client. Records every call and answers data statements
/// with the queued results, in order. With nothing queued a query
/// returns no rows and an update affects no rows.
#[allow(clippy::module_name_repetitions)]
#[derive(Debug, Default)]
pub struct MockClient {
    dsn: String,
    calls: RefCell<Vec<MockCall>>,
    results: RefCell<VecDeque<Result<ExecuteResult, TarsqlError>>>,
    session_error: Option<TarsqlError>,
}

impl MockClient {
    #[must_use]
    pub fn new(dsn: &str) -> Self {
        MockClient {
            dsn: dsn.to_string(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn dsn(&self) -> &str {
        &self.dsn
    }

    pub fn push_result(&self, result: Result<ExecuteResult, TarsqlError>) {
        self.results.borrow_mut().push_back(result);
    }

    /// Make every session command fail with the error.
    pub fn fail_session(&mut self, error: TarsqlError) {
        self.session_error = Some(error);
    }

    #[must_use]
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.borrow().clone()
    }

    fn next_result(&self) -> Option<Result<ExecuteResult, TarsqlError>> {
        self.results.borrow_mut().pop_front()
    }
}

impl SqlClient for MockClient {
    fn execute_query(&self, sql: &str, params: &[Value]) -> Result<ProducerResult, TarsqlError> {
        self.calls.borrow_mut().push(MockCall::Query(PatternWithParams::new(
            sql.to_string(),
            params.to_vec(),
        )));
        match self.next_result().transpose()? {
            None => Ok(ProducerResult::new()),
            Some(ExecuteResult::Query(result)) => Ok(result),
            Some(other) => Err(TarsqlError::FailedTo(
                Action::Execute,
                Some(Entity::Query),
                format_smolstr!("queued result {other:?} does not produce tuples"),
            )),
        }
    }

    fn execute_update(&self, sql: &str, params: &[Value]) -> Result<ConsumerResult, TarsqlError> {
        self.calls.borrow_mut().push(MockCall::Update(PatternWithParams::new(
            sql.to_string(),
            params.to_vec(),
        )));
        match self.next_result().transpose()? {
            None => Ok(ConsumerResult::default()),
            Some(ExecuteResult::Update(result)) => Ok(result),
            Some(other) => Err(TarsqlError::FailedTo(
                Action::Execute,
                Some(Entity::Statement),
                format_smolstr!("queued result {other:?} does not consume tuples"),
            )),
        }
    }

    fn execute(&self, sql: &str) -> Result<ExecuteResult, TarsqlError> {
        self.calls
            .borrow_mut()
            .push(MockCall::Execute(sql.to_string()));
        match &self.session_error {
            Some(error) => Err(error.clone()),
            None => Ok(ExecuteResult::Update(ConsumerResult::new(1))),
        }
    }
}

/// Hands out mock clients, or fails every connection attempt.
#[allow(clippy::module_name_repetitions)]
#[derive(Debug, Default)]
pub struct MockConnector {
    error: Option<TarsqlError>,
    results: RefCell<Vec<Result<ExecuteResult, TarsqlError>>>,
}

impl MockConnector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn failing(error: TarsqlError) -> Self {
        MockConnector {
            error: Some(error),
            ..Default::default()
        }
    }

    /// Results queued on the next client.
    #[must_use]
    pub fn with_results(results: Vec<Result<ExecuteResult, TarsqlError>>) -> Self {
        MockConnector {
            results: RefCell::new(results),
            ..Default::default()
        }
    }
}

impl Connector for MockConnector {
    type Client = MockClient;

    fn connect(&self, dsn: &str) -> Result<MockClient, TarsqlError> {
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        let client = MockClient::new(dsn);
        for result in self.results.borrow_mut().drain(..) {
            client.push_result(result);
        }
        Ok(client)
    }
}
