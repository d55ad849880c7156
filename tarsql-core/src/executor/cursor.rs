//! Cursor over an executed query.
//!
//! The rows are fetched in full before the cursor is created. A cursor
//! is traversed once; run the query again to start over.

use std::vec::IntoIter;

use smol_str::SmolStr;

use crate::executor::result::{ExecuteResult, MetadataColumn, ProducerResult, Record};
use crate::ir::value::Value;

#[derive(Debug)]
pub struct Cursor {
    metadata: Vec<MetadataColumn>,
    names: Vec<SmolStr>,
    rows: IntoIter<Vec<Value>>,
}

impl Cursor {
    /// Metadata strings (column and type names) are lower-cased.
    #[must_use]
    pub fn new(mut result: ProducerResult) -> Self {
        result.lowercase_metadata();
        let names = result
            .metadata
            .iter()
            .map(|c| SmolStr::from(c.name.as_str()))
            .collect();
        Cursor {
            metadata: result.metadata,
            names,
            rows: result.rows.into_iter(),
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Cursor::new(ProducerResult::new())
    }

    #[must_use]
    pub fn metadata(&self) -> &[MetadataColumn] {
        &self.metadata
    }
}

impl From<ExecuteResult> for Cursor {
    fn from(result: ExecuteResult) -> Self {
        match result {
            ExecuteResult::Query(result) => Cursor::new(result),
            ExecuteResult::Update(_) => Cursor::empty(),
        }
    }
}

impl Iterator for Cursor {
    type Item = Record;

    fn next(&mut self) -> Option<Record> {
        let row = self.rows.next()?;
        Some(self.names.iter().cloned().zip(row).collect())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

impl ExactSizeIterator for Cursor {}
