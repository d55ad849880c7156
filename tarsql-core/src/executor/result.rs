//! Result module.
//! Result is everything that is returned from the statement execution.
//!
//! When executing a query (SELECT) we get `ProducerResult`, which fields are:
//! * `metadata` (Vec of `MetadataColumn`): names and types of the columns
//!   (even if the number of returned rows is 0)
//! * `rows` (Vec of Vec of `Value`): resulting tuples of values
//!
//! Any other statement gives `ConsumerResult`, which fields are:
//! * `row_count` (u64): the number of affected tuples (that may be equal to 0)
//! * `autoincrement_ids` (Vec of `Value`): identifiers generated by the statement
//!
//! Both are decoded from msgpack in the two shapes Tarantool produces: the
//! IPROTO response body with integer keys and the Lua table `box.execute`
//! returns.

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use smol_str::{format_smolstr, SmolStr};

use crate::errors::{Entity, TarsqlError};
use crate::ir::value::Value;

pub const IPROTO_DATA: u64 = 0x30;
pub const IPROTO_METADATA: u64 = 0x32;
pub const IPROTO_SQL_INFO: u64 = 0x42;
pub const IPROTO_FIELD_NAME: u64 = 0x00;
pub const IPROTO_FIELD_TYPE: u64 = 0x01;
pub const SQL_INFO_ROW_COUNT: u64 = 0x00;
pub const SQL_INFO_AUTOINCREMENT_IDS: u64 = 0x01;

/// Key of the update count record.
pub const INFO_KEY: &str = "info";

/// A result row: lower-cased column name to value, in column order.
pub type Record = IndexMap<SmolStr, Value>;

type MsgPackMap = Vec<(rmpv::Value, rmpv::Value)>;

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct MetadataColumn {
    pub name: String,
    pub r#type: String,
}

impl MetadataColumn {
    #[must_use]
    pub fn new(name: String, r#type: String) -> Self {
        MetadataColumn { name, r#type }
    }
}

impl Serialize for MetadataColumn {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("name", &self.name)?;
        map.serialize_entry("type", &self.r#type)?;
        map.end()
    }
}

/// Results of query execution for `SELECT`.
#[allow(clippy::module_name_repetitions)]
#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct ProducerResult {
    pub metadata: Vec<MetadataColumn>,
    pub rows: Vec<Vec<Value>>,
}

impl ProducerResult {
    /// Create an empty result set for a query producing tuples.
    #[must_use]
    pub fn new() -> Self {
        ProducerResult {
            metadata: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Lower-case every metadata string: column names and type names.
    pub fn lowercase_metadata(&mut self) {
        for column in &mut self.metadata {
            column.name = column.name.to_lowercase();
            column.r#type = column.r#type.to_lowercase();
        }
    }

    /// Rows as records keyed by the lower-cased column names.
    #[must_use]
    pub fn records(&self) -> Vec<Record> {
        let names: Vec<SmolStr> = self
            .metadata
            .iter()
            .map(|c| SmolStr::from(c.name.to_lowercase()))
            .collect();
        self.rows
            .iter()
            .map(|row| names.iter().cloned().zip(row.iter().cloned()).collect())
            .collect()
    }
}

impl Serialize for ProducerResult {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("metadata", &self.metadata)?;
        map.serialize_entry("rows", &self.rows)?;
        map.end()
    }
}

/// Results of statement execution for anything but `SELECT`.
#[allow(clippy::module_name_repetitions)]
#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct ConsumerResult {
    pub row_count: u64,
    pub autoincrement_ids: Vec<Value>,
}

impl ConsumerResult {
    /// Create an empty result for a statement consuming tuples.
    #[must_use]
    pub fn new(row_count: u64) -> Self {
        ConsumerResult {
            row_count,
            autoincrement_ids: Vec::new(),
        }
    }
}

impl Serialize for ConsumerResult {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("row_count", &self.row_count)?;
        map.serialize_entry("autoincrement_ids", &self.autoincrement_ids)?;
        map.end()
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ExecuteResult {
    Query(ProducerResult),
    Update(ConsumerResult),
}

impl ExecuteResult {
    /// Returned rows of a query, affected rows of an update.
    #[must_use]
    pub fn row_count(&self) -> u64 {
        match self {
            ExecuteResult::Query(result) => result.rows.len() as u64,
            ExecuteResult::Update(result) => result.row_count,
        }
    }

    /// Normalize the result into records. An update gives a single
    /// `{info: row_count}` record.
    #[must_use]
    pub fn records(&self) -> Vec<Record> {
        match self {
            ExecuteResult::Query(result) => result.records(),
            ExecuteResult::Update(result) => {
                let mut record = Record::with_capacity(1);
                record.insert(SmolStr::from(INFO_KEY), Value::from(result.row_count));
                vec![record]
            }
        }
    }

    /// Decode a msgpack encoded result.
    ///
    /// # Errors
    /// - The payload is not valid msgpack or has an unexpected shape.
    pub fn decode(mut data: &[u8]) -> Result<Self, TarsqlError> {
        let value = rmpv::decode::read_value(&mut data)?;
        ExecuteResult::try_from(value)
    }
}

impl From<ProducerResult> for ExecuteResult {
    fn from(result: ProducerResult) -> Self {
        ExecuteResult::Query(result)
    }
}

impl From<ConsumerResult> for ExecuteResult {
    fn from(result: ConsumerResult) -> Self {
        ExecuteResult::Update(result)
    }
}

impl Serialize for ExecuteResult {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ExecuteResult::Query(result) => result.serialize(serializer),
            ExecuteResult::Update(result) => result.serialize(serializer),
        }
    }
}

/// Remove the field stored either under the IPROTO code or under
/// the Lua name.
fn take_field(map: &mut MsgPackMap, code: u64, name: &str) -> Option<rmpv::Value> {
    let pos = map
        .iter()
        .position(|(key, _)| key.as_u64() == Some(code) || key.as_str() == Some(name))?;
    Some(map.swap_remove(pos).1)
}

fn into_map(value: rmpv::Value, entity: Entity) -> Result<MsgPackMap, TarsqlError> {
    match value {
        rmpv::Value::Map(map) => Ok(map),
        other => Err(TarsqlError::Invalid(
            entity,
            Some(format_smolstr!("expected a map, got {other:?}")),
        )),
    }
}

fn into_array(value: rmpv::Value, entity: Entity) -> Result<Vec<rmpv::Value>, TarsqlError> {
    match value {
        rmpv::Value::Array(array) => Ok(array),
        other => Err(TarsqlError::Invalid(
            entity,
            Some(format_smolstr!("expected an array, got {other:?}")),
        )),
    }
}

fn into_string(value: rmpv::Value) -> Result<String, TarsqlError> {
    match Value::try_from(value)? {
        Value::String(s) => Ok(s),
        other => Err(TarsqlError::Invalid(
            Entity::Metadata,
            Some(format_smolstr!("expected a string, got {other}")),
        )),
    }
}

impl TryFrom<rmpv::Value> for MetadataColumn {
    type Error = TarsqlError;

    fn try_from(value: rmpv::Value) -> Result<Self, Self::Error> {
        let mut map = into_map(value, Entity::Metadata)?;
        let name = take_field(&mut map, IPROTO_FIELD_NAME, "name")
            .ok_or_else(|| TarsqlError::NotFound(Entity::Metadata, "column name".into()))?;
        let r#type = take_field(&mut map, IPROTO_FIELD_TYPE, "type")
            .ok_or_else(|| TarsqlError::NotFound(Entity::Metadata, "column type".into()))?;
        Ok(MetadataColumn::new(into_string(name)?, into_string(r#type)?))
    }
}

fn decode_rows(value: rmpv::Value, width: usize) -> Result<Vec<Vec<Value>>, TarsqlError> {
    into_array(value, Entity::Row)?
        .into_iter()
        .map(|row| {
            let row = into_array(row, Entity::Row)?
                .into_iter()
                .map(Value::try_from)
                .collect::<Result<Vec<Value>, TarsqlError>>()?;
            if row.len() != width {
                return Err(TarsqlError::Invalid(
                    Entity::Row,
                    Some(format_smolstr!(
                        "row has {} values, metadata has {width} columns",
                        row.len()
                    )),
                ));
            }
            Ok(row)
        })
        .collect()
}

fn decode_ids(value: Option<rmpv::Value>) -> Result<Vec<Value>, TarsqlError> {
    match value {
        None | Some(rmpv::Value::Nil) => Ok(Vec::new()),
        Some(ids) => into_array(ids, Entity::ConsumerResult)?
            .into_iter()
            .map(Value::try_from)
            .collect(),
    }
}

fn decode_row_count(value: Option<rmpv::Value>) -> Result<u64, TarsqlError> {
    match value {
        None => Ok(0),
        Some(count) => count.as_u64().ok_or_else(|| {
            TarsqlError::Invalid(
                Entity::ConsumerResult,
                Some(format_smolstr!("row count {count:?}")),
            )
        }),
    }
}

impl TryFrom<rmpv::Value> for ExecuteResult {
    type Error = TarsqlError;

    fn try_from(value: rmpv::Value) -> Result<Self, Self::Error> {
        let mut body = into_map(value, Entity::ProducerResult)?;

        if let Some(metadata) = take_field(&mut body, IPROTO_METADATA, "metadata") {
            let metadata = into_array(metadata, Entity::Metadata)?
                .into_iter()
                .map(MetadataColumn::try_from)
                .collect::<Result<Vec<_>, TarsqlError>>()?;
            let rows = match take_field(&mut body, IPROTO_DATA, "rows") {
                Some(rows) => decode_rows(rows, metadata.len())?,
                None => Vec::new(),
            };
            return Ok(ExecuteResult::Query(ProducerResult { metadata, rows }));
        }

        if let Some(info) = take_field(&mut body, IPROTO_SQL_INFO, "sql_info") {
            let mut info = into_map(info, Entity::ConsumerResult)?;
            return Ok(ExecuteResult::Update(ConsumerResult {
                row_count: decode_row_count(take_field(
                    &mut info,
                    SQL_INFO_ROW_COUNT,
                    "row_count",
                ))?,
                autoincrement_ids: decode_ids(take_field(
                    &mut info,
                    SQL_INFO_AUTOINCREMENT_IDS,
                    "autoincrement_ids",
                ))?,
            }));
        }

        // The Lua table keeps the update info at the top level.
        let row_count = body
            .iter()
            .position(|(key, _)| key.as_str() == Some("row_count"))
            .map(|pos| body.swap_remove(pos).1);
        let Some(row_count) = row_count else {
            return Err(TarsqlError::Invalid(
                Entity::ProducerResult,
                Some("result has neither metadata nor row count".into()),
            ));
        };
        let ids = body
            .iter()
            .position(|(key, _)| key.as_str() == Some("autoincrement_ids"))
            .map(|pos| body.swap_remove(pos).1);
        Ok(ExecuteResult::Update(ConsumerResult {
            row_count: decode_row_count(Some(row_count))?,
            autoincrement_ids: decode_ids(ids)?,
        }))
    }
}
