//! Column specifications of the schema builder.

use std::fmt;
use std::str::FromStr;

use smol_str::{format_smolstr, SmolStr};

use crate::errors::{Entity, TarsqlError};
use crate::ir::value::Value;

/// String columns get this length when none is given.
pub const DEFAULT_STRING_LENGTH: u32 = 255;

/// Portable column types understood by the schema grammar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Char,
    String,
    Text,
    MediumText,
    LongText,
    Integer,
    BigInteger,
    MediumInteger,
    TinyInteger,
    SmallInteger,
    Float,
    Double,
    Decimal,
    Boolean,
    Enum,
    Json,
    Date,
    DateTime,
    Time,
    Timestamp,
    Binary,
}

impl ColumnType {
    /// Tag of the type as the host schema builder spells it.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            ColumnType::Char => "char",
            ColumnType::String => "string",
            ColumnType::Text => "text",
            ColumnType::MediumText => "mediumText",
            ColumnType::LongText => "longText",
            ColumnType::Integer => "integer",
            ColumnType::BigInteger => "bigInteger",
            ColumnType::MediumInteger => "mediumInteger",
            ColumnType::TinyInteger => "tinyInteger",
            ColumnType::SmallInteger => "smallInteger",
            ColumnType::Float => "float",
            ColumnType::Double => "double",
            ColumnType::Decimal => "decimal",
            ColumnType::Boolean => "boolean",
            ColumnType::Enum => "enum",
            ColumnType::Json => "json",
            ColumnType::Date => "date",
            ColumnType::DateTime => "dateTime",
            ColumnType::Time => "time",
            ColumnType::Timestamp => "timestamp",
            ColumnType::Binary => "binary",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl FromStr for ColumnType {
    type Err = TarsqlError;

    /// Tags are matched case-insensitively, so both `dateTime`
    /// and `datetime` are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "char" => Ok(ColumnType::Char),
            "string" => Ok(ColumnType::String),
            "text" => Ok(ColumnType::Text),
            "mediumtext" => Ok(ColumnType::MediumText),
            "longtext" => Ok(ColumnType::LongText),
            "integer" => Ok(ColumnType::Integer),
            "biginteger" => Ok(ColumnType::BigInteger),
            "mediuminteger" => Ok(ColumnType::MediumInteger),
            "tinyinteger" => Ok(ColumnType::TinyInteger),
            "smallinteger" => Ok(ColumnType::SmallInteger),
            "float" => Ok(ColumnType::Float),
            "double" => Ok(ColumnType::Double),
            "decimal" => Ok(ColumnType::Decimal),
            "boolean" => Ok(ColumnType::Boolean),
            "enum" => Ok(ColumnType::Enum),
            "json" => Ok(ColumnType::Json),
            "date" => Ok(ColumnType::Date),
            "datetime" => Ok(ColumnType::DateTime),
            "time" => Ok(ColumnType::Time),
            "timestamp" => Ok(ColumnType::Timestamp),
            "binary" => Ok(ColumnType::Binary),
            _ => Err(TarsqlError::Unsupported(
                Entity::Column,
                Some(format_smolstr!("column type {s}")),
            )),
        }
    }
}

/// Default of a column: either a literal that gets quoted or
/// a raw SQL expression inserted verbatim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DefaultValue {
    Literal(Value),
    Raw(SmolStr),
}

/// A single column of a blueprint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: SmolStr,
    pub r#type: ColumnType,
    pub length: Option<u32>,
    pub is_nullable: bool,
    pub default: Option<DefaultValue>,
}

impl ColumnDef {
    /// A `not null` column without a default.
    #[must_use]
    pub fn new(name: &str, r#type: ColumnType) -> Self {
        ColumnDef {
            name: SmolStr::from(name),
            r#type,
            length: None,
            is_nullable: false,
            default: None,
        }
    }

    #[must_use]
    pub fn length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.is_nullable = true;
        self
    }

    #[must_use]
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(DefaultValue::Literal(value.into()));
        self
    }

    #[must_use]
    pub fn default_raw(mut self, expression: &str) -> Self {
        self.default = Some(DefaultValue::Raw(SmolStr::from(expression)));
        self
    }
}
