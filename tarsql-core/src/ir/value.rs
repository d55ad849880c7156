//! Value module.

use std::fmt;

use serde::ser::{Serialize, Serializer};
use smol_str::format_smolstr;

use crate::errors::{Action, Entity, TarsqlError};

/// Values are used as statement bindings and as cells of the
/// result rows.
#[derive(PartialEq, Debug, Default, Clone)]
pub enum Value {
    /// Raw bytes (`varbinary`).
    Binary(Vec<u8>),
    /// Boolean type.
    Boolean(bool),
    /// Floating point type.
    Double(f64),
    /// Signed integer type.
    Integer(i64),
    /// SQL NULL.
    #[default]
    Null,
    /// String type.
    String(String),
    /// Unsigned integer type that does not fit into `i64`.
    Unsigned(u64),
}

/// `NaN` never gets into a value: it is converted to `Null`.
impl Eq for Value {}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Binary(v) => {
                write!(f, "X'")?;
                for byte in v {
                    write!(f, "{byte:02X}")?;
                }
                write!(f, "'")
            }
            Value::Boolean(v) => write!(f, "{v}"),
            Value::Null => write!(f, "NULL"),
            Value::Unsigned(v) => write!(f, "{v}"),
            Value::Integer(v) => write!(f, "{v}"),
            Value::Double(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "'{v}'"),
        }
    }
}

impl From<bool> for Value {
    fn from(f: bool) -> Self {
        Value::Boolean(f)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        match i64::try_from(v) {
            Ok(v) => Value::Integer(v),
            Err(_) => Value::Unsigned(v),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        if v.is_nan() {
            return Value::Null;
        }
        Value::Double(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Binary(v)
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Values go over the wire as plain msgpack scalars, without
/// any enum tagging.
impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Binary(v) => serializer.serialize_bytes(v),
            Value::Boolean(v) => serializer.serialize_bool(*v),
            Value::Double(v) => serializer.serialize_f64(*v),
            Value::Integer(v) => serializer.serialize_i64(*v),
            Value::Null => serializer.serialize_unit(),
            Value::String(v) => serializer.serialize_str(v),
            Value::Unsigned(v) => serializer.serialize_u64(*v),
        }
    }
}

impl TryFrom<rmpv::Value> for Value {
    type Error = TarsqlError;

    fn try_from(value: rmpv::Value) -> Result<Self, Self::Error> {
        match value {
            rmpv::Value::Nil => Ok(Value::Null),
            rmpv::Value::Boolean(v) => Ok(Value::Boolean(v)),
            rmpv::Value::Integer(v) => {
                if let Some(v) = v.as_i64() {
                    Ok(Value::Integer(v))
                } else if let Some(v) = v.as_u64() {
                    Ok(Value::Unsigned(v))
                } else {
                    Err(TarsqlError::Invalid(
                        Entity::Value,
                        Some(format_smolstr!("integer {v:?} is out of range")),
                    ))
                }
            }
            rmpv::Value::F32(v) => Ok(Value::from(f64::from(v))),
            rmpv::Value::F64(v) => Ok(Value::from(v)),
            rmpv::Value::String(v) => match v.into_str() {
                Some(s) => Ok(Value::String(s)),
                None => Err(TarsqlError::FailedTo(
                    Action::Decode,
                    Some(Entity::Value),
                    "string is not valid UTF-8".into(),
                )),
            },
            rmpv::Value::Binary(v) => Ok(Value::Binary(v)),
            other @ (rmpv::Value::Array(_) | rmpv::Value::Map(_) | rmpv::Value::Ext(..)) => {
                Err(TarsqlError::Unsupported(
                    Entity::Value,
                    Some(format_smolstr!("msgpack value {other:?}")),
                ))
            }
        }
    }
}

impl Value {
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Integer view of the value, if it has one.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            Value::Unsigned(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v.as_str()),
            _ => None,
        }
    }
}
