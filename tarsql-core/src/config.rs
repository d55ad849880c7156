//! Connection configuration.

use std::fmt;

use indexmap::IndexMap;
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::errors::TarsqlError;

/// Value of a connection option. Options end up in the query
/// string of the connection URI.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OptionValue::Bool(true) => write!(f, "1"),
            OptionValue::Bool(false) => write!(f, "0"),
            OptionValue::Integer(v) => write!(f, "{v}"),
            OptionValue::Float(v) => write!(f, "{v}"),
            OptionValue::String(v) => write!(f, "{v}"),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(v: bool) -> Self {
        OptionValue::Bool(v)
    }
}

impl From<i64> for OptionValue {
    fn from(v: i64) -> Self {
        OptionValue::Integer(v)
    }
}

impl From<f64> for OptionValue {
    fn from(v: f64) -> Self {
        OptionValue::Float(v)
    }
}

impl From<&str> for OptionValue {
    fn from(v: &str) -> Self {
        OptionValue::String(v.to_string())
    }
}

/// Ports come as integers or, from templated configs, as strings.
/// An empty string means no port.
fn deserialize_port<'de, D>(deserializer: D) -> Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Port {
        Number(u16),
        Text(String),
    }

    match Option::<Port>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Port::Number(port)) => Ok(Some(port)),
        Some(Port::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(None);
            }
            text.parse::<u16>()
                .map(Some)
                .map_err(|_| de::Error::custom(format!("invalid port \"{text}\"")))
        }
    }
}

/// Connection settings as the application configures them.
///
/// A non-empty `dsn` overrides every other addressing key.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub dsn: Option<String>,
    pub host: Option<String>,
    #[serde(deserialize_with = "deserialize_port")]
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    /// URI scheme, `tcp` when empty.
    #[serde(rename = "type")]
    pub conn_type: Option<String>,
    pub options: IndexMap<String, OptionValue>,
}

impl ConnectionConfig {
    /// Parse a YAML configuration document.
    ///
    /// # Errors
    /// - The document is not valid YAML or has keys of a wrong type.
    pub fn from_yaml(s: &str) -> Result<Self, TarsqlError> {
        Ok(serde_yaml::from_str(s)?)
    }

    #[must_use]
    pub fn with_host(host: &str, port: Option<u16>) -> Self {
        ConnectionConfig {
            host: Some(host.to_string()),
            port,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn credentials(mut self, username: &str, password: &str) -> Self {
        self.username = Some(username.to_string());
        self.password = Some(password.to_string());
        self
    }

    #[must_use]
    pub fn option(mut self, name: &str, value: impl Into<OptionValue>) -> Self {
        self.options.insert(name.to_string(), value.into());
        self
    }
}

#[cfg(test)]
mod tests;
