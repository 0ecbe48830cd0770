//! Submitted plugin values.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single submitted scalar.
///
/// Serialized untagged, so YAML and JSON see plain `true`, `"text"` or `null`.
/// Select variables store the chosen option's value here as well.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Text(String),
    Null,
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short name of the tag, used in validation messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "boolean",
            Value::Text(_) => "string",
            Value::Null => "null",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Text(s) => f.write_str(s),
            Value::Null => Ok(()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// Variable name to submitted value, in submission order.
pub type PluginValues = IndexMap<String, Value>;

/// Build a [`PluginValues`] map from `(name, value)` pairs.
pub fn values_from<K, V, I>(pairs: I) -> PluginValues
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Text value of `key`, if present and textual.
pub fn text_value<'a>(values: &'a PluginValues, key: &str) -> Option<&'a str> {
    values.get(key).and_then(Value::as_str)
}
