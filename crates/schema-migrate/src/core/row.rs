//! Metadata rows returned by the connection collaborator.

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::{Result, SchemaError};

/// One result row: ordered mapping of column name to scalar value.
pub type Row = IndexMap<String, Value>;

/// Raw introspection output for one table, still in dialect-native shape.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub columns: Vec<Row>,
    pub constraints: Vec<Row>,
    pub indexes: Vec<Row>,
}

/// Lenient accessors over a [`Row`].
///
/// Drivers disagree on key case (`Field` vs `field`) and on scalar
/// encoding (numbers as strings, booleans as 0/1), so lookups fall back to
/// a case-insensitive key match and values are coerced.
pub trait RowExt {
    /// Raw value for `key`, ignoring key case when no exact match exists.
    fn value(&self, key: &str) -> Option<&Value>;

    /// Value as a string; `None` for SQL NULL or a missing key.
    fn get_str(&self, key: &str) -> Option<String> {
        scalar_to_string(self.value(key)?)
    }

    /// Value as a string, failing when absent.
    fn require_str(&self, key: &str) -> Result<String> {
        self.get_str(key)
            .ok_or_else(|| SchemaError::MalformedRow(format!("missing '{}'", key)))
    }

    /// Value as an unsigned integer, accepting numeric strings.
    fn get_u32(&self, key: &str) -> Option<u32> {
        scalar_to_u32(self.value(key)?)
    }
}

impl RowExt for Row {
    fn value(&self, key: &str) -> Option<&Value> {
        self.get(key).or_else(|| {
            self.iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(key))
                .map(|(_, v)| v)
        })
    }
}

/// Render a JSON scalar as text. Arrays and objects are not scalars.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(if *b { "1".into() } else { "0".into() }),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Interpret a JSON scalar as an unsigned integer.
pub fn scalar_to_u32(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Truthiness check used for dump flags: `true`, non-zero numbers, and
/// non-empty strings other than `"0"`/`"false"`.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => !(s.is_empty() || s == "0" || s.eq_ignore_ascii_case("false")),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Build a row from `(key, value)` pairs.
pub fn row<I, K, V>(pairs: I) -> Row
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
