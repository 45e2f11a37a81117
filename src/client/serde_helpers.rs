//! Deserializers for numbers that nodes encode either as JSON strings or numbers

use eyre::{eyre, Result};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Number(u64),
}

/// Deserialize a `u64` from `"123"` or `123`
pub(crate) fn u64_from_any<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s.parse().map_err(D::Error::custom),
        StringOrNumber::Number(n) => Ok(n),
    }
}

/// Read a `u64` out of a JSON value holding a string or a number
pub(crate) fn value_to_u64(value: &Value) -> Result<u64> {
    match value {
        Value::String(s) => s
            .parse()
            .map_err(|e| eyre!("Invalid integer {s:?}: {e}")),
        Value::Number(n) => n.as_u64().ok_or_else(|| eyre!("Invalid integer {n}")),
        other => Err(eyre!("Expected an integer, got {other}")),
    }
}
