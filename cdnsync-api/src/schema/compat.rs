//! Lenient deserializers for the API's loosely typed JSON.
//!
//! Depending on the endpoint, the API renders numbers as strings
//! (`"version": "3"`), booleans as `0`/`1` or `"0"`/`"1"`, and unset strings as
//! `null`. These helpers accept every variant so that a listed object compares
//! equal to the object we would have sent.

use serde::{de::Error as _, Deserialize, Deserializer};
use serde_json::Value;

pub(crate) fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

pub(crate) fn number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(option_number(deserializer)?.unwrap_or_default())
}

pub(crate) fn option_number<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("expected an unsigned integer, got {}", n))),
        Value::String(s) if s.is_empty() => Ok(None),
        Value::String(s) => s
            .parse()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("expected an unsigned integer, got {:?}", s))),
        other => Err(D::Error::custom(format!(
            "expected an unsigned integer, got {}",
            other
        ))),
    }
}

pub(crate) fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(false),
        Value::Bool(b) => Ok(b),
        Value::Number(n) => Ok(n.as_u64() == Some(1)),
        Value::String(s) => match s.as_str() {
            "1" | "true" => Ok(true),
            "" | "0" | "false" => Ok(false),
            _ => Err(D::Error::custom(format!("expected a boolean, got {:?}", s))),
        },
        other => Err(D::Error::custom(format!("expected a boolean, got {}", other))),
    }
}

pub(crate) fn is_zero(n: &u32) -> bool {
    *n == 0
}

pub(crate) fn is_false(b: &bool) -> bool {
    !*b
}
