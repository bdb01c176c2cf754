//! Lenient deserializers for stored-procedure rows.
//!
//! Postgres `numeric` columns may arrive as JSON numbers or as strings, and
//! aggregates over empty sets arrive as `null`. Row structs apply their
//! defaults here so consumers never see a missing value.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn value_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Number, numeric string, or `null` → `f64` (missing and `null` become 0).
///
/// Use together with `#[serde(default)]`.
pub fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Null => Ok(0.0),
        other => value_to_f64(&other)
            .ok_or_else(|| serde::de::Error::custom(format!("expected a number, got {other}"))),
    }
}

/// Like [`number`] but keeps `null` as `None`.
pub fn opt_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Null => Ok(None),
        other => value_to_f64(&other)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("expected a number, got {other}"))),
    }
}

/// Boolean that also accepts `"true"`/`"false"`, `0`/`1` and `null` (false).
pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Null => Ok(false),
        Value::Bool(b) => Ok(b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "t" | "yes" | "1" => Ok(true),
            "false" | "f" | "no" | "0" | "" => Ok(false),
            other => Err(serde::de::Error::custom(format!("expected a boolean, got {other}"))),
        },
        Value::Number(n) => Ok(n.as_f64().is_some_and(|v| v != 0.0)),
        other => Err(serde::de::Error::custom(format!("expected a boolean, got {other}"))),
    }
}

/// Any scalar rendered as text; `null` → `None`.
///
/// Phone numbers and dates come back as text from some procedures and as
/// numbers or timestamps from others.
pub fn opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        other => Err(serde::de::Error::custom(format!("expected text, got {other}"))),
    }
}
