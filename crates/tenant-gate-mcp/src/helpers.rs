//! Helper utilities shared by the executor and the tools

use hdbconnect_async::HdbValue;
use serde_json::Value;

use crate::Error;
use crate::pool::{Pool, PooledConnection};

/// Get a connection from the pool
pub async fn get_connection(pool: &Pool) -> Result<PooledConnection, Error> {
    Box::pin(pool.get()).await.map_err(|e| {
        tracing::warn!(error = %e, "Failed to acquire pooled connection");
        Error::PoolExhausted
    })
}

/// Convert `HdbValue` to `serde_json::Value`
///
/// Decimals and date/time values become strings so no precision is lost.
pub fn hdb_value_to_json(value: &HdbValue) -> Value {
    match value {
        HdbValue::NULL => Value::Null,
        HdbValue::TINYINT(v) => serde_json::json!(v),
        HdbValue::SMALLINT(v) => serde_json::json!(v),
        HdbValue::INT(v) => serde_json::json!(v),
        HdbValue::BIGINT(v) => serde_json::json!(v),
        HdbValue::DECIMAL(v) => serde_json::json!(v.to_string()),
        HdbValue::REAL(v) => serde_json::json!(v),
        HdbValue::DOUBLE(v) => serde_json::json!(v),
        HdbValue::STRING(v) => serde_json::json!(v),
        HdbValue::BOOLEAN(v) => serde_json::json!(v),
        HdbValue::DAYDATE(v) => serde_json::json!(v.to_string()),
        HdbValue::SECONDDATE(v) => serde_json::json!(v.to_string()),
        HdbValue::LONGDATE(v) => serde_json::json!(v.to_string()),
        HdbValue::SECONDTIME(v) => serde_json::json!(v.to_string()),
        _ => serde_json::json!(format!("{value:?}")),
    }
}

/// Read an integer out of a JSON cell.
///
/// Aggregates come back as numbers or, for `DECIMAL` results, as numeric
/// strings. `NULL` and unparsable cells read as zero.
pub fn json_to_i64(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.round() as i64))
            .unwrap_or_default(),
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .ok()
            .or_else(|| s.trim().parse::<f64>().ok().map(|f| f.round() as i64))
            .unwrap_or_default(),
        _ => 0,
    }
}

/// Read a float out of a JSON cell, `None` for `NULL` or non-numeric text.
pub fn json_to_f64(value: Option<&Value>) -> Option<f64> {
    match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Read a text cell, rendering non-string scalars.
pub fn json_to_string(value: Option<&Value>) -> Option<String> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    }
}

/// First `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
