//! Lenient accessors over loosely structured upstream JSON.
//!
//! Every accessor returns `None` instead of failing when a key is missing or
//! has an unexpected type.

use serde_json::Value;

/// Walk nested object keys
pub fn at<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().try_fold(value, |current, key| current.get(*key))
}

/// First element of the array stored under `key`
pub fn first<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.get(key)?.as_array()?.first()
}

/// Elements of the array stored under `key` (empty when absent)
pub fn items<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Non-blank string at `keys`. Numbers are rendered, since ids arrive as
/// either type.
pub fn text(value: &Value, keys: &[&str]) -> Option<String> {
    as_text(at(value, keys)?)
}

pub fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Number at `keys`, accepting numeric strings
pub fn number(value: &Value, keys: &[&str]) -> Option<f64> {
    as_number(at(value, keys)?)
}

pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

/// Non-negative whole number at `keys`
pub fn count(value: &Value, keys: &[&str]) -> Option<u32> {
    as_count(at(value, keys)?)
}

pub fn as_count(value: &Value) -> Option<u32> {
    let n = as_number(value)?;
    if n < 0.0 || n.fract() != 0.0 || n > u32::MAX as f64 {
        return None;
    }
    Some(n as u32)
}

pub fn boolean(value: &Value, keys: &[&str]) -> Option<bool> {
    at(value, keys)?.as_bool()
}
