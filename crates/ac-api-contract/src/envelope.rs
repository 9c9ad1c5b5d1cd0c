// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Response envelope normalization
//!
//! The backend answers either with the payload itself or with the payload
//! wrapped as `{ "data": ... }`. Every response body goes through
//! [`unwrap_envelope`] once, at the client boundary.

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Strip a `{ "data": ... }` wrapper if present
///
/// An object is treated as an envelope only when its `data` member is
/// truthy (not null, false, zero or an empty string); anything else is
/// already the payload.
pub fn unwrap_envelope(body: Value) -> Value {
    match body {
        Value::Object(mut map) => match map.remove("data") {
            Some(data) if is_truthy(&data) => data,
            Some(data) => {
                map.insert("data".to_string(), data);
                Value::Object(map)
            }
            None => Value::Object(map),
        },
        other => other,
    }
}

/// Normalize the envelope and decode the payload
pub fn decode_enveloped<T: DeserializeOwned>(body: Value) -> Result<T, serde_json::Error> {
    serde_json::from_value(unwrap_envelope(body))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
