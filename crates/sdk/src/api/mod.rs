//! Typed endpoint groups of the scheduling API.

mod jobs;
mod stats;

pub use jobs::{ExecutionQuery, JobListQuery, JobsApi};
pub use stats::StatsApi;

use crate::error::{SdkError, SdkResult};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Reject bodies that carry an `error` member even though the status was 2xx.
pub(crate) fn ensure_no_error(body: &Value) -> SdkResult<()> {
    match body.get("error") {
        Some(Value::Null) | None => Ok(()),
        Some(Value::String(message)) => Err(SdkError::Api {
            status: 200,
            message: message.clone(),
            details: None,
        }),
        Some(other) => Err(SdkError::Api {
            status: 200,
            message: other.to_string(),
            details: None,
        }),
    }
}

/// The payload inside a `{"data": ...}` envelope, or the body itself.
pub(crate) fn unwrap_envelope(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// The `data` member of a stats response, or an empty mapping.
pub(crate) fn data_member(body: Value) -> Value {
    match body {
        Value::Object(mut map) => map
            .remove("data")
            .filter(|data| !data.is_null())
            .unwrap_or_else(|| Value::Object(Map::new())),
        _ => Value::Object(Map::new()),
    }
}

/// A list stored under `key`, either at the top level or inside `data`.
/// A missing list reads as empty.
pub(crate) fn list_member<T: DeserializeOwned>(body: Value, key: &str) -> SdkResult<Vec<T>> {
    let list = match body {
        Value::Object(mut map) => match map.remove(key) {
            Some(list) => list,
            None => match map.remove("data") {
                Some(Value::Object(mut data)) => data.remove(key).unwrap_or(Value::Null),
                _ => Value::Null,
            },
        },
        _ => Value::Null,
    };

    if list.is_null() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_value(list)?)
}
