//! Pagination-envelope unwrapping.
//!
//! List endpoints may answer with `{"count": .., "next": .., "previous":
//! .., "results": [..]}` or with a bare array depending on whether the
//! backend paginates them. Callers always want the list, so every decoded
//! body goes through `normalize` before it is deserialized.

use serde_json::Value;

/// Key that marks a pagination envelope.
pub const RESULTS_KEY: &str = "results";

/// Return the envelope's `results` value, or `body` unchanged when it is
/// not an envelope.
pub fn normalize(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.contains_key(RESULTS_KEY) => {
            map.remove(RESULTS_KEY).unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// True when `body` is an object carrying a `results` key.
pub fn is_envelope(body: &Value) -> bool {
    body.as_object()
        .is_some_and(|map| map.contains_key(RESULTS_KEY))
}
