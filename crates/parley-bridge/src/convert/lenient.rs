//! Defensive navigation of decoded vendor responses
//!
//! Every accessor degrades a missing or mistyped field to its zero value.
//! Mistyped fields are logged; missing ones are not, since vendors omit
//! fields routinely.

use serde_json::Value;

use crate::content::value_kind;
use crate::error::BridgeError;

/// Decode a raw vendor payload into a generic JSON structure
pub(crate) fn decode(provider: &str, payload: &[u8]) -> Result<Value, BridgeError> {
    serde_json::from_slice(payload).map_err(|source| {
        tracing::warn!(provider, error = %source, "vendor response is not valid JSON");
        BridgeError::Decode {
            provider: provider.to_owned(),
            source,
        }
    })
}

/// Field that is present and not null
pub(crate) fn field<'a>(node: &'a Value, key: &str) -> Option<&'a Value> {
    node.get(key).filter(|value| !value.is_null())
}

/// String field, or `None` if missing or mistyped
pub(crate) fn opt_str<'a>(node: &'a Value, key: &str) -> Option<&'a str> {
    let value = field(node, key)?;
    let text = value.as_str();
    if text.is_none() {
        malformed(key, value);
    }
    text
}

/// String field, or the empty string
pub(crate) fn str_or_empty<'a>(node: &'a Value, key: &str) -> &'a str {
    opt_str(node, key).unwrap_or_default()
}

/// Array field, or an empty slice
pub(crate) fn array<'a>(node: &'a Value, key: &str) -> &'a [Value] {
    match field(node, key) {
        Some(Value::Array(items)) => items,
        Some(other) => {
            malformed(key, other);
            &[]
        }
        None => &[],
    }
}

/// Object field, or `None` if missing or mistyped
pub(crate) fn object<'a>(node: &'a Value, key: &str) -> Option<&'a Value> {
    match field(node, key) {
        Some(value @ Value::Object(_)) => Some(value),
        Some(other) => {
            malformed(key, other);
            None
        }
        None => None,
    }
}

/// Error indicator carried in a top-level `error` field
///
/// Some transports pass vendor error bodies through unchanged; these are
/// surfaced to the status classifier as an "error" finish signal.
pub(crate) fn error_signal(provider: &str, body: &Value) -> Option<&'static str> {
    let error = field(body, "error")?;
    let message = error
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| error.as_str())
        .unwrap_or_default();
    tracing::warn!(provider, error_message = message, "vendor response carries an error");
    Some("error")
}

fn malformed(key: &str, value: &Value) {
    tracing::debug!(field = key, kind = value_kind(value), "malformed vendor field, using zero value");
}
