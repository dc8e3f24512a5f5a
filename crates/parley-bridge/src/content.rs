//! Plain-text extraction from polymorphic content

use crate::types::{Content, ContentBlock};

/// Extract the plain text carried by `content`
///
/// Plain strings are trimmed. Block lists concatenate the text of every
/// text-kind block in order with no separator; other kinds are skipped.
/// Unexpected shapes yield an empty string.
pub fn extract_text(content: &Content) -> String {
    match content {
        Content::Text(text) => text.trim().to_owned(),
        Content::Blocks(blocks) => blocks.iter().filter_map(ContentBlock::as_text).collect(),
        Content::Other(value) => {
            tracing::debug!(kind = value_kind(value), "content has unexpected shape, extracting no text");
            String::new()
        }
    }
}

/// Short name of a JSON value's kind, for log fields
pub(crate) const fn value_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
