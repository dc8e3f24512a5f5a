//! Parsing of raw new-turn input into canonical items

use serde_json::Value;

use crate::content::value_kind;
use crate::error::BridgeError;
use crate::types::{Item, Role};

/// Parse a raw input payload into canonical items
///
/// A bare string becomes a single user message. A list is parsed
/// element-wise and all-or-nothing: one uninterpretable element fails the
/// whole call so user content is never dropped silently.
pub fn parse_input(raw: &Value) -> Result<Vec<Item>, BridgeError> {
    match raw {
        Value::String(text) => Ok(vec![Item::message(Role::User, text.as_str())]),
        Value::Array(elements) => elements
            .iter()
            .enumerate()
            .map(|(index, element)| parse_element(index, element))
            .collect(),
        other => Err(BridgeError::InvalidInput(format!(
            "input must be a string or a list of items, got {}",
            value_kind(other)
        ))),
    }
}

fn parse_element(index: usize, element: &Value) -> Result<Item, BridgeError> {
    let Value::Object(fields) = element else {
        return Err(BridgeError::InvalidInput(format!(
            "input[{index}] must be an object, got {}",
            value_kind(element)
        )));
    };

    // `{role, content}` without a type is shorthand for a message
    let item = if fields.contains_key("type") {
        serde_json::from_value(element.clone())
    } else if fields.contains_key("role") {
        let mut message = fields.clone();
        message.insert("type".to_owned(), Value::String("message".to_owned()));
        serde_json::from_value(Value::Object(message))
    } else {
        return Err(BridgeError::InvalidInput(format!(
            "input[{index}] has neither a type nor a role"
        )));
    };

    item.map_err(|e| BridgeError::InvalidInput(format!("input[{index}] is not a valid item: {e}")))
}
