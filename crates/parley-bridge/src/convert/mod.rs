//! Conversion between canonical types and vendor wire formats
//!
//! Each submodule implements [`Converter`] for one vendor's protocol.

pub mod claude;
pub mod gemini;
mod lenient;
pub mod openai;

use std::collections::VecDeque;

use serde_json::Value;
use uuid::Uuid;

use crate::error::BridgeError;
use crate::session::Session;
use crate::types::{ConversationRequest, ConversationResponse, FunctionCall, FunctionCallOutput};

pub use claude::ClaudeConverter;
pub use gemini::GeminiConverter;
pub use openai::OpenAiConverter;

/// Translation contract implemented once per vendor
///
/// Both directions are pure: no I/O, no shared mutable state.
pub trait Converter: Send + Sync {
    /// Vendor name (e.g. "gemini")
    fn name(&self) -> &str;

    /// Serialize session history plus the request's new input into the
    /// vendor's request body
    ///
    /// Identical `(session, request)` pairs always produce identical payloads.
    fn to_provider_request(&self, session: &Session, request: &ConversationRequest) -> Result<Value, BridgeError>;

    /// Convert a raw vendor reply into a canonical response
    ///
    /// Fails only when the payload is not JSON at all; missing or mistyped
    /// fields degrade to zero values.
    fn from_provider_response(&self, payload: &[u8], session_id: &str) -> Result<ConversationResponse, BridgeError>;
}

/// Unique id for responses the vendor did not identify
pub(crate) fn synthesize_response_id() -> String {
    format!("resp_{}", Uuid::new_v4().simple())
}

/// Serialize a typed wire request into a JSON payload
pub(crate) fn to_payload<T: serde::Serialize>(provider: &str, request: &T) -> Result<Value, BridgeError> {
    serde_json::to_value(request)
        .map_err(|e| BridgeError::Internal(anyhow::anyhow!("failed to serialize {provider} request: {e}")))
}

/// Pairs function outputs with the calls they answer
///
/// Calls without a vendor id get a deterministic one, and outputs without
/// a call id are matched to the oldest unanswered call.
#[derive(Debug, Default)]
pub(crate) struct CallLedger {
    pending: VecDeque<(String, String)>,
    synthesized: usize,
}

impl CallLedger {
    /// Record a call, returning the id to emit for it
    pub(crate) fn call(&mut self, call: &FunctionCall) -> String {
        let id = match non_empty(call.call_id.as_deref()) {
            Some(id) => id.to_owned(),
            None => self.next_id(),
        };
        self.pending.push_back((id.clone(), call.name.clone()));
        id
    }

    /// Resolve the call id and function name an output answers
    ///
    /// An output whose id matches no pending call keeps its id and borrows
    /// the name of the oldest pending call, since some vendors reject an
    /// unnamed function response.
    pub(crate) fn output(&mut self, output: &FunctionCallOutput) -> (String, String) {
        let answered = match non_empty(output.call_id.as_deref()) {
            Some(id) => match self.pending.iter().position(|(pending, _)| pending == id) {
                Some(index) => self.pending.remove(index).unwrap_or_else(|| (id.to_owned(), String::new())),
                None => {
                    let name = self.pending.front().map(|(_, name)| name.clone()).unwrap_or_default();
                    tracing::debug!(call_id = id, fallback_name = %name, "function output matches no pending call");
                    (id.to_owned(), name)
                }
            },
            None => self.pending.pop_front().unwrap_or_else(|| {
                tracing::debug!("function output without a call id and no pending call");
                (self.next_id(), String::new())
            }),
        };

        let (id, name) = answered;
        let name = non_empty(output.name.as_deref()).map_or(name, str::to_owned);
        (id, name)
    }

    fn next_id(&mut self) -> String {
        self.synthesized += 1;
        format!("call_{}", self.synthesized)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

/// Function arguments as a JSON object, for vendors that require one
///
/// Strings holding a JSON object are decoded; anything else becomes `{}`.
pub(crate) fn arguments_object(arguments: &Value) -> Value {
    match arguments {
        Value::Object(_) => arguments.clone(),
        Value::String(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(decoded @ Value::Object(_)) => decoded,
            _ => {
                tracing::debug!("function arguments are not a JSON object, sending empty arguments");
                Value::Object(serde_json::Map::new())
            }
        },
        _ => Value::Object(serde_json::Map::new()),
    }
}

/// Function arguments as a JSON-encoded string, for vendors that require one
pub(crate) fn arguments_string(arguments: &Value) -> String {
    match arguments {
        Value::String(raw) => raw.clone(),
        Value::Null => "{}".to_owned(),
        other => other.to_string(),
    }
}

/// Function output as plain text
pub(crate) fn output_text(output: &Value) -> String {
    match output {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Function output as a JSON object, wrapping non-object results
pub(crate) fn output_object(output: &Value) -> Value {
    match output {
        Value::Object(_) => output.clone(),
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(decoded @ Value::Object(_)) => decoded,
            _ => serde_json::json!({ "result": text }),
        },
        other => serde_json::json!({ "result": other }),
    }
}
