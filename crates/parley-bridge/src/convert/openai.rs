//! Conversion between canonical types and the `OpenAI` Chat Completions format

use serde::Deserialize;
use serde_json::Value;

use super::lenient;
use super::{CallLedger, Converter, arguments_string, output_text, synthesize_response_id, to_payload};
use crate::content::extract_text;
use crate::error::BridgeError;
use crate::input::parse_input;
use crate::protocol::openai::{
    OpenAiFunction, OpenAiFunctionCall, OpenAiMessage, OpenAiRequest, OpenAiTool, OpenAiToolCall,
};
use crate::session::Session;
use crate::status::classify_status;
use crate::types::{Content, ConversationRequest, ConversationResponse, Item, Role};
use crate::usage::{UsageMapping, normalize_usage};

const USAGE_MAPPING: UsageMapping = UsageMapping {
    prompt: &["prompt_tokens"],
    completion: &["completion_tokens"],
    cache_creation: None,
    cache_read: Some(&["prompt_tokens_details", "cached_tokens"]),
};

/// Converter for `OpenAI`-compatible chat completion APIs
#[derive(Debug, Clone, Default)]
pub struct OpenAiConverter {
    model: Option<String>,
}

impl OpenAiConverter {
    /// Converter with no configured model
    pub fn new() -> Self {
        Self::default()
    }

    /// Model sent when the request does not override it
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

// Tool-role messages without a call id have no valid `tool` encoding
const fn openai_role(role: Role) -> &'static str {
    match role {
        Role::System => "system",
        Role::Assistant => "assistant",
        Role::User | Role::Tool => "user",
    }
}

impl Converter for OpenAiConverter {
    fn name(&self) -> &str {
        "openai"
    }

    fn to_provider_request(&self, session: &Session, request: &ConversationRequest) -> Result<Value, BridgeError> {
        let new_items = parse_input(&request.input)?;

        let mut messages = Vec::new();
        if let Some(instructions) = request.instructions() {
            messages.push(OpenAiMessage::text("system", instructions.to_owned()));
        }

        let mut ledger = CallLedger::default();

        for item in session.history().iter().chain(&new_items) {
            match item {
                Item::Message { content, .. } | Item::Text { content, .. } => {
                    let text = extract_text(content);
                    if let (Some(role), false) = (item.effective_role(), text.is_empty()) {
                        messages.push(OpenAiMessage::text(openai_role(role), text));
                    }
                }
                Item::FunctionCall { content: call } => {
                    let tool_call = OpenAiToolCall {
                        id: ledger.call(call),
                        tool_type: "function".to_owned(),
                        function: OpenAiFunctionCall {
                            name: call.name.clone(),
                            arguments: arguments_string(&call.arguments),
                        },
                    };
                    match messages.last_mut() {
                        Some(last) if last.role == "assistant" => {
                            last.tool_calls.get_or_insert_with(Vec::new).push(tool_call);
                        }
                        _ => messages.push(OpenAiMessage {
                            role: "assistant".to_owned(),
                            content: None,
                            tool_calls: Some(vec![tool_call]),
                            tool_call_id: None,
                        }),
                    }
                }
                Item::FunctionCallOutput { content: output } => {
                    let (call_id, _) = ledger.output(output);
                    messages.push(OpenAiMessage {
                        role: "tool".to_owned(),
                        content: Some(output_text(&output.output)),
                        tool_calls: None,
                        tool_call_id: Some(call_id),
                    });
                }
                Item::Unknown => {}
            }
        }

        let tools = (!request.tools.is_empty()).then(|| {
            request
                .tools
                .iter()
                .map(|tool| OpenAiTool {
                    tool_type: tool.tool_type.clone(),
                    function: OpenAiFunction {
                        name: tool.name.clone(),
                        description: tool.description.clone(),
                        parameters: tool.parameters.clone(),
                    },
                })
                .collect()
        });

        let wire = OpenAiRequest {
            model: request
                .model
                .clone()
                .filter(|model| !model.is_empty())
                .or_else(|| self.model.clone()),
            messages,
            max_tokens: request.max_tokens(),
            temperature: request.temperature(),
            top_p: request.top_p(),
            stop: request.stop(),
            tools,
        };

        to_payload(self.name(), &wire)
    }

    fn from_provider_response(&self, payload: &[u8], session_id: &str) -> Result<ConversationResponse, BridgeError> {
        let body = lenient::decode(self.name(), payload)?;

        let choices = lenient::array(&body, "choices");
        let first = choices.first();

        let mut output = Vec::new();
        if let Some(message) = first.and_then(|choice| lenient::object(choice, "message")) {
            if let Some(content) = lenient::field(message, "content") {
                let text = Content::deserialize(content).map_or_else(|_| String::new(), |c| extract_text(&c));
                if !text.is_empty() {
                    output.push(Item::text(text));
                }
            }
            for call in lenient::array(message, "tool_calls") {
                if let Some(item) = tool_call_to_item(call) {
                    output.push(item);
                }
            }
        }

        let finish_reason = first.and_then(|choice| lenient::opt_str(choice, "finish_reason"));
        let signal = lenient::error_signal(self.name(), &body).or(finish_reason);

        Ok(ConversationResponse {
            id: lenient::opt_str(&body, "id").map_or_else(synthesize_response_id, str::to_owned),
            model: lenient::opt_str(&body, "model")
                .or(self.model.as_deref())
                .unwrap_or_default()
                .to_owned(),
            output,
            status: classify_status(signal, !choices.is_empty()),
            previous_id: session_id.to_owned(),
            usage: normalize_usage(lenient::field(&body, "usage"), &USAGE_MAPPING),
        })
    }
}

/// Arguments stay as the vendor's JSON-encoded string
fn tool_call_to_item(call: &Value) -> Option<Item> {
    let function = lenient::object(call, "function")?;
    let arguments = lenient::field(function, "arguments").cloned().unwrap_or(Value::Null);
    Some(Item::function_call(
        lenient::str_or_empty(function, "name"),
        arguments,
        lenient::opt_str(call, "id").map(str::to_owned),
    ))
}
