//! Conversion between canonical types and the Claude Messages format
//!
//! System instructions and system-role items are folded into the top-level
//! `system` field. Tool-role messages and function outputs are sent as
//! `user` turns, since Claude only has two conversational roles.

use serde_json::Value;

use super::lenient;
use super::{CallLedger, Converter, arguments_object, output_text, synthesize_response_id, to_payload};
use crate::content::extract_text;
use crate::error::BridgeError;
use crate::input::parse_input;
use crate::protocol::claude::{ClaudeContentBlock, ClaudeMessage, ClaudeRequest, ClaudeTool};
use crate::session::Session;
use crate::status::classify_status;
use crate::types::{ConversationRequest, ConversationResponse, Item, Role};
use crate::usage::{UsageMapping, normalize_usage};

/// Output budget used when neither the request nor the configuration sets one
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

const USAGE_MAPPING: UsageMapping = UsageMapping {
    prompt: &["input_tokens"],
    completion: &["output_tokens"],
    cache_creation: Some(&["cache_creation_input_tokens"]),
    cache_read: Some(&["cache_read_input_tokens"]),
};

/// Converter for Anthropic's Claude Messages API
#[derive(Debug, Clone)]
pub struct ClaudeConverter {
    model: Option<String>,
    max_tokens: u32,
}

impl Default for ClaudeConverter {
    fn default() -> Self {
        Self {
            model: None,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl ClaudeConverter {
    /// Converter with no configured model and the default output budget
    pub fn new() -> Self {
        Self::default()
    }

    /// Model sent when the request does not override it
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Output budget sent when the request does not set one
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        if max_tokens > 0 {
            self.max_tokens = max_tokens;
        }
        self
    }
}

const fn claude_role(role: Role) -> &'static str {
    match role {
        Role::Assistant => "assistant",
        Role::User | Role::Tool | Role::System => "user",
    }
}

impl Converter for ClaudeConverter {
    fn name(&self) -> &str {
        "claude"
    }

    fn to_provider_request(&self, session: &Session, request: &ConversationRequest) -> Result<Value, BridgeError> {
        let new_items = parse_input(&request.input)?;

        let mut system = Vec::new();
        if let Some(instructions) = request.instructions() {
            system.push(instructions.to_owned());
        }

        let mut messages = Messages::default();
        let mut ledger = CallLedger::default();

        for item in session.history().iter().chain(&new_items) {
            match item {
                Item::Message { role: Role::System, content } | Item::Text { role: Some(Role::System), content } => {
                    let text = extract_text(content);
                    if !text.is_empty() {
                        system.push(text);
                    }
                }
                Item::Message { content, .. } | Item::Text { content, .. } => {
                    let text = extract_text(content);
                    if let (Some(role), false) = (item.effective_role(), text.is_empty()) {
                        messages.push(claude_role(role), ClaudeContentBlock::Text { text });
                    }
                }
                Item::FunctionCall { content: call } => {
                    let id = ledger.call(call);
                    messages.push(
                        "assistant",
                        ClaudeContentBlock::ToolUse {
                            id,
                            name: call.name.clone(),
                            input: arguments_object(&call.arguments),
                        },
                    );
                }
                Item::FunctionCallOutput { content: output } => {
                    let (tool_use_id, _) = ledger.output(output);
                    messages.push(
                        "user",
                        ClaudeContentBlock::ToolResult {
                            tool_use_id,
                            content: output_text(&output.output),
                        },
                    );
                }
                Item::Unknown => {}
            }
        }

        let tools = (!request.tools.is_empty()).then(|| {
            request
                .tools
                .iter()
                .map(|tool| ClaudeTool {
                    name: tool.name.clone(),
                    description: tool.description.clone(),
                    input_schema: tool
                        .parameters
                        .clone()
                        .unwrap_or_else(|| serde_json::json!({"type": "object", "properties": {}})),
                })
                .collect()
        });

        let wire = ClaudeRequest {
            model: request
                .model
                .clone()
                .filter(|model| !model.is_empty())
                .or_else(|| self.model.clone()),
            max_tokens: request.max_tokens().unwrap_or(self.max_tokens),
            system: (!system.is_empty()).then(|| system.join("\n\n")),
            messages: messages.0,
            temperature: request.temperature(),
            top_p: request.top_p(),
            stop_sequences: request.stop(),
            tools,
        };

        to_payload(self.name(), &wire)
    }

    fn from_provider_response(&self, payload: &[u8], session_id: &str) -> Result<ConversationResponse, BridgeError> {
        let body = lenient::decode(self.name(), payload)?;

        let blocks = lenient::array(&body, "content");
        let output = blocks.iter().filter_map(claude_block_to_item).collect();

        let signal = lenient::error_signal(self.name(), &body).or_else(|| lenient::opt_str(&body, "stop_reason"));

        Ok(ConversationResponse {
            id: lenient::opt_str(&body, "id").map_or_else(synthesize_response_id, str::to_owned),
            model: lenient::opt_str(&body, "model")
                .or(self.model.as_deref())
                .unwrap_or_default()
                .to_owned(),
            output,
            status: classify_status(signal, !blocks.is_empty()),
            previous_id: session_id.to_owned(),
            usage: normalize_usage(lenient::field(&body, "usage"), &USAGE_MAPPING),
        })
    }
}

fn claude_block_to_item(block: &Value) -> Option<Item> {
    match lenient::str_or_empty(block, "type") {
        "text" => lenient::opt_str(block, "text")
            .filter(|text| !text.is_empty())
            .map(Item::text),
        "tool_use" => Some(Item::function_call(
            lenient::str_or_empty(block, "name"),
            lenient::field(block, "input")
                .cloned()
                .unwrap_or_else(|| Value::Object(serde_json::Map::new())),
            lenient::opt_str(block, "id").map(str::to_owned),
        )),
        other => {
            tracing::debug!(block_type = other, "skipping claude content block");
            None
        }
    }
}

/// Message list that merges consecutive blocks from the same role
///
/// Within a merged message, tool results stay ahead of any other blocks.
#[derive(Default)]
struct Messages(Vec<ClaudeMessage>);

impl Messages {
    fn push(&mut self, role: &str, block: ClaudeContentBlock) {
        match self.0.last_mut() {
            Some(last) if last.role == role => {
                if matches!(block, ClaudeContentBlock::ToolResult { .. }) {
                    let index = last
                        .content
                        .iter()
                        .position(|existing| !matches!(existing, ClaudeContentBlock::ToolResult { .. }))
                        .unwrap_or(last.content.len());
                    last.content.insert(index, block);
                } else {
                    last.content.push(block);
                }
            }
            _ => self.0.push(ClaudeMessage {
                role: role.to_owned(),
                content: vec![block],
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::types::{ResponseStatus, ToolDefinition};

    fn convert(converter: &ClaudeConverter, session: &Session, request: &ConversationRequest) -> Value {
        converter.to_provider_request(session, request).unwrap()
    }

    fn parse(body: &Value) -> ConversationResponse {
        ClaudeConverter::new()
            .from_provider_response(body.to_string().as_bytes(), "conv_1")
            .unwrap()
    }

    #[test]
    fn system_content_goes_to_system_field() {
        let session = Session::with_history(
            "conv_1",
            vec![
                Item::message(Role::System, "Answer in French"),
                Item::message(Role::User, "Hi"),
                Item::message(Role::Assistant, "Bonjour"),
            ],
        );
        let request = ConversationRequest {
            instructions: Some("Be brief".to_owned()),
            ..ConversationRequest::new("Thanks")
        };
        let payload = convert(&ClaudeConverter::new(), &session, &request);

        assert_eq!(payload["system"], "Be brief\n\nAnswer in French");
        assert_eq!(
            payload["messages"],
            json!([
                {"role": "user", "content": [{"type": "text", "text": "Hi"}]},
                {"role": "assistant", "content": [{"type": "text", "text": "Bonjour"}]},
                {"role": "user", "content": [{"type": "text", "text": "Thanks"}]}
            ])
        );
    }

    #[test]
    fn max_tokens_is_always_sent() {
        let payload = convert(&ClaudeConverter::new(), &Session::new("c"), &ConversationRequest::new("hi"));
        assert_eq!(payload["max_tokens"], DEFAULT_MAX_TOKENS);
        assert!(payload.get("model").is_none());

        let converter = ClaudeConverter::new().with_model("claude-sonnet-4").with_max_tokens(1024);
        let payload = convert(&converter, &Session::new("c"), &ConversationRequest::new("hi"));
        assert_eq!(payload["max_tokens"], 1024);
        assert_eq!(payload["model"], "claude-sonnet-4");

        let request = ConversationRequest {
            max_tokens: Some(64),
            model: Some("claude-haiku".to_owned()),
            ..ConversationRequest::new("hi")
        };
        let payload = convert(&converter, &Session::new("c"), &request);
        assert_eq!(payload["max_tokens"], 64);
        assert_eq!(payload["model"], "claude-haiku");
    }

    #[test]
    fn tool_round_trip_uses_native_blocks() {
        let session = Session::with_history(
            "conv_1",
            vec![
                Item::message(Role::User, "Weather?"),
                Item::text("Checking."),
                Item::function_call("weather", json!({"city": "Oslo"}), Some("toolu_1".to_owned())),
            ],
        );
        let request = ConversationRequest::new(json!([
            {"type": "function_call_output", "content": {"call_id": "toolu_1", "output": "rain"}}
        ]));
        let payload = convert(&ClaudeConverter::new(), &session, &request);

        assert_eq!(
            payload["messages"][1],
            json!({"role": "assistant", "content": [
                {"type": "text", "text": "Checking."},
                {"type": "tool_use", "id": "toolu_1", "name": "weather", "input": {"city": "Oslo"}}
            ]})
        );
        assert_eq!(
            payload["messages"][2],
            json!({"role": "user", "content": [{"type": "tool_result", "tool_use_id": "toolu_1", "content": "rain"}]})
        );
    }

    #[test]
    fn tool_results_lead_merged_user_messages() {
        let session = Session::with_history(
            "conv_1",
            vec![
                Item::function_call("weather", json!({"city": "Oslo"}), Some("toolu_1".to_owned())),
                Item::function_call("time", json!({}), Some("toolu_2".to_owned())),
                Item::message(Role::User, "Also, hurry."),
            ],
        );
        let request = ConversationRequest::new(json!([
            {"type": "function_call_output", "content": {"call_id": "toolu_1", "output": "rain"}},
            {"type": "function_call_output", "content": {"call_id": "toolu_2", "output": "noon"}}
        ]));
        let payload = convert(&ClaudeConverter::new(), &session, &request);

        assert_eq!(
            payload["messages"][1],
            json!({"role": "user", "content": [
                {"type": "tool_result", "tool_use_id": "toolu_1", "content": "rain"},
                {"type": "tool_result", "tool_use_id": "toolu_2", "content": "noon"},
                {"type": "text", "text": "Also, hurry."}
            ]})
        );
    }

    #[test]
    fn tools_get_a_default_schema() {
        let request = ConversationRequest {
            tools: vec![ToolDefinition {
                tool_type: "function".to_owned(),
                name: "now".to_owned(),
                description: None,
                parameters: None,
            }],
            ..ConversationRequest::new("hi")
        };
        let payload = convert(&ClaudeConverter::new(), &Session::new("c"), &request);
        assert_eq!(
            payload["tools"],
            json!([{"name": "now", "input_schema": {"type": "object", "properties": {}}}])
        );
    }

    #[test]
    fn response_blocks_become_items() {
        let response = parse(&json!({
            "id": "msg_01",
            "model": "claude-sonnet-4",
            "content": [
                {"type": "thinking", "thinking": "..."},
                {"type": "text", "text": "Let me look."},
                {"type": "tool_use", "id": "toolu_1", "name": "lookup", "input": {"q": "x"}}
            ],
            "stop_reason": "tool_use",
            "usage": {"input_tokens": 10, "output_tokens": 4, "cache_read_input_tokens": 6}
        }));

        assert_eq!(response.id, "msg_01");
        assert_eq!(response.model, "claude-sonnet-4");
        assert_eq!(
            response.output,
            vec![
                Item::text("Let me look."),
                Item::function_call("lookup", json!({"q": "x"}), Some("toolu_1".to_owned())),
            ]
        );
        assert_eq!(response.status, ResponseStatus::Completed);
        assert_eq!(response.usage.total_tokens, 14);
        assert_eq!(response.usage.cache_read_tokens, Some(6));
        assert_eq!(response.usage.cache_creation_tokens, None);
    }

    #[test]
    fn error_body_fails() {
        let response = parse(&json!({
            "type": "error",
            "error": {"type": "overloaded_error", "message": "Overloaded"}
        }));
        assert_eq!(response.status, ResponseStatus::Failed);
        assert!(response.output.is_empty());
    }

    #[test]
    fn mistyped_fields_degrade() {
        let response = parse(&json!({"content": "oops", "usage": {"input_tokens": "ten"}, "id": 5}));
        assert!(response.output.is_empty());
        assert_eq!(response.usage.total_tokens, 0);
        assert!(response.id.starts_with("resp_"));
    }
}
