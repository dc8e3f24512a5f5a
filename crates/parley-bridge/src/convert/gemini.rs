//! Conversion between canonical types and the Gemini `generateContent` format
//!
//! Role table:
//!
//! | canonical   | Gemini                                   |
//! |-------------|------------------------------------------|
//! | `system`    | `systemInstruction` part (side channel)  |
//! | `user`      | `user`                                   |
//! | `assistant` | `model`                                  |
//! | `tool`      | `user` for messages, `function` for outputs |
//!
//! Tool-role messages lose their tool identity, since Gemini only accepts
//! tool results as `functionResponse` parts.

use serde_json::Value;

use super::lenient;
use super::{CallLedger, Converter, arguments_object, output_object, synthesize_response_id, to_payload};
use crate::content::extract_text;
use crate::error::BridgeError;
use crate::input::parse_input;
use crate::protocol::gemini::{
    GeminiContent, GeminiFunctionCall, GeminiFunctionDeclaration, GeminiFunctionResponse, GeminiGenerationConfig,
    GeminiPart, GeminiRequest, GeminiTool,
};
use crate::session::Session;
use crate::status::classify_status;
use crate::types::{ConversationRequest, ConversationResponse, Item, ResponseStatus, Role};
use crate::usage::{UsageMapping, normalize_usage};

const USAGE_MAPPING: UsageMapping = UsageMapping {
    prompt: &["promptTokenCount"],
    completion: &["candidatesTokenCount"],
    cache_creation: None,
    cache_read: Some(&["cachedContentTokenCount"]),
};

/// Converter for Google's Gemini API
#[derive(Debug, Clone, Default)]
pub struct GeminiConverter {
    model: Option<String>,
}

impl GeminiConverter {
    /// Converter with no configured model
    pub fn new() -> Self {
        Self::default()
    }

    /// Model reported when a response does not name one
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// Gemini role for a canonical role
const fn gemini_role(role: Role) -> &'static str {
    match role {
        Role::Assistant => "model",
        Role::User | Role::Tool | Role::System => "user",
    }
}

impl Converter for GeminiConverter {
    fn name(&self) -> &str {
        "gemini"
    }

    fn to_provider_request(&self, session: &Session, request: &ConversationRequest) -> Result<Value, BridgeError> {
        let new_items = parse_input(&request.input)?;

        let mut system_parts = Vec::new();
        if let Some(instructions) = request.instructions() {
            system_parts.push(GeminiPart::Text(instructions.to_owned()));
        }

        let mut contents = Contents::default();
        let mut ledger = CallLedger::default();

        for item in session.history().iter().chain(&new_items) {
            match item {
                Item::Message { role: Role::System, content } | Item::Text { role: Some(Role::System), content } => {
                    let text = extract_text(content);
                    if !text.is_empty() {
                        system_parts.push(GeminiPart::Text(text));
                    }
                }
                Item::Message { content, .. } | Item::Text { content, .. } => {
                    let text = extract_text(content);
                    if let (Some(role), false) = (item.effective_role(), text.is_empty()) {
                        contents.push(gemini_role(role), GeminiPart::Text(text));
                    }
                }
                Item::FunctionCall { content: call } => {
                    ledger.call(call);
                    contents.push(
                        "model",
                        GeminiPart::FunctionCall(GeminiFunctionCall {
                            name: call.name.clone(),
                            args: arguments_object(&call.arguments),
                        }),
                    );
                }
                Item::FunctionCallOutput { content: output } => {
                    let (_, name) = ledger.output(output);
                    contents.push(
                        "function",
                        GeminiPart::FunctionResponse(GeminiFunctionResponse {
                            name,
                            response: output_object(&output.output),
                        }),
                    );
                }
                Item::Unknown => {}
            }
        }

        let generation_config = request.has_generation_params().then(|| GeminiGenerationConfig {
            max_output_tokens: request.max_tokens(),
            temperature: request.temperature(),
            top_p: request.top_p(),
            stop_sequences: request.stop(),
        });

        let tools = (!request.tools.is_empty()).then(|| {
            vec![GeminiTool {
                function_declarations: request
                    .tools
                    .iter()
                    .map(|tool| GeminiFunctionDeclaration {
                        name: tool.name.clone(),
                        description: tool.description.clone(),
                        parameters: tool.parameters.clone(),
                    })
                    .collect(),
            }]
        });

        let wire = GeminiRequest {
            contents: contents.0,
            system_instruction: (!system_parts.is_empty()).then(|| GeminiContent {
                role: None,
                parts: system_parts,
            }),
            generation_config,
            tools,
        };

        to_payload(self.name(), &wire)
    }

    fn from_provider_response(&self, payload: &[u8], session_id: &str) -> Result<ConversationResponse, BridgeError> {
        let body = lenient::decode(self.name(), payload)?;

        let candidates = lenient::array(&body, "candidates");
        let first = candidates.first();

        let mut output = Vec::new();
        if let Some(candidate) = first {
            let parts = lenient::object(candidate, "content").map_or(&[][..], |content| lenient::array(content, "parts"));
            for part in parts {
                if let Some(item) = gemini_part_to_item(part) {
                    output.push(item);
                }
            }
        }

        let finish_reason = first.and_then(|candidate| lenient::opt_str(candidate, "finishReason"));
        let block_reason = lenient::object(&body, "promptFeedback")
            .and_then(|feedback| lenient::opt_str(feedback, "blockReason"));

        let status = if candidates.is_empty() && block_reason.is_some() {
            tracing::warn!(
                provider = self.name(),
                block_reason = block_reason.unwrap_or_default(),
                "prompt was blocked before any candidate was produced"
            );
            ResponseStatus::Failed
        } else {
            let signal = lenient::error_signal(self.name(), &body).or(finish_reason);
            classify_status(signal, !candidates.is_empty())
        };

        Ok(ConversationResponse {
            id: lenient::opt_str(&body, "responseId").map_or_else(synthesize_response_id, str::to_owned),
            model: lenient::opt_str(&body, "modelVersion")
                .or(self.model.as_deref())
                .unwrap_or_default()
                .to_owned(),
            output,
            status,
            previous_id: session_id.to_owned(),
            usage: normalize_usage(lenient::field(&body, "usageMetadata"), &USAGE_MAPPING),
        })
    }
}

/// Convert one response part into a canonical item
fn gemini_part_to_item(part: &Value) -> Option<Item> {
    if let Some(call) = lenient::object(part, "functionCall") {
        let arguments = lenient::field(call, "args")
            .cloned()
            .unwrap_or_else(|| Value::Object(serde_json::Map::new()));
        return Some(Item::function_call(
            lenient::str_or_empty(call, "name"),
            arguments,
            lenient::opt_str(call, "id").map(str::to_owned),
        ));
    }

    // Thought summaries are not conversation output
    if part.get("thought").and_then(Value::as_bool) == Some(true) {
        return None;
    }

    lenient::opt_str(part, "text")
        .filter(|text| !text.is_empty())
        .map(Item::text)
}

/// Content list that merges consecutive parts from the same role
#[derive(Default)]
struct Contents(Vec<GeminiContent>);

impl Contents {
    fn push(&mut self, role: &str, part: GeminiPart) {
        match self.0.last_mut() {
            Some(last) if last.role.as_deref() == Some(role) => last.parts.push(part),
            _ => self.0.push(GeminiContent {
                role: Some(role.to_owned()),
                parts: vec![part],
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::types::ToolDefinition;

    fn convert(session: &Session, request: &ConversationRequest) -> Value {
        GeminiConverter::new().to_provider_request(session, request).unwrap()
    }

    fn parse(body: &Value) -> ConversationResponse {
        GeminiConverter::new()
            .from_provider_response(body.to_string().as_bytes(), "conv_1")
            .unwrap()
    }

    #[test]
    fn history_is_replayed_before_new_input() {
        let session = Session::with_history("conv_1", vec![Item::message(Role::Assistant, "Sure")]);
        let payload = convert(&session, &ConversationRequest::new("Thanks"));

        assert_eq!(
            payload["contents"],
            json!([
                {"role": "model", "parts": [{"text": "Sure"}]},
                {"role": "user", "parts": [{"text": "Thanks"}]}
            ])
        );
    }

    #[test]
    fn assistant_is_always_model() {
        let session = Session::with_history(
            "conv_1",
            vec![
                Item::message(Role::User, "hi"),
                Item::message(Role::Assistant, "hello"),
                Item::text("roleless output"),
                Item::message(Role::User, "again"),
                Item::Text {
                    role: Some(Role::Assistant),
                    content: "explicit".into(),
                },
            ],
        );
        let payload = convert(&session, &ConversationRequest::new("last"));

        let roles: Vec<&str> = payload["contents"]
            .as_array()
            .unwrap()
            .iter()
            .map(|content| content["role"].as_str().unwrap())
            .collect();
        assert!(!roles.contains(&"assistant"));
        assert_eq!(roles, ["user", "model", "user", "model", "user"]);
    }

    #[test]
    fn instructions_go_to_system_instruction() {
        let session = Session::with_history("conv_1", vec![Item::message(Role::System, "Use metric units")]);
        let request = ConversationRequest {
            instructions: Some("Be brief".to_owned()),
            ..ConversationRequest::new("Weather?")
        };
        let payload = convert(&session, &request);

        assert_eq!(
            payload["systemInstruction"],
            json!({"parts": [{"text": "Be brief"}, {"text": "Use metric units"}]})
        );
        assert_eq!(payload["contents"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn generation_config_only_carries_set_parameters() {
        let payload = convert(&Session::new("c"), &ConversationRequest::new("hi"));
        assert!(payload.get("generationConfig").is_none());

        let request = ConversationRequest {
            max_tokens: Some(256),
            temperature: Some(0.0),
            stop: Some(vec!["END".to_owned()]),
            ..ConversationRequest::new("hi")
        };
        let payload = convert(&Session::new("c"), &request);
        assert_eq!(
            payload["generationConfig"],
            json!({"maxOutputTokens": 256, "stopSequences": ["END"]})
        );
    }

    #[test]
    fn function_round_trip_is_replayed_natively() {
        let session = Session::with_history(
            "conv_1",
            vec![
                Item::message(Role::User, "Weather in Oslo?"),
                Item::function_call("weather", json!({"city": "Oslo"}), None),
            ],
        );
        let request = ConversationRequest::new(json!([
            {"type": "function_call_output", "content": {"output": "rain"}}
        ]));
        let payload = convert(&session, &request);

        assert_eq!(
            payload["contents"][1],
            json!({"role": "model", "parts": [{"functionCall": {"name": "weather", "args": {"city": "Oslo"}}}]})
        );
        assert_eq!(
            payload["contents"][2],
            json!({"role": "function", "parts": [{"functionResponse": {"name": "weather", "response": {"result": "rain"}}}]})
        );
    }

    #[test]
    fn output_with_unknown_call_id_keeps_a_function_name() {
        let session = Session::with_history(
            "conv_1",
            vec![Item::function_call("weather", json!({}), Some("call_a".to_owned()))],
        );
        let request = ConversationRequest::new(json!([
            {"type": "function_call_output", "content": {"call_id": "call_z", "output": "rain"}}
        ]));
        let payload = convert(&session, &request);

        assert_eq!(payload["contents"][1]["parts"][0]["functionResponse"]["name"], "weather");
    }

    #[test]
    fn tools_become_function_declarations() {
        let request = ConversationRequest {
            tools: vec![ToolDefinition {
                tool_type: "function".to_owned(),
                name: "lookup".to_owned(),
                description: Some("Search".to_owned()),
                parameters: Some(json!({"type": "object"})),
            }],
            ..ConversationRequest::new("hi")
        };
        let payload = convert(&Session::new("c"), &request);
        assert_eq!(
            payload["tools"],
            json!([{"functionDeclarations": [{"name": "lookup", "description": "Search", "parameters": {"type": "object"}}]}])
        );
    }

    #[test]
    fn unknown_items_are_dropped() {
        let session = Session::with_history("conv_1", vec![Item::Unknown]);
        let payload = convert(&session, &ConversationRequest::new("hi"));
        assert_eq!(payload["contents"], json!([{"role": "user", "parts": [{"text": "hi"}]}]));
    }

    #[test]
    fn conversion_is_deterministic() {
        let session = Session::with_history(
            "conv_1",
            vec![
                Item::message(Role::User, "a"),
                Item::function_call("f", json!({"z": 1, "a": [1, 2]}), None),
            ],
        );
        let request = ConversationRequest {
            instructions: Some("sys".to_owned()),
            temperature: Some(0.5),
            ..ConversationRequest::new("b")
        };

        let first = serde_json::to_vec(&convert(&session, &request)).unwrap();
        let second = serde_json::to_vec(&convert(&session, &request)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn text_response_with_usage() {
        let response = parse(&json!({
            "candidates": [{"content": {"parts": [{"text": "hi"}]}, "finishReason": "STOP"}],
            "usageMetadata": {"promptTokenCount": 5, "candidatesTokenCount": 2}
        }));

        assert_eq!(response.output, vec![Item::text("hi")]);
        assert_eq!(response.status, ResponseStatus::Completed);
        assert_eq!(response.usage.prompt_tokens, 5);
        assert_eq!(response.usage.completion_tokens, 2);
        assert_eq!(response.usage.total_tokens, 7);
        assert_eq!(response.previous_id, "conv_1");
        assert!(response.id.starts_with("resp_"));
    }

    #[test]
    fn error_finish_reason_fails() {
        let response = parse(&json!({
            "candidates": [{"content": {"parts": []}, "finishReason": "SAFETY_ERROR"}]
        }));
        assert_eq!(response.status, ResponseStatus::Failed);
    }

    #[test]
    fn function_call_part_becomes_function_call_item() {
        let response = parse(&json!({
            "candidates": [{"content": {"parts": [
                {"text": "Let me check."},
                {"functionCall": {"name": "lookup", "args": {"q": "x"}}}
            ]}}]
        }));

        assert_eq!(response.output.len(), 2);
        assert_eq!(
            serde_json::to_value(&response.output[1]).unwrap(),
            json!({"type": "function_call", "content": {"name": "lookup", "arguments": {"q": "x"}}})
        );
    }

    #[test]
    fn missing_keys_yield_empty_response() {
        for body in [json!({}), json!({"candidates": [{}]}), json!({"candidates": [{"content": {}}]})] {
            let response = parse(&body);
            assert!(response.output.is_empty());
            assert_eq!(response.status, ResponseStatus::Completed);
            assert_eq!(response.usage.total_tokens, 0);
        }
    }

    #[test]
    fn vendor_total_is_not_trusted() {
        let response = parse(&json!({
            "candidates": [],
            "usageMetadata": {"promptTokenCount": 3, "candidatesTokenCount": 4, "totalTokenCount": 100}
        }));
        assert_eq!(response.usage.total_tokens, 7);
    }

    #[test]
    fn blocked_prompt_fails() {
        let response = parse(&json!({"promptFeedback": {"blockReason": "SAFETY"}}));
        assert_eq!(response.status, ResponseStatus::Failed);
        assert!(response.output.is_empty());
    }

    #[test]
    fn vendor_identifiers_are_kept() {
        let response = GeminiConverter::new()
            .with_model("gemini-fallback")
            .from_provider_response(br#"{"responseId": "abc", "candidates": []}"#, "conv_1")
            .unwrap();
        assert_eq!(response.id, "abc");
        assert_eq!(response.model, "gemini-fallback");

        let response = parse(&json!({"modelVersion": "gemini-2.0-flash"}));
        assert_eq!(response.model, "gemini-2.0-flash");
    }

    #[test]
    fn undecodable_payload_fails() {
        let err = GeminiConverter::new()
            .from_provider_response(b"not json", "conv_1")
            .unwrap_err();
        assert!(matches!(err, BridgeError::Decode { .. }));
    }
}
