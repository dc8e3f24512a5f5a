//! Mock vendor transport for integration tests
//!
//! Answers each call with a scripted reply, or with a canned text reply
//! in the vendor's format when nothing is scripted.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use parley_bridge::{BridgeError, Transport};
use serde_json::{Value, json};

/// One scripted transport outcome
pub enum Reply {
    /// JSON body returned as the vendor reply
    Body(Value),
    /// Raw bytes returned as the vendor reply
    Raw(Vec<u8>),
    /// Transport failure
    Error(String),
}

/// Mock transport that records every request it receives
pub struct MockTransport {
    state: Mutex<MockState>,
    delay: Option<Duration>,
}

#[derive(Default)]
struct MockState {
    scripted: VecDeque<Reply>,
    requests: Vec<(String, Value)>,
    /// Number of calls to fail before succeeding (0 = never fail)
    fail_count: u32,
}

impl MockTransport {
    /// Transport that answers with canned text replies
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState::default()),
            delay: None,
        }
    }

    /// Transport that fails the first `n` calls
    pub fn failing(n: u32) -> Self {
        let transport = Self::new();
        transport.state.lock().unwrap().fail_count = n;
        transport
    }

    /// Sleep for `delay` before answering each call
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queue a reply for the next unscripted call
    pub fn push(&self, reply: Reply) {
        self.state.lock().unwrap().scripted.push_back(reply);
    }

    /// Queue a JSON body for the next unscripted call
    pub fn push_body(&self, body: Value) {
        self.push(Reply::Body(body));
    }

    /// Every `(provider, payload)` pair sent so far
    pub fn requests(&self) -> Vec<(String, Value)> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Payload of the most recent call
    pub fn last_payload(&self) -> Value {
        self.state
            .lock()
            .unwrap()
            .requests
            .last()
            .map(|(_, payload)| payload.clone())
            .expect("no request was sent")
    }

    pub fn request_count(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, provider: &str, payload: &Value) -> Result<Vec<u8>, BridgeError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let reply = {
            let mut state = self.state.lock().unwrap();
            state.requests.push((provider.to_owned(), payload.clone()));
            let n = state.requests.len();

            if state.fail_count > 0 {
                state.fail_count -= 1;
                Reply::Error("mock vendor unavailable".to_owned())
            } else {
                state
                    .scripted
                    .pop_front()
                    .unwrap_or_else(|| Reply::Body(text_reply(provider, &format!("reply {n}"))))
            }
        };

        match reply {
            Reply::Body(body) => Ok(body.to_string().into_bytes()),
            Reply::Raw(bytes) => Ok(bytes),
            Reply::Error(message) => Err(BridgeError::Transport(message)),
        }
    }
}

/// Canned text reply in the format of the named vendor
pub fn text_reply(provider: &str, text: &str) -> Value {
    match provider {
        "claude" => claude_text(text),
        "openai" => openai_text(text),
        _ => gemini_text(text),
    }
}

pub fn gemini_text(text: &str) -> Value {
    json!({
        "candidates": [{"content": {"role": "model", "parts": [{"text": text}]}, "finishReason": "STOP"}],
        "usageMetadata": {"promptTokenCount": 5, "candidatesTokenCount": 2, "totalTokenCount": 7},
        "modelVersion": "gemini-2.0-flash"
    })
}

pub fn openai_text(text: &str) -> Value {
    json!({
        "id": "chatcmpl-mock",
        "object": "chat.completion",
        "model": "gpt-4o-mini",
        "choices": [{"index": 0, "message": {"role": "assistant", "content": text}, "finish_reason": "stop"}],
        "usage": {"prompt_tokens": 5, "completion_tokens": 2, "total_tokens": 7}
    })
}

pub fn claude_text(text: &str) -> Value {
    json!({
        "id": "msg_mock",
        "type": "message",
        "role": "assistant",
        "model": "claude-sonnet-4",
        "content": [{"type": "text", "text": text}],
        "stop_reason": "end_turn",
        "usage": {"input_tokens": 5, "output_tokens": 2}
    })
}
