use serde::{Deserialize, Serialize};

/// Definition of a function the model may call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool type (currently always "function")
    #[serde(rename = "type", default = "default_tool_type")]
    pub tool_type: String,
    /// Function name
    pub name: String,
    /// Human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON Schema for the function parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<serde_json::Value>,
}

fn default_tool_type() -> String {
    "function".to_owned()
}

/// Canonical conversation request for a single new turn
///
/// Generation parameters are sparse. Zero and absent values both mean
/// "use the vendor default"; read them through the accessor methods, which
/// never yield zeros.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationRequest {
    /// Raw new turn: a string or a list of item-shaped values
    #[serde(default)]
    pub input: serde_json::Value,
    /// System prompt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    /// Model override; the provider's configured model is used otherwise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Sampling temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Nucleus sampling threshold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    /// Stop sequences
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
    /// Tools available to the model
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDefinition>,
}

impl ConversationRequest {
    /// Request with only a new input
    pub fn new(input: impl Into<serde_json::Value>) -> Self {
        Self {
            input: input.into(),
            ..Self::default()
        }
    }

    /// Non-empty system instructions
    pub fn instructions(&self) -> Option<&str> {
        self.instructions.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// Max tokens, if set and non-zero
    pub fn max_tokens(&self) -> Option<u32> {
        self.max_tokens.filter(|&n| n > 0)
    }

    /// Temperature, if set and non-zero
    pub fn temperature(&self) -> Option<f64> {
        self.temperature.filter(|&t| t > 0.0)
    }

    /// Top-p, if set and non-zero
    pub fn top_p(&self) -> Option<f64> {
        self.top_p.filter(|&p| p > 0.0)
    }

    /// Stop sequences, if any non-empty ones were given
    pub fn stop(&self) -> Option<Vec<String>> {
        let stop: Vec<String> = self
            .stop
            .iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .cloned()
            .collect();
        if stop.is_empty() { None } else { Some(stop) }
    }

    /// Whether any generation parameter is set
    pub fn has_generation_params(&self) -> bool {
        self.max_tokens().is_some() || self.temperature().is_some() || self.top_p().is_some() || self.stop().is_some()
    }
}
