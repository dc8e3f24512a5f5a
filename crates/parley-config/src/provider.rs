use serde::Deserialize;

/// Configuration for a single provider
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    /// Wire protocol spoken by the provider
    #[serde(rename = "type")]
    pub provider_type: ProviderKind,
    /// Model sent when a request does not override it
    #[serde(default)]
    pub model: Option<String>,
    /// Default output budget for vendors that require one
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

/// Supported provider protocols
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Anthropic Messages API
    Claude,
    /// `OpenAI`-compatible chat completions
    Openai,
    /// Google Gemini `generateContent`
    Gemini,
}

impl ProviderKind {
    /// Protocol name as written in configuration
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Claude => "claude",
            Self::Openai => "openai",
            Self::Gemini => "gemini",
        }
    }
}
