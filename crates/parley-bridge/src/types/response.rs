use serde::{Deserialize, Serialize};

use super::item::Item;

/// Canonical outcome of a turn
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    /// The vendor finished normally
    #[default]
    Completed,
    /// The vendor signalled an error
    Failed,
}

/// Token usage statistics
///
/// `total_tokens` is always `prompt_tokens + completion_tokens`; build values
/// through [`Usage::new`] rather than trusting a vendor-reported total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Tokens consumed by the prompt
    pub prompt_tokens: u64,
    /// Tokens generated in the completion
    pub completion_tokens: u64,
    /// Total tokens (prompt + completion)
    pub total_tokens: u64,
    /// Tokens written to the vendor's prompt cache
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_creation_tokens: Option<u64>,
    /// Tokens read from the vendor's prompt cache
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_read_tokens: Option<u64>,
}

impl Usage {
    /// Usage from prompt and completion counts
    pub const fn new(prompt_tokens: u64, completion_tokens: u64) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens.saturating_add(completion_tokens),
            cache_creation_tokens: None,
            cache_read_tokens: None,
        }
    }
}

/// Canonical response for one turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationResponse {
    /// Response identifier (vendor-supplied or synthesized)
    pub id: String,
    /// Model that produced the response
    pub model: String,
    /// Output items in vendor order, possibly empty
    #[serde(default)]
    pub output: Vec<Item>,
    /// Completion status
    pub status: ResponseStatus,
    /// Session the response belongs to
    #[serde(rename = "previous_response_id")]
    pub previous_id: String,
    /// Normalized token usage
    pub usage: Usage,
}
