use serde::{Deserialize, Serialize};

/// Role of an item author
///
/// Deserialization is total: empty, unrecognized or non-string roles become
/// [`Role::User`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "serde_json::Value")]
pub enum Role {
    /// System instruction
    System,
    /// End user
    #[default]
    User,
    /// Model output
    Assistant,
    /// Tool/function result
    Tool,
}

impl Role {
    /// Parse a role name, falling back to `User`
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "system" | "developer" => Self::System,
            "assistant" => Self::Assistant,
            "tool" => Self::Tool,
            _ => Self::User,
        }
    }

    /// Canonical wire name
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::Tool => "tool",
        }
    }
}

impl From<serde_json::Value> for Role {
    fn from(value: serde_json::Value) -> Self {
        value.as_str().map_or_else(Self::default, Self::parse)
    }
}

/// Polymorphic item content: a plain string or an ordered list of blocks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Content {
    /// Plain text
    Text(String),
    /// Typed content blocks
    Blocks(Vec<ContentBlock>),
    /// Anything else the client sent; extracts to no text
    Other(serde_json::Value),
}

impl Default for Content {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// A single typed block inside block-list content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    /// Declared block kind (e.g. `input_text`, `output_text`, `input_image`)
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Text payload; only a string on a text-kind block counts as text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<serde_json::Value>,
    /// Remaining block fields, carried through untouched
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ContentBlock {
    /// Build a text block of the given kind
    pub fn text(kind: &str, text: impl Into<String>) -> Self {
        Self {
            kind: kind.to_owned(),
            text: Some(serde_json::Value::String(text.into())),
            extra: serde_json::Map::new(),
        }
    }

    /// Whether the declared kind denotes text
    pub fn is_text(&self) -> bool {
        matches!(self.kind.as_str(), "text" | "input_text" | "output_text")
    }

    /// Text carried by a text-kind block
    pub fn as_text(&self) -> Option<&str> {
        self.text.as_ref().filter(|_| self.is_text()).and_then(serde_json::Value::as_str)
    }
}

/// Function call requested by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Function name
    #[serde(default)]
    pub name: String,
    /// Vendor-defined arguments, never validated
    #[serde(default)]
    pub arguments: serde_json::Value,
    /// Identifier linking the call to its output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_id: Option<String>,
}

/// Result of a function call, supplied by the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCallOutput {
    /// Identifier of the call this output answers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_id: Option<String>,
    /// Function name, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Opaque output value
    #[serde(default)]
    pub output: serde_json::Value,
}

/// One discriminated unit of conversation content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Item {
    /// Conversational message
    Message {
        /// Author role
        #[serde(default)]
        role: Role,
        /// Message content
        #[serde(default)]
        content: Content,
    },
    /// Text segment, usually model output
    Text {
        /// Author role; absent on model output
        #[serde(default, skip_serializing_if = "Option::is_none")]
        role: Option<Role>,
        /// Text content
        #[serde(default)]
        content: Content,
    },
    /// Function call requested by the model
    FunctionCall {
        /// Call name and arguments
        content: FunctionCall,
    },
    /// Output of a previously requested function call
    FunctionCallOutput {
        /// Call result
        content: FunctionCallOutput,
    },
    /// Item type this layer does not recognize
    #[serde(other)]
    Unknown,
}

impl Item {
    /// Message item with the given role
    pub fn message(role: Role, content: impl Into<Content>) -> Self {
        Self::Message {
            role,
            content: content.into(),
        }
    }

    /// Roleless text item, as produced from model output
    pub fn text(content: impl Into<Content>) -> Self {
        Self::Text {
            role: None,
            content: content.into(),
        }
    }

    /// Function call item
    pub fn function_call(name: impl Into<String>, arguments: serde_json::Value, call_id: Option<String>) -> Self {
        Self::FunctionCall {
            content: FunctionCall {
                name: name.into(),
                arguments,
                call_id,
            },
        }
    }

    /// Role the item is replayed with
    ///
    /// Roleless text is model output and replays as the assistant;
    /// function calls belong to the assistant and outputs to the tool.
    pub fn effective_role(&self) -> Option<Role> {
        match self {
            Self::Message { role, .. } => Some(*role),
            Self::Text { role, .. } => Some(role.unwrap_or(Role::Assistant)),
            Self::FunctionCall { .. } => Some(Role::Assistant),
            Self::FunctionCallOutput { .. } => Some(Role::Tool),
            Self::Unknown => None,
        }
    }
}
