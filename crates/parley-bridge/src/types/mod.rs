//! Canonical conversation types
//!
//! These types are vendor-agnostic and serve as the normalized representation
//! that every provider wire format converts to and from.

pub mod item;
pub mod request;
pub mod response;

pub use item::{Content, ContentBlock, FunctionCall, FunctionCallOutput, Item, Role};
pub use request::{ConversationRequest, ToolDefinition};
pub use response::{ConversationResponse, ResponseStatus, Usage};
