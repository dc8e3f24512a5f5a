//! Protocol bridge between a canonical conversation model and vendor LLM APIs
//!
//! Converts a vendor-neutral request plus session history into Claude,
//! `OpenAI` or Gemini request bodies, and normalizes their replies (text,
//! function calls, usage and status) back into canonical responses. The
//! [`Bridge`] orchestrator runs whole turns against caller-supplied session
//! storage, transport and usage reporting.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod bridge;
pub mod content;
pub mod convert;
pub mod error;
pub mod input;
pub mod protocol;
pub mod registry;
pub mod session;
pub mod sink;
pub mod status;
pub mod transport;
pub mod types;
pub mod usage;

pub use bridge::Bridge;
pub use content::extract_text;
pub use convert::{ClaudeConverter, Converter, GeminiConverter, OpenAiConverter};
pub use error::BridgeError;
pub use input::parse_input;
pub use registry::ConverterRegistry;
pub use session::{MemorySessionStore, Session, SessionStore};
pub use sink::{ChannelUsageSink, UsageReport, UsageSink};
pub use status::classify_status;
pub use transport::Transport;
pub use types::{ConversationRequest, ConversationResponse, Item, ResponseStatus, Role, Usage};
pub use usage::{UsageMapping, normalize_usage};
