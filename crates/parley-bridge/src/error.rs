use thiserror::Error;

/// Errors that can occur while bridging a conversation turn
#[derive(Debug, Error)]
pub enum BridgeError {
    /// New input is neither a string nor a well-formed item list
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// No converter is registered under the requested name
    #[error("unsupported provider: {provider}")]
    UnsupportedProvider { provider: String },

    /// Vendor payload could not be decoded into a generic structure
    #[error("failed to decode {provider} response: {source}")]
    Decode {
        /// Converter that attempted the decode
        provider: String,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// Outbound transport failed to complete the vendor call
    #[error("transport error: {0}")]
    Transport(String),

    /// Session store failed to load or persist history
    #[error("session store error: {0}")]
    Session(String),

    /// Unexpected internal error
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl BridgeError {
    /// Machine-readable error type (e.g. `invalid_input_error`)
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input_error",
            Self::UnsupportedProvider { .. } => "unsupported_provider_error",
            Self::Decode { .. } => "decode_error",
            Self::Transport(_) => "transport_error",
            Self::Session(_) => "session_error",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Whether the failure came from a collaborator rather than the request
    ///
    /// Collaborator failures are transient from the caller's point of view;
    /// resending the same turn may succeed.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Session(_) | Self::Internal(_))
    }
}
