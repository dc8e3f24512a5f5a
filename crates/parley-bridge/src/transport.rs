//! Outbound vendor call seam

use async_trait::async_trait;
use serde_json::Value;

use crate::error::BridgeError;

/// Delivers a vendor request body and returns the raw reply
///
/// Authentication, endpoints, retries and timeouts are the implementor's
/// concern. Failures should map to [`BridgeError::Transport`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `payload` to the vendor registered as `provider`
    async fn send(&self, provider: &str, payload: &Value) -> Result<Vec<u8>, BridgeError>;
}
