//! Usage reporting seam

use tokio::sync::mpsc;

use crate::types::Usage;

/// Token usage of one vendor call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageReport {
    /// Model reported by the vendor
    pub model: String,
    /// Provider that served the call
    pub provider: String,
    /// Conversation the call belonged to
    pub session_id: String,
    /// Normalized token counts
    pub usage: Usage,
}

/// Receiver of usage reports
///
/// Reporting is fire-and-forget and must not block the turn.
pub trait UsageSink: Send + Sync {
    /// Record the usage of one vendor call
    fn report(&self, report: UsageReport);
}

/// Sink that forwards reports into an unbounded channel
#[derive(Clone)]
pub struct ChannelUsageSink {
    tx: mpsc::UnboundedSender<UsageReport>,
}

impl ChannelUsageSink {
    /// Create a sink and the receiver its reports arrive on
    pub fn new() -> (Self, mpsc::UnboundedReceiver<UsageReport>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl UsageSink for ChannelUsageSink {
    /// Enqueue a report; dropped with a warning if the receiver is gone
    fn report(&self, report: UsageReport) {
        if let Err(e) = self.tx.send(report) {
            tracing::warn!(
                session_id = %e.0.session_id,
                provider = %e.0.provider,
                "failed to enqueue usage report, channel closed"
            );
        }
    }
}

impl std::fmt::Debug for ChannelUsageSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelUsageSink").finish_non_exhaustive()
    }
}
