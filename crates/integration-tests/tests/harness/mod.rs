#![allow(dead_code)]

pub mod config;
pub mod mock_transport;

use std::sync::Arc;

use parley_bridge::{Bridge, ChannelUsageSink, ConverterRegistry, MemorySessionStore, UsageReport};
use tokio::sync::mpsc;

use self::mock_transport::MockTransport;

/// Bridge wired to in-memory collaborators
pub struct TestBridge {
    pub bridge: Bridge,
    pub sessions: Arc<MemorySessionStore>,
    pub transport: Arc<MockTransport>,
    pub usage: mpsc::UnboundedReceiver<UsageReport>,
}

impl TestBridge {
    /// Bridge over the default converters
    pub fn start(transport: MockTransport) -> Self {
        Self::with_registry(ConverterRegistry::with_defaults(), transport)
    }

    pub fn with_registry(registry: ConverterRegistry, transport: MockTransport) -> Self {
        let sessions = Arc::new(MemorySessionStore::new());
        let transport = Arc::new(transport);
        let (sink, usage) = ChannelUsageSink::new();

        let bridge = Bridge::with_usage_sink(
            registry,
            Arc::clone(&sessions) as Arc<dyn parley_bridge::SessionStore>,
            Arc::clone(&transport) as Arc<dyn parley_bridge::Transport>,
            Some(Arc::new(sink)),
        );

        Self {
            bridge,
            sessions,
            transport,
            usage,
        }
    }

    /// Drain every usage report received so far
    pub fn usage_reports(&mut self) -> Vec<UsageReport> {
        let mut reports = Vec::new();
        while let Ok(report) = self.usage.try_recv() {
            reports.push(report);
        }
        reports
    }
}
