//! Turn orchestration over the session store, converters and transport

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::convert::Converter;
use crate::error::BridgeError;
use crate::input::parse_input;
use crate::registry::ConverterRegistry;
use crate::session::SessionStore;
use crate::sink::{UsageReport, UsageSink};
use crate::transport::Transport;
use crate::types::{ConversationRequest, ConversationResponse, Item, ResponseStatus};

/// Runs conversation turns against vendor APIs
///
/// Cheap to clone; clones share the registry, collaborators and the
/// per-session locks.
#[derive(Clone)]
pub struct Bridge {
    inner: Arc<BridgeInner>,
}

struct BridgeInner {
    registry: ConverterRegistry,
    sessions: Arc<dyn SessionStore>,
    transport: Arc<dyn Transport>,
    usage: Option<Arc<dyn UsageSink>>,
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl Bridge {
    /// Create a bridge with no usage sink
    pub fn new(registry: ConverterRegistry, sessions: Arc<dyn SessionStore>, transport: Arc<dyn Transport>) -> Self {
        Self::with_usage_sink(registry, sessions, transport, None)
    }

    /// Create a bridge that reports token usage to `usage`
    pub fn with_usage_sink(
        registry: ConverterRegistry,
        sessions: Arc<dyn SessionStore>,
        transport: Arc<dyn Transport>,
        usage: Option<Arc<dyn UsageSink>>,
    ) -> Self {
        Self {
            inner: Arc::new(BridgeInner {
                registry,
                sessions,
                transport,
                usage,
                locks: DashMap::new(),
            }),
        }
    }

    /// Registered converters
    pub fn registry(&self) -> &ConverterRegistry {
        &self.inner.registry
    }

    /// Run one conversation turn
    ///
    /// Turns for the same session id run one at a time. The request's items
    /// and the vendor output are appended to the session only when the
    /// response is completed; any error leaves the session untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider is unknown, the input is invalid,
    /// the vendor reply is undecodable, or a collaborator fails
    pub async fn respond(
        &self,
        session_id: &str,
        provider: &str,
        request: &ConversationRequest,
    ) -> Result<ConversationResponse, BridgeError> {
        let converter = self.inner.registry.get(provider)?;
        let new_items = parse_input(&request.input)?;

        let _release = LockRelease {
            locks: &self.inner.locks,
            session_id,
        };
        let lock = self.session_lock(session_id);
        let result = {
            let _guard = lock.lock().await;
            self.run_turn(session_id, provider, converter.as_ref(), request, new_items)
                .await
        };

        if let Ok(ref response) = result {
            tracing::info!(
                session_id,
                provider,
                model = %response.model,
                status = ?response.status,
                total_tokens = response.usage.total_tokens,
                "turn finished"
            );
        }

        result
    }

    /// Load, convert, send, decode and record; caller holds the session lock
    async fn run_turn(
        &self,
        session_id: &str,
        provider: &str,
        converter: &dyn Converter,
        request: &ConversationRequest,
        new_items: Vec<Item>,
    ) -> Result<ConversationResponse, BridgeError> {
        let session = self.inner.sessions.load(session_id).await?;
        let payload = converter.to_provider_request(&session, request)?;

        tracing::debug!(
            session_id,
            provider,
            history_len = session.len(),
            new_items = new_items.len(),
            "sending vendor request"
        );

        let raw = self.inner.transport.send(provider, &payload).await?;
        let response = converter.from_provider_response(&raw, session_id)?;

        self.report_usage(session_id, provider, &response);

        if response.status == ResponseStatus::Completed {
            let mut turn = new_items;
            turn.extend(response.output.iter().cloned());
            self.inner.sessions.append_turn(session_id, turn).await?;
        } else {
            tracing::warn!(
                session_id,
                provider,
                response_id = %response.id,
                "vendor response failed, turn not recorded"
            );
        }

        Ok(response)
    }

    fn report_usage(&self, session_id: &str, provider: &str, response: &ConversationResponse) {
        if let Some(ref sink) = self.inner.usage {
            sink.report(UsageReport {
                model: response.model.clone(),
                provider: provider.to_owned(),
                session_id: session_id.to_owned(),
                usage: response.usage,
            });
        }
    }

    fn session_lock(&self, session_id: &str) -> Arc<Mutex<()>> {
        Arc::clone(
            self.inner
                .locks
                .entry(session_id.to_owned())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .value(),
        )
    }
}

/// Drops a session's lock entry once no turn holds or awaits it
///
/// Runs on drop, so a turn cancelled while waiting for the lock cleans up
/// too. Must be created before the lock handle it guards, so that the
/// handle is released first.
struct LockRelease<'a> {
    locks: &'a DashMap<String, Arc<Mutex<()>>>,
    session_id: &'a str,
}

impl Drop for LockRelease<'_> {
    fn drop(&mut self) {
        self.locks
            .remove_if(self.session_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}

impl std::fmt::Debug for Bridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bridge")
            .field("registry", &self.inner.registry)
            .field("active_sessions", &self.inner.locks.len())
            .finish_non_exhaustive()
    }
}
