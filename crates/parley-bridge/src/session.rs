//! Append-only conversation history and its storage seam

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::error::BridgeError;
use crate::types::Item;

/// Ordered, append-only history of one conversation
///
/// Items are never edited or removed once appended. A session has a single
/// logical writer; callers serialize turns for the same id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    id: String,
    #[serde(default)]
    items: Vec<Item>,
}

impl Session {
    /// Empty session for a new conversation id
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            items: Vec::new(),
        }
    }

    /// Session rebuilt from previously stored history
    pub fn with_history(id: impl Into<String>, items: Vec<Item>) -> Self {
        Self { id: id.into(), items }
    }

    /// Conversation id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Read-only view of the history, oldest first
    pub fn history(&self) -> &[Item] {
        &self.items
    }

    /// Number of recorded items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing has been recorded yet
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Record a complete, successfully round-tripped turn
    pub fn append_turn(&mut self, items: impl IntoIterator<Item = Item>) {
        self.items.extend(items);
    }
}

/// Storage for session history, owned by the caller
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load the session for `id`, or an empty one if none exists yet
    async fn load(&self, id: &str) -> Result<Session, BridgeError>;

    /// Append a completed turn to the session for `id`
    async fn append_turn(&self, id: &str, items: Vec<Item>) -> Result<(), BridgeError>;
}

/// In-process session store
///
/// Sessions live until the process exits; eviction is left to whoever
/// owns the store.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: DashMap<String, Session>,
}

impl MemorySessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions held
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no sessions are held
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, id: &str) -> Result<Session, BridgeError> {
        Ok(self
            .sessions
            .get(id)
            .map_or_else(|| Session::new(id), |session| session.value().clone()))
    }

    async fn append_turn(&self, id: &str, items: Vec<Item>) -> Result<(), BridgeError> {
        self.sessions
            .entry(id.to_owned())
            .or_insert_with(|| Session::new(id))
            .append_turn(items);
        Ok(())
    }
}
