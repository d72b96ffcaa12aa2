//! In-memory Session Store Adapter
//!
//! Keeps sessions in a process-local map. The default for development and
//! tests; state is lost on restart.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::conversation::ChatSession;
use crate::domain::foundation::SessionId;
use crate::ports::{SessionStore, SessionStoreError};

/// In-memory storage for chat sessions.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<SessionId, ChatSession>>,
}

impl InMemorySessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored sessions.
    pub fn len(&self) -> usize {
        self.sessions.read().unwrap().len()
    }

    /// Returns true if no sessions are stored.
    pub fn is_empty(&self) -> bool {
        self.sessions.read().unwrap().is_empty()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn find(&self, id: &SessionId) -> Result<Option<ChatSession>, SessionStoreError> {
        Ok(self.sessions.read().unwrap().get(id).cloned())
    }

    async fn save(&self, session: &ChatSession) -> Result<(), SessionStoreError> {
        self.sessions
            .write()
            .unwrap()
            .insert(*session.id(), session.clone());
        Ok(())
    }
}
