//! Session store port - interface for per-session state persistence.
//!
//! Conversation state is owned by one [`ChatSession`] per session and passed
//! through this boundary, never held in process-wide variables. Persistence
//! is best-effort: the service keeps answering even when a save fails.

use async_trait::async_trait;

use crate::domain::conversation::ChatSession;
use crate::domain::foundation::SessionId;

/// Errors that can occur during session storage operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error("Session not found: {0}")]
    NotFound(SessionId),

    #[error("Failed to serialize session: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize session: {0}")]
    DeserializationFailed(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Port for persisting and loading chat sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Loads a session by id.
    ///
    /// Returns `None` if no session with that id exists.
    async fn find(&self, id: &SessionId) -> Result<Option<ChatSession>, SessionStoreError>;

    /// Saves a session, creating or replacing its record.
    async fn save(&self, session: &ChatSession) -> Result<(), SessionStoreError>;
}
