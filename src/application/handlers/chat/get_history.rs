//! GetHistory query handler.
//!
//! Returns the user-visible transcript of a session for the presentation
//! layer. System turns never leave the core.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::conversation::Message;
use crate::domain::foundation::{SessionId, Timestamp};
use crate::ports::SessionStore;

/// Errors that can occur when fetching a session transcript.
#[derive(Debug, Error)]
pub enum GetHistoryError {
    /// No session with the given id exists.
    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),

    /// The session store failed.
    #[error("Session store error: {0}")]
    StoreError(String),
}

/// A session transcript for presentation.
#[derive(Debug, Clone)]
pub struct SessionTranscript {
    /// The session id.
    pub session_id: SessionId,
    /// Title derived from the first user turn.
    pub title: Option<String>,
    /// When the session was created.
    pub created_at: Timestamp,
    /// User-visible turns, oldest first.
    pub messages: Vec<Message>,
    /// True when a draft awaits confirmation.
    pub pending_confirmation: bool,
}

/// Handler for GetHistory queries.
pub struct GetHistoryHandler<S>
where
    S: SessionStore + ?Sized,
{
    session_store: Arc<S>,
}

impl<S> GetHistoryHandler<S>
where
    S: SessionStore + ?Sized + 'static,
{
    /// Creates a new handler with the given store.
    pub fn new(session_store: Arc<S>) -> Self {
        Self { session_store }
    }

    /// Fetches the transcript for a session.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if the id is unknown
    /// - `StoreError` if the store fails
    pub async fn handle(&self, session_id: SessionId) -> Result<SessionTranscript, GetHistoryError> {
        let session = self
            .session_store
            .find(&session_id)
            .await
            .map_err(|e| GetHistoryError::StoreError(e.to_string()))?
            .ok_or(GetHistoryError::SessionNotFound(session_id))?;

        let messages = session
            .history()
            .iter()
            .filter(|m| m.role().is_user_visible())
            .cloned()
            .collect();

        Ok(SessionTranscript {
            session_id,
            title: session.title().map(str::to_string),
            created_at: *session.created_at(),
            messages,
            pending_confirmation: !session.has_no_pending_draft(),
        })
    }
}
