//! Chat session aggregate.
//!
//! A session is the unit of conversation state: one bounded history, one
//! pending-email slot, one (optional, unverified) owner. Sessions are
//! created on the first user message and live until the transport drops
//! them; the core never deletes one.
//!
//! All per-session mutation flows through this aggregate so that no
//! conversation state lives in process-wide variables.

use crate::domain::email::{EmailDraft, PendingEmailSlot};
use crate::domain::foundation::{DomainError, SessionId, Timestamp, UserId};
use serde::{Deserialize, Serialize};

use super::history::MessageHistory;
use super::message::Message;

/// Maximum length for a derived session title.
pub const MAX_TITLE_LENGTH: usize = 100;

/// Logical mode of a session, derived from the pending-email slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    /// No draft is pending; inputs are treated as fresh queries.
    AwaitingQuery,
    /// A draft is pending; the confirmation token will dispatch it.
    AwaitingConfirmation,
}

/// Chat session aggregate.
///
/// # Invariants
///
/// - `history.len() <= history.capacity()` at all times
/// - The pending slot holds 0 or 1 draft
/// - `title` is set from the first user turn and never exceeds
///   [`MAX_TITLE_LENGTH`] characters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSession {
    /// Unique identifier for this session.
    id: SessionId,

    /// Optional owner; sessions may be anonymous.
    owner_id: Option<UserId>,

    /// Title derived from the first user turn.
    title: Option<String>,

    /// Bounded conversation history.
    history: MessageHistory,

    /// At most one unconfirmed outgoing email.
    pending: PendingEmailSlot,

    /// When the session was created.
    created_at: Timestamp,

    /// When the session was last updated.
    updated_at: Timestamp,
}

impl ChatSession {
    /// Creates a fresh session with an empty history and empty slot.
    pub fn new(id: SessionId, owner_id: Option<UserId>, history_capacity: usize) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            owner_id,
            title: None,
            history: MessageHistory::with_capacity(history_capacity),
            pending: PendingEmailSlot::empty(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Reconstitutes a session from persistence (no validation).
    pub fn reconstitute(
        id: SessionId,
        owner_id: Option<UserId>,
        title: Option<String>,
        history: MessageHistory,
        pending: PendingEmailSlot,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            owner_id,
            title,
            history,
            pending,
            created_at,
            updated_at,
        }
    }

    /// Returns the session ID.
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Returns the owner, if any.
    pub fn owner_id(&self) -> Option<&UserId> {
        self.owner_id.as_ref()
    }

    /// Returns the derived title, if the first turn has arrived.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Returns the conversation history.
    pub fn history(&self) -> &MessageHistory {
        &self.history
    }

    /// Returns when the session was created.
    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Returns when the session was last updated.
    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    /// Returns the current logical mode.
    pub fn mode(&self) -> SessionMode {
        if self.pending.is_empty() {
            SessionMode::AwaitingQuery
        } else {
            SessionMode::AwaitingConfirmation
        }
    }

    /// Records a user turn.
    ///
    /// The first user turn also derives the session title.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if content is empty
    pub fn record_user_turn(&mut self, content: impl Into<String>) -> Result<(), DomainError> {
        let message = Message::user(content)?;
        if self.title.is_none() {
            self.title = Some(derive_title(message.content()));
        }
        self.history.append(message);
        self.touch();
        Ok(())
    }

    /// Records an assistant turn.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if content is empty
    pub fn record_assistant_turn(
        &mut self,
        content: impl Into<String>,
    ) -> Result<(), DomainError> {
        let message = Message::assistant(content)?;
        self.history.append(message);
        self.touch();
        Ok(())
    }

    /// Replaces any pending draft with a new one (last write wins).
    pub fn set_pending_draft(&mut self, draft: EmailDraft) {
        self.pending.set(draft);
        self.touch();
    }

    /// Returns the pending draft without clearing it.
    pub fn peek_pending_draft(&self) -> Option<&EmailDraft> {
        self.pending.peek()
    }

    /// Takes the pending draft, leaving the slot empty.
    ///
    /// This is the only read-and-clear path; a second confirmation without
    /// a new draft observes an empty slot.
    pub fn take_pending_draft(&mut self) -> Option<EmailDraft> {
        let draft = self.pending.take_and_clear();
        if draft.is_some() {
            self.touch();
        }
        draft
    }

    /// Returns true if no draft is pending.
    pub fn has_no_pending_draft(&self) -> bool {
        self.pending.is_empty()
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}

/// Derives a session title from the first user turn.
fn derive_title(content: &str) -> String {
    let trimmed = content.trim();
    trimmed.chars().take(MAX_TITLE_LENGTH).collect()
}
