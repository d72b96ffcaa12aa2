//! HTTP DTOs for chat endpoints.
//!
//! These types decouple the HTTP API from domain types, allowing independent evolution.

use serde::{Deserialize, Serialize};

use crate::application::handlers::chat::{SessionTranscript, TurnReply, TurnReplyKind};
use crate::domain::conversation::Message;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request body for submitting a turn.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitTurnRequest {
    /// Session to continue; omitted for a fresh session.
    #[serde(default)]
    pub session_id: Option<String>,
    /// Optional (unverified) owner id for a fresh session.
    #[serde(default)]
    pub owner_id: Option<String>,
    /// The user's input.
    pub message: String,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Response body for a submitted turn.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnReplyResponse {
    /// The session the turn belongs to.
    pub session_id: String,
    /// What the reply is.
    pub kind: TurnReplyKind,
    /// The text to show the user.
    pub reply: String,
    /// True when a draft is pending and `send` will dispatch it.
    pub pending_confirmation: bool,
}

impl From<TurnReply> for TurnReplyResponse {
    fn from(reply: TurnReply) -> Self {
        Self {
            session_id: reply.session_id.to_string(),
            kind: reply.kind,
            reply: reply.text,
            pending_confirmation: reply.pending_confirmation,
        }
    }
}

/// View of a session transcript for API responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptView {
    /// Session ID.
    pub session_id: String,
    /// Title derived from the first user turn.
    pub title: Option<String>,
    /// When the session was created.
    pub created_at: String,
    /// User-visible turns, oldest first.
    pub messages: Vec<MessageView>,
    /// True when a draft awaits confirmation.
    pub pending_confirmation: bool,
}

impl From<SessionTranscript> for TranscriptView {
    fn from(transcript: SessionTranscript) -> Self {
        Self {
            session_id: transcript.session_id.to_string(),
            title: transcript.title,
            created_at: transcript.created_at.to_rfc3339(),
            messages: transcript.messages.iter().map(MessageView::from).collect(),
            pending_confirmation: transcript.pending_confirmation,
        }
    }
}

/// View of a message for API responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageView {
    /// Message ID.
    pub id: String,
    /// Role of the message sender.
    pub role: String,
    /// Content of the message.
    pub content: String,
    /// When the message was sent.
    pub timestamp: String,
}

impl From<&Message> for MessageView {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id().to_string(),
            role: match message.role() {
                crate::domain::conversation::Role::System => "system",
                crate::domain::conversation::Role::User => "user",
                crate::domain::conversation::Role::Assistant => "assistant",
            }
            .to_string(),
            content: message.content().to_string(),
            timestamp: message.created_at().to_rfc3339(),
        }
    }
}

/// Standard error response body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Stable error code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

impl ErrorResponse {
    /// Creates an error response.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}
