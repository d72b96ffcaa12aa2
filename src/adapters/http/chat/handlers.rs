//! HTTP handlers for chat endpoints.
//!
//! These handlers connect Axum routes to the application layer.

use std::sync::Arc;

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::application::handlers::chat::{
    GetHistoryError, GetHistoryHandler, SubmitTurnCommand, SubmitTurnError, SubmitTurnHandler,
};
use crate::domain::bank::BankDirectory;
use crate::domain::foundation::{SessionId, UserId};
use crate::ports::{AiProvider, EmailDispatcher, SessionStore};

use super::dto::{ErrorResponse, SubmitTurnRequest, TranscriptView, TurnReplyResponse};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state for chat handlers.
///
/// Cloned per request; dependencies are Arc-wrapped for cheap sharing.
#[derive(Clone)]
pub struct ChatAppState {
    pub session_store: Arc<dyn SessionStore>,
    pub ai_provider: Arc<dyn AiProvider>,
    pub email_dispatcher: Arc<dyn EmailDispatcher>,
    pub bank_directory: Arc<BankDirectory>,
    pub history_capacity: usize,
}

impl ChatAppState {
    /// Creates a new ChatAppState.
    pub fn new(
        session_store: Arc<dyn SessionStore>,
        ai_provider: Arc<dyn AiProvider>,
        email_dispatcher: Arc<dyn EmailDispatcher>,
        bank_directory: Arc<BankDirectory>,
        history_capacity: usize,
    ) -> Self {
        Self {
            session_store,
            ai_provider,
            email_dispatcher,
            bank_directory,
            history_capacity,
        }
    }

    /// Create the turn controller from the shared state.
    pub fn submit_turn_handler(
        &self,
    ) -> SubmitTurnHandler<dyn SessionStore, dyn AiProvider, dyn EmailDispatcher> {
        SubmitTurnHandler::new(
            self.session_store.clone(),
            self.ai_provider.clone(),
            self.email_dispatcher.clone(),
            self.bank_directory.clone(),
            self.history_capacity,
        )
    }

    /// Create the transcript query handler from the shared state.
    pub fn get_history_handler(&self) -> GetHistoryHandler<dyn SessionStore> {
        GetHistoryHandler::new(self.session_store.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Error mapping
// ════════════════════════════════════════════════════════════════════════════════

/// API-level error with a status code and a stable code string.
#[derive(Debug)]
pub enum ChatApiError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl IntoResponse for ChatApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ChatApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
            }
            ChatApiError::NotFound(message) => (StatusCode::NOT_FOUND, "NOT_FOUND", message),
            // Internal detail goes to the log, not the client
            ChatApiError::Internal(detail) => {
                tracing::error!(error = %detail, "internal error serving chat request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Something went wrong.".to_string(),
                )
            }
        };
        (status, Json(ErrorResponse::new(code, message))).into_response()
    }
}

impl From<SubmitTurnError> for ChatApiError {
    fn from(err: SubmitTurnError) -> Self {
        match err {
            SubmitTurnError::EmptyMessage => ChatApiError::BadRequest(err.to_string()),
            SubmitTurnError::StoreError(detail) => ChatApiError::Internal(detail),
        }
    }
}

impl From<GetHistoryError> for ChatApiError {
    fn from(err: GetHistoryError) -> Self {
        match err {
            GetHistoryError::SessionNotFound(id) => {
                ChatApiError::NotFound(format!("Session {} not found", id))
            }
            GetHistoryError::StoreError(detail) => ChatApiError::Internal(detail),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// POST /api/chat
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/chat - Submit one conversation turn.
///
/// A missing or unknown `sessionId` starts a fresh session; the reply always
/// carries the id to continue with.
///
/// # Errors
/// - 400 Bad Request: empty message or malformed session id
/// - 500 Internal Server Error: session store failure
pub async fn submit_turn(
    State(state): State<ChatAppState>,
    Json(request): Json<SubmitTurnRequest>,
) -> Result<impl IntoResponse, ChatApiError> {
    let session_id = match request.session_id.as_deref() {
        Some(raw) => Some(raw.parse::<SessionId>().map_err(|_| {
            ChatApiError::BadRequest("Invalid session ID format".to_string())
        })?),
        None => None,
    };

    let owner_id = match request.owner_id {
        Some(raw) => Some(
            UserId::new(raw)
                .map_err(|e| ChatApiError::BadRequest(e.to_string()))?,
        ),
        None => None,
    };

    let command = SubmitTurnCommand {
        session_id,
        owner_id,
        message: request.message,
    };

    let reply = state.submit_turn_handler().handle(command).await?;

    Ok((StatusCode::OK, Json(TurnReplyResponse::from(reply))))
}

// ════════════════════════════════════════════════════════════════════════════════
// GET /api/chat/{session_id}
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/chat/{session_id} - Get the transcript for a session.
///
/// # Errors
/// - 400 Bad Request: malformed session id
/// - 404 Not Found: unknown session
pub async fn get_transcript(
    State(state): State<ChatAppState>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, ChatApiError> {
    let session_id: SessionId = session_id
        .parse()
        .map_err(|_| ChatApiError::BadRequest("Invalid session ID format".to_string()))?;

    let transcript = state.get_history_handler().handle(session_id).await?;

    Ok((StatusCode::OK, Json(TranscriptView::from(transcript))))
}
