//! HTTP adapter for the chat endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{ErrorResponse, MessageView, SubmitTurnRequest, TranscriptView, TurnReplyResponse};
pub use handlers::{ChatApiError, ChatAppState};
pub use routes::{chat_router, chat_routes};
