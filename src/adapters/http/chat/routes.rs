//! Axum routes for chat endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{get_transcript, submit_turn, ChatAppState};

/// Creates routes for chat endpoints.
///
/// REST Endpoints:
/// - POST /api/chat - Submit one conversation turn
/// - GET /api/chat/{session_id} - Get the transcript for a session
pub fn chat_routes() -> Router<ChatAppState> {
    Router::new()
        .route("/chat", post(submit_turn))
        .route("/chat/:session_id", get(get_transcript))
}

/// Combined router with all chat routes under /api.
pub fn chat_router() -> Router<ChatAppState> {
    Router::new().nest("/api", chat_routes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_routes_creates_valid_router() {
        let _routes = chat_routes();
    }

    #[test]
    fn chat_router_creates_combined_router() {
        let _router = chat_router();
    }
}
