//! Bank Concierge server entrypoint.
//!
//! Loads configuration from the environment, wires the adapters into the
//! chat application state, and serves the HTTP API.

use std::sync::Arc;
use std::time::Duration;

use http::{header, HeaderValue, Method};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bank_concierge::adapters::ai::{GroqConfig, GroqProvider};
use bank_concierge::adapters::email::{SendGridConfig, SendGridDispatcher};
use bank_concierge::adapters::http::{chat_router, ChatAppState};
use bank_concierge::adapters::storage::FileSessionStore;
use bank_concierge::config::AppConfig;
use bank_concierge::domain::bank::BankDirectory;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.server.log_level.clone())),
        )
        .init();

    let bank_directory = Arc::new(BankDirectory::builtin());

    let ai_provider = Arc::new(GroqProvider::new(
        GroqConfig::new(config.ai.groq_api_key.clone())
            .with_model(config.ai.model.clone())
            .with_timeout(config.ai.timeout())
            .with_max_tokens(config.ai.max_tokens),
    ));

    let email_dispatcher = Arc::new(SendGridDispatcher::new(
        SendGridConfig::new(
            config.email.sendgrid_api_key.clone(),
            config.email.from_email.clone(),
            config.email.from_name.clone(),
        )
        .with_timeout(config.email.timeout()),
    ));

    let session_store = Arc::new(FileSessionStore::new(&config.storage.data_dir));

    let state = ChatAppState::new(
        session_store,
        ai_provider,
        email_dispatcher,
        bank_directory,
        config.storage.history_capacity,
    );

    let app = chat_router()
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(Duration::from_secs(
                    config.server.request_timeout_secs,
                )))
                .layer(cors_layer(&config)),
        )
        .with_state(state);

    let addr = config.server.socket_addr();
    info!(%addr, environment = ?config.server.environment, "starting bank-concierge");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Builds the CORS layer: configured origins, or permissive in development.
fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(origins)
    }
}
