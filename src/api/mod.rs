//! HTTP API server for the Talkie gateway

pub mod chat;
pub mod health;

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::llm::ChatCompletions;
use crate::Result;

/// Shared state for API handlers
pub struct ApiState {
    /// Upstream chat-completion client
    pub completions: ChatCompletions,
}

impl ApiState {
    /// Build API state from configuration
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            completions: ChatCompletions::new(
                config.upstream.url.clone(),
                config.upstream.model.clone(),
            ),
        }
    }
}

/// Assemble the full router
///
/// CORS is permissive for any origin so browser front ends on other origins
/// can reach the proxy; preflight `OPTIONS` requests are answered here.
#[must_use]
pub fn router(state: Arc<ApiState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(chat::router(state))
        .merge(health::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Run the HTTP server until interrupted
///
/// # Errors
///
/// Returns error if the listener cannot bind
pub async fn serve(config: &Config) -> Result<()> {
    let state = Arc::new(ApiState::from_config(config));
    let app = router(state);

    let addr = format!("0.0.0.0:{}", config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "API server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
