//! Chat proxy endpoint
//!
//! `POST /chat` forwards one user message (plus rolling history) to the
//! upstream chat-completion service. The endpoint always answers HTTP 200
//! with a `{ response, success, error? }` envelope — `success:false` is the
//! only failure signal, so clients have exactly one error path.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use super::ApiState;
use crate::history::ConversationTurn;
use crate::{config, prompt, Error};

/// Spoken apology used when the upstream call fails
const UPSTREAM_APOLOGY: &str = "Sorry, I'm having trouble responding right now. Please try again.";

/// Setup notice sent when no credential is configured
const CREDENTIAL_NOTICE: &str = "I need an API key to answer that. Please add your OpenAI API key \
     to the server configuration.";

/// Chat proxy request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The new user message
    pub message: String,

    /// Rolling conversation so far, oldest first
    #[serde(rename = "conversationHistory", default)]
    pub conversation_history: Vec<ConversationTurn>,
}

/// Chat proxy response envelope, sent with HTTP 200 in every case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatEnvelope {
    /// Reply text; on failure, a fixed user-facing message
    pub response: String,

    /// Whether the reply came from the upstream service
    pub success: bool,

    /// Failure detail, present only when `success` is false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChatEnvelope {
    /// Successful envelope around a completion
    #[must_use]
    pub const fn ok(response: String) -> Self {
        Self {
            response,
            success: true,
            error: None,
        }
    }

    /// Failure envelope with a spoken fallback and an error detail
    fn fail(response: &str, error: String) -> Self {
        Self {
            response: response.to_string(),
            success: false,
            error: Some(error),
        }
    }
}

/// Build the chat router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new().route("/chat", post(chat)).with_state(state)
}

/// Handle one proxied chat turn
///
/// Malformed request JSON is folded into the same always-200 envelope as
/// upstream failures.
async fn chat(
    State(state): State<Arc<ApiState>>,
    request: Result<Json<ChatRequest>, JsonRejection>,
) -> Json<ChatEnvelope> {
    let Json(request) = match request {
        Ok(request) => request,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "malformed chat request");
            return Json(ChatEnvelope::fail(
                UPSTREAM_APOLOGY,
                format!("invalid request: {rejection}"),
            ));
        }
    };

    tracing::info!(
        message = %request.message,
        history_turns = request.conversation_history.len(),
        "chat request received"
    );

    Json(respond(&state, &request).await)
}

/// Resolve the credential, build the message list, call upstream
async fn respond(state: &ApiState, request: &ChatRequest) -> ChatEnvelope {
    let Some(api_key) = config::upstream_api_key() else {
        tracing::warn!("chat request with no upstream credential configured");
        return ChatEnvelope::fail(CREDENTIAL_NOTICE, Error::MissingCredential.to_string());
    };

    let messages = prompt::build_messages(&request.conversation_history, &request.message);

    match state.completions.complete(&api_key, &messages).await {
        Ok(response) => ChatEnvelope::ok(response),
        Err(e) => {
            tracing::error!(error = %e, "upstream completion failed");
            ChatEnvelope::fail(UPSTREAM_APOLOGY, e.to_string())
        }
    }
}
