//! Upstream chat-completion client
//!
//! Thin reqwest client for an OpenAI-style `/v1/chat/completions` endpoint.
//! Generation parameters are fixed for the voice-assistant use case.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::history::{ConversationTurn, Role};
use crate::{Error, Result};

/// Maximum completion length
const MAX_TOKENS: u32 = 300;

/// Sampling temperature
const TEMPERATURE: f32 = 0.7;

/// Presence penalty
const PRESENCE_PENALTY: f32 = 0.6;

/// Frequency penalty
const FREQUENCY_PENALTY: f32 = 0.3;

/// One message of the upstream request
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    /// Build a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Build a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// Convert a recorded conversation turn
    #[must_use]
    pub fn from_turn(turn: &ConversationTurn) -> Self {
        let role = match turn.role {
            Role::User => "user",
            Role::Assistant => "assistant",
        };
        Self {
            role: role.to_string(),
            content: turn.content.clone(),
        }
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
    presence_penalty: f32,
    frequency_penalty: f32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

/// Client for the upstream chat-completion service
pub struct ChatCompletions {
    client: reqwest::Client,
    url: String,
    model: String,
}

impl ChatCompletions {
    /// Create a new client for the given endpoint and model
    #[must_use]
    pub fn new(url: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
            model,
        }
    }

    /// Request one completion for the given message list
    ///
    /// # Errors
    ///
    /// Returns [`Error::Upstream`] on a non-2xx response, an unparsable
    /// body, or an empty completion.
    pub async fn complete(
        &self,
        api_key: &SecretString,
        messages: &[ChatMessage],
    ) -> Result<String> {
        let request = CompletionRequest {
            model: &self.model,
            messages,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            presence_penalty: PRESENCE_PENALTY,
            frequency_penalty: FREQUENCY_PENALTY,
        };

        tracing::debug!(model = %self.model, messages = messages.len(), "requesting completion");

        let response = self
            .client
            .post(&self.url)
            .header(
                "Authorization",
                format!("Bearer {}", api_key.expose_secret()),
            )
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "completion request failed");
                Error::Upstream(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "completion API error");
            return Err(Error::Upstream(format!("completion API error {status}")));
        }

        let result: CompletionResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "failed to parse completion response");
            Error::Upstream(e.to_string())
        })?;

        // Returned verbatim: no trimming or post-processing
        let text = result
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::Upstream("empty completion".to_string()))?;

        tracing::debug!(response_len = text.len(), "completion received");
        Ok(text)
    }
}
