//! Remote response engine
//!
//! Client for the hosted chat proxy. The proxy signals failure only through
//! `success:false` in its always-200 envelope, so this client treats the
//! envelope — not the HTTP status — as the source of truth.

use async_trait::async_trait;

use super::ResponseEngine;
use crate::api::chat::{ChatEnvelope, ChatRequest};
use crate::history::ConversationTurn;
use crate::{Error, Result};

/// Response engine backed by the hosted chat proxy
pub struct RemoteEngine {
    client: reqwest::Client,
    endpoint: String,
}

impl RemoteEngine {
    /// Create a remote engine for the given proxy endpoint
    #[must_use]
    pub fn new(endpoint: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }
}

#[async_trait]
impl ResponseEngine for RemoteEngine {
    async fn respond(&self, message: &str, history: &[ConversationTurn]) -> Result<String> {
        let request = ChatRequest {
            message: message.to_string(),
            conversation_history: history.to_vec(),
        };

        tracing::debug!(endpoint = %self.endpoint, history_turns = history.len(), "calling chat proxy");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "chat proxy request failed");
                Error::Upstream(e.to_string())
            })?;

        // Application failures ride inside a 200; any other status is a
        // transport-level anomaly
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "chat proxy returned non-200");
            return Err(Error::Upstream(format!("chat proxy error {status}")));
        }

        let envelope: ChatEnvelope = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "failed to parse chat proxy envelope");
            Error::Upstream(e.to_string())
        })?;

        if envelope.success {
            return Ok(envelope.response);
        }

        let detail = envelope.error.unwrap_or_else(|| "unknown error".to_string());
        if detail.contains("API key") {
            tracing::warn!("chat proxy reports missing credential");
            return Err(Error::MissingCredential);
        }

        tracing::error!(error = %detail, "chat proxy reported failure");
        Err(Error::Upstream(detail))
    }

    fn retains_history(&self) -> bool {
        true
    }
}
