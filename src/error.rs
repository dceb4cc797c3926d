//! Error types for the Talkie gateway

use thiserror::Error;

/// Result type alias for Talkie operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the Talkie gateway
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// The platform offers no speech recognizer or synthesizer
    #[error("speech not supported: {0}")]
    Unsupported(String),

    /// A recognition session failed; the payload is the platform error code
    /// (e.g. "no-speech", "not-allowed", "network")
    #[error("recognition error: {0}")]
    Recognition(String),

    /// Speech synthesis error
    #[error("synthesis error: {0}")]
    Synthesis(String),

    /// The upstream language-model credential is not configured
    #[error("missing API key: set the OPENAI_API_KEY environment variable")]
    MissingCredential,

    /// Upstream chat-completion failure (non-2xx, empty completion, bad body)
    #[error("upstream error: {0}")]
    Upstream(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}
