//! Talkie Gateway - voice chat gateway for AI assistants
//!
//! This library provides the core functionality for the Talkie gateway:
//! - Speech capture and synthesis behind platform trait seams
//! - A conversation state machine (idle → listening → processing)
//! - Interchangeable response engines (hosted chat proxy, local responder)
//! - The hosted chat proxy endpoint itself
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                  Platform boundary                   │
//! │        Recognizer            Synthesizer             │
//! └────────────┬────────────────────────▲───────────────┘
//!              │ transcripts            │ utterances
//! ┌────────────▼────────────────────────┴───────────────┐
//! │              ConversationController                  │
//! │     SessionState │ history │ ResponseEngine          │
//! └────────────────────┬────────────────────────────────┘
//!                      │ POST /chat
//! ┌────────────────────▼────────────────────────────────┐
//! │           Chat proxy (axum, always-200)              │
//! │        upstream chat-completion service              │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod history;
pub mod llm;
pub mod prompt;
pub mod speech;

pub use config::Config;
pub use controller::{ConversationController, Phase, SessionState};
pub use engine::{LocalEngine, RemoteEngine, ResponseEngine};
pub use error::{Error, Result};
pub use history::{ConversationHistory, ConversationTurn, Role, HISTORY_WINDOW};
pub use speech::{
    CaptureSettings, Recognizer, SpeechCapture, SpeechOutput, Synthesizer, TranscriptEvent,
    Utterance,
};
