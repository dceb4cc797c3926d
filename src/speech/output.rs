//! Speech synthesis output
//!
//! The synthesizer is an opaque platform collaborator behind the
//! [`Synthesizer`] trait. `speak` is non-blocking: utterances are queued to a
//! background worker and playback is best effort, most-recent wins —
//! a newer utterance supersedes one still waiting to play.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::VoiceSettings;
use crate::Result;

/// One unit of synthesized speech
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

/// Platform text-to-speech boundary
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Whether the platform offers speech synthesis at all
    fn is_supported(&self) -> bool;

    /// Play one utterance to completion
    ///
    /// # Errors
    ///
    /// Returns error if playback fails
    async fn play(&self, utterance: &Utterance) -> Result<()>;
}

/// Queues utterances for asynchronous playback at fixed parameters
pub struct SpeechOutput {
    settings: VoiceSettings,
    is_supported: bool,
    queue: watch::Sender<Option<Utterance>>,
    worker: JoinHandle<()>,
}

impl SpeechOutput {
    /// Create an output queue over the given synthesizer
    #[must_use]
    pub fn new(synthesizer: Arc<dyn Synthesizer>, settings: VoiceSettings) -> Self {
        let is_supported = synthesizer.is_supported();
        let (tx, rx) = watch::channel(None);
        let worker = tokio::spawn(playback_worker(synthesizer, rx));

        Self {
            settings,
            is_supported,
            queue: tx,
            worker,
        }
    }

    /// Whether the platform offers speech synthesis
    #[must_use]
    pub const fn is_supported(&self) -> bool {
        self.is_supported
    }

    /// Queue an utterance at the fixed rate/pitch/volume
    ///
    /// Returns immediately; playback happens asynchronously with no
    /// completion callback. A later call supersedes an utterance that has
    /// not started playing yet.
    pub fn speak(&self, text: impl Into<String>) {
        let utterance = Utterance {
            text: text.into(),
            rate: self.settings.rate,
            pitch: self.settings.pitch,
            volume: self.settings.volume,
        };

        tracing::debug!(text = %utterance.text, "utterance queued");
        // Receiver lives as long as the worker; a send failure means
        // shutdown is already underway
        let _ = self.queue.send(Some(utterance));
    }
}

impl Drop for SpeechOutput {
    fn drop(&mut self) {
        self.worker.abort();
    }
}

/// Drain the utterance slot, always playing the most recent value
async fn playback_worker(
    synthesizer: Arc<dyn Synthesizer>,
    mut rx: watch::Receiver<Option<Utterance>>,
) {
    while rx.changed().await.is_ok() {
        let utterance = rx.borrow_and_update().clone();
        let Some(utterance) = utterance else { continue };

        if let Err(e) = synthesizer.play(&utterance).await {
            tracing::warn!(error = %e, "utterance playback failed");
        }
    }
}
