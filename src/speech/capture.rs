//! Speech capture sessions over a platform recognizer
//!
//! The recognizer itself is an opaque platform collaborator behind the
//! [`Recognizer`] trait; this module owns session lifecycle: single-utterance
//! sessions, interim results, early stop, and error propagation.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::config::VoiceSettings;
use crate::{Error, Result};

/// Channel capacity for transcript events
const EVENT_BUFFER: usize = 32;

/// Settings for one capture session
#[derive(Debug, Clone)]
pub struct CaptureSettings {
    /// Recognition locale (BCP 47 tag)
    pub locale: String,

    /// Deliver provisional transcripts before the final result
    pub interim_results: bool,

    /// Keep recognizing after the first final result
    ///
    /// Always false here: capture stops automatically after one utterance.
    pub continuous: bool,
}

impl CaptureSettings {
    /// Single-utterance settings for the configured locale
    #[must_use]
    pub fn from_voice(voice: &VoiceSettings) -> Self {
        Self {
            locale: voice.locale.clone(),
            interim_results: true,
            continuous: false,
        }
    }
}

/// One transcript event from an active session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptEvent {
    /// Provisional transcript, may be revised by later events
    Interim(String),

    /// Terminal transcript for the utterance; ends the session
    Final(String),

    /// Recognition failure code (e.g. "no-speech", "not-allowed");
    /// ends the session
    Error(String),
}

/// Handle to one running recognition session
pub struct RecognitionSession {
    events: mpsc::Receiver<TranscriptEvent>,
}

impl RecognitionSession {
    /// Create a session handle around an event receiver
    #[must_use]
    pub const fn new(events: mpsc::Receiver<TranscriptEvent>) -> Self {
        Self { events }
    }

    /// Next event, or `None` once the recognizer has hung up
    pub async fn next_event(&mut self) -> Option<TranscriptEvent> {
        self.events.recv().await
    }
}

/// Platform speech-to-text boundary
#[async_trait]
pub trait Recognizer: Send + Sync {
    /// Whether the platform offers speech recognition at all
    ///
    /// Queried once at startup; callers treat the answer as fixed for the
    /// process lifetime.
    fn is_supported(&self) -> bool;

    /// Open one recognition session
    ///
    /// Events flow on the returned channel until a [`TranscriptEvent::Final`]
    /// or [`TranscriptEvent::Error`], after which the recognizer closes it.
    ///
    /// # Errors
    ///
    /// Returns error if the session cannot be opened
    async fn open_session(&self, settings: &CaptureSettings) -> Result<RecognitionSession>;
}

/// Manages capture sessions over a recognizer
pub struct SpeechCapture {
    recognizer: Box<dyn Recognizer>,
    settings: CaptureSettings,
    session: Option<RecognitionSession>,
}

impl SpeechCapture {
    /// Create a capture manager for the given recognizer
    #[must_use]
    pub fn new(recognizer: Box<dyn Recognizer>, settings: CaptureSettings) -> Self {
        Self {
            recognizer,
            settings,
            session: None,
        }
    }

    /// Whether the platform offers speech recognition
    #[must_use]
    pub fn is_supported(&self) -> bool {
        self.recognizer.is_supported()
    }

    /// Begin a capture session
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] if the platform offers no recognizer,
    /// or the recognizer's error if the session cannot be opened.
    pub async fn start(&mut self) -> Result<()> {
        if !self.recognizer.is_supported() {
            return Err(Error::Unsupported(
                "speech recognition is not available on this platform".to_string(),
            ));
        }

        let session = self.recognizer.open_session(&self.settings).await?;
        self.session = Some(session);
        tracing::debug!(locale = %self.settings.locale, "capture session started");
        Ok(())
    }

    /// End the active session early, discarding further results
    pub fn stop(&mut self) {
        if self.session.take().is_some() {
            tracing::debug!("capture session stopped");
        }
    }

    /// Whether a session is currently active
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Next transcript event from the active session
    ///
    /// A `Final` or `Error` event ends the session automatically. Returns
    /// `None` when no session is active or the recognizer hung up without a
    /// terminal event.
    pub async fn next_event(&mut self) -> Option<TranscriptEvent> {
        let session = self.session.as_mut()?;
        let event = session.next_event().await;

        match event {
            Some(TranscriptEvent::Interim(_)) => {}
            // Terminal events and hang-ups end the session
            _ => {
                self.session = None;
            }
        }

        event
    }
}

/// Build an event channel pair for recognizer implementations
#[must_use]
pub fn event_channel() -> (mpsc::Sender<TranscriptEvent>, RecognitionSession) {
    let (tx, rx) = mpsc::channel(EVENT_BUFFER);
    (tx, RecognitionSession::new(rx))
}
