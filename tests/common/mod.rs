//! Shared test doubles for the platform speech boundary
//!
//! Tests drive the conversation pipeline without audio hardware: a scripted
//! recognizer replays canned transcript events and a recording synthesizer
//! collects utterances instead of playing them.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use talkie_gateway::config::VoiceSettings;
use talkie_gateway::speech::{
    event_channel, CaptureSettings, RecognitionSession, Recognizer, SpeechCapture, SpeechOutput,
    Synthesizer, TranscriptEvent, Utterance,
};
use talkie_gateway::{ConversationController, ResponseEngine, Result};

/// Recognizer that replays one scripted event sequence per session
pub struct ScriptedRecognizer {
    scripts: Mutex<VecDeque<Vec<TranscriptEvent>>>,
    supported: bool,
}

impl ScriptedRecognizer {
    /// Create a recognizer that will replay the given scripts, in order
    pub fn new(scripts: Vec<Vec<TranscriptEvent>>) -> Self {
        Self {
            scripts: Mutex::new(scripts.into()),
            supported: true,
        }
    }

    /// Create a recognizer for a platform without speech recognition
    pub fn unsupported() -> Self {
        Self {
            scripts: Mutex::new(VecDeque::new()),
            supported: false,
        }
    }
}

#[async_trait]
impl Recognizer for ScriptedRecognizer {
    fn is_supported(&self) -> bool {
        self.supported
    }

    async fn open_session(&self, _settings: &CaptureSettings) -> Result<RecognitionSession> {
        let script = self.scripts.lock().unwrap().pop_front().unwrap_or_default();

        let (tx, session) = event_channel();
        for event in script {
            tx.send(event).await.expect("event buffer large enough");
        }
        // Dropping the sender closes the session after the scripted events

        Ok(session)
    }
}

/// Synthesizer that records utterance texts instead of playing them
pub struct RecordingSynthesizer {
    spoken: Arc<Mutex<Vec<String>>>,
}

impl RecordingSynthesizer {
    pub fn new() -> Self {
        Self {
            spoken: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Handle to the recorded utterance texts
    pub fn spoken(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.spoken)
    }
}

#[async_trait]
impl Synthesizer for RecordingSynthesizer {
    fn is_supported(&self) -> bool {
        true
    }

    async fn play(&self, utterance: &Utterance) -> Result<()> {
        self.spoken.lock().unwrap().push(utterance.text.clone());
        Ok(())
    }
}

/// Engine that pops one scripted result per call
pub struct ScriptedEngine {
    replies: Mutex<VecDeque<Result<String>>>,
    retains: bool,
}

impl ScriptedEngine {
    pub fn new(replies: Vec<Result<String>>, retains: bool) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            retains,
        }
    }
}

#[async_trait]
impl ResponseEngine for ScriptedEngine {
    async fn respond(
        &self,
        _message: &str,
        _history: &[talkie_gateway::ConversationTurn],
    ) -> Result<String> {
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(String::new()))
    }

    fn retains_history(&self) -> bool {
        self.retains
    }
}

/// Build a controller over scripted speech doubles
///
/// Returns the controller plus a handle to the utterances it speaks.
pub fn controller_with<E: ResponseEngine>(
    recognizer: ScriptedRecognizer,
    engine: E,
) -> (ConversationController<E>, Arc<Mutex<Vec<String>>>) {
    let voice = VoiceSettings::default();
    let capture = SpeechCapture::new(Box::new(recognizer), CaptureSettings::from_voice(&voice));

    let synthesizer = RecordingSynthesizer::new();
    let spoken = synthesizer.spoken();
    let output = SpeechOutput::new(Arc::new(synthesizer), voice);

    (ConversationController::new(capture, output, engine), spoken)
}
