//! Conversation controller
//!
//! The state machine gluing capture → engine → output. One long-lived
//! interactive loop over three phases:
//!
//! ```text
//! Idle --toggle--> Listening --final--> Processing --engine--> Idle
//!        (clear)       |  \--toggle/error--> Idle      (speak reply)
//!                      \--interim--> Listening
//! ```
//!
//! The controller is the exclusive owner of [`SessionState`] and the
//! conversation history; everything else only reads. Every failure is caught
//! here and converted to a spoken + displayed message. The outstanding
//! engine call has no timeout: a stuck upstream leaves the turn in
//! `Processing` until it resolves.

use crate::engine::ResponseEngine;
use crate::history::{ConversationHistory, ConversationTurn};
use crate::speech::{SpeechCapture, SpeechOutput, TranscriptEvent};
use crate::Error;

/// Notice shown when the platform offers no recognizer or synthesizer
const UNSUPPORTED_NOTICE: &str =
    "Speech is not supported on this platform, so voice chat is unavailable.";

/// Spoken when a recognition session fails
const RECOGNITION_APOLOGY: &str = "Sorry, I didn't catch that. Please try again.";

/// Spoken when the engine reports a missing credential
const CREDENTIAL_APOLOGY: &str = "I can't reach my language model because no API key is \
     configured. Please add one to the gateway settings.";

/// Spoken on any other engine failure
const ENGINE_APOLOGY: &str = "Sorry, I'm having trouble responding right now. Please try again.";

/// Phase of the interaction loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the user to start a capture session
    Idle,
    /// A capture session is active
    Listening,
    /// A final transcript is awaiting its engine reply
    Processing,
}

/// Observable conversation state, mutated only by the controller
///
/// The phase enum makes "listening and processing at once" unrepresentable.
#[derive(Debug)]
pub struct SessionState {
    phase: Phase,
    /// Latest transcript, interim or final
    pub transcript: String,
    /// Latest reply or user-facing failure message
    pub response: String,
    /// Whether the platform offers speech capture and synthesis
    pub is_supported: bool,
    /// Set when the engine reports a missing credential; sticky until
    /// process restart
    pub needs_credential: bool,
}

impl SessionState {
    fn new(is_supported: bool) -> Self {
        Self {
            phase: Phase::Idle,
            transcript: String::new(),
            response: String::new(),
            is_supported,
            needs_credential: false,
        }
    }

    /// Current phase
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether a capture session is active
    #[must_use]
    pub const fn is_listening(&self) -> bool {
        matches!(self.phase, Phase::Listening)
    }

    /// Whether an engine call is outstanding
    #[must_use]
    pub const fn is_processing(&self) -> bool {
        matches!(self.phase, Phase::Processing)
    }
}

/// Drives one microphone, one response engine, and one speaker
pub struct ConversationController<E: ResponseEngine> {
    capture: SpeechCapture,
    output: SpeechOutput,
    engine: E,
    history: ConversationHistory,
    state: SessionState,
    /// Final transcript stored on entering `Processing`
    pending: Option<String>,
}

impl<E: ResponseEngine> ConversationController<E> {
    /// Create a controller; capability is queried once, here
    #[must_use]
    pub fn new(capture: SpeechCapture, output: SpeechOutput, engine: E) -> Self {
        let is_supported = capture.is_supported() && output.is_supported();
        if !is_supported {
            tracing::warn!("speech not supported; voice chat disabled");
        }

        Self {
            capture,
            output,
            engine,
            history: ConversationHistory::new(),
            state: SessionState::new(is_supported),
            pending: None,
        }
    }

    /// Observable conversation state
    #[must_use]
    pub const fn session(&self) -> &SessionState {
        &self.state
    }

    /// Recorded conversation, oldest first
    #[must_use]
    pub const fn history(&self) -> &ConversationHistory {
        &self.history
    }

    /// Toggle the capture session (the voice button)
    ///
    /// Idle → Listening (clearing transcript and response);
    /// Listening → Idle (explicit cancel); no-op while Processing or when
    /// speech is unsupported (with a user-visible notice).
    pub async fn toggle(&mut self) {
        if !self.state.is_supported {
            tracing::warn!("toggle ignored: speech not supported");
            self.state.response = UNSUPPORTED_NOTICE.to_string();
            return;
        }

        match self.state.phase {
            Phase::Processing => {
                tracing::debug!("toggle ignored while processing");
            }
            Phase::Listening => {
                tracing::debug!("capture cancelled");
                self.capture.stop();
                self.state.phase = Phase::Idle;
            }
            Phase::Idle => {
                self.state.transcript.clear();
                self.state.response.clear();

                match self.capture.start().await {
                    Ok(()) => {
                        tracing::debug!("listening");
                        self.state.phase = Phase::Listening;
                    }
                    Err(e) => self.fail_listening(&e),
                }
            }
        }
    }

    /// Feed one transcript event through the state machine
    ///
    /// A `Final` event stores the transcript, ends capture, and enters
    /// `Processing`; call [`process_pending`](Self::process_pending) to
    /// perform the engine round trip. Events outside `Listening` are
    /// ignored.
    pub fn handle_event(&mut self, event: TranscriptEvent) {
        if !self.state.is_listening() {
            tracing::debug!(?event, "transcript event outside listening ignored");
            return;
        }

        match event {
            TranscriptEvent::Interim(text) => {
                self.state.transcript = text;
            }
            TranscriptEvent::Final(text) => {
                tracing::info!(transcript = %text, "final transcript");
                self.state.transcript = text.clone();
                self.capture.stop();
                self.state.phase = Phase::Processing;
                self.pending = Some(text);
            }
            TranscriptEvent::Error(code) => {
                self.fail_listening(&Error::Recognition(code));
            }
        }
    }

    /// Resolve the pending transcript through the engine
    ///
    /// Processing → Idle, storing and speaking either the reply or a fixed
    /// failure message. No-op outside `Processing`.
    pub async fn process_pending(&mut self) {
        let Some(message) = self.pending.take() else {
            return;
        };

        let reply = match self.engine.respond(&message, self.history.turns()).await {
            Ok(reply) => {
                if self.engine.retains_history() {
                    self.history.push(ConversationTurn::user(message));
                    self.history.push(ConversationTurn::assistant(reply.clone()));
                }
                reply
            }
            Err(Error::MissingCredential) => {
                tracing::warn!("engine reports missing credential");
                self.state.needs_credential = true;
                CREDENTIAL_APOLOGY.to_string()
            }
            Err(e) => {
                tracing::error!(error = %e, "engine failure");
                ENGINE_APOLOGY.to_string()
            }
        };

        self.state.response = reply.clone();
        self.output.speak(reply);
        self.state.phase = Phase::Idle;
    }

    /// Run one full voice turn: listen, process, speak
    ///
    /// The normal driver for interactive use; tests exercise the individual
    /// transitions instead.
    pub async fn run_turn(&mut self) {
        self.toggle().await;

        while self.state.is_listening() {
            match self.capture.next_event().await {
                Some(event) => self.handle_event(event),
                None => {
                    // Recognizer hung up without a terminal event
                    self.fail_listening(&Error::Recognition("aborted".to_string()));
                }
            }
        }

        self.process_pending().await;
    }

    /// Surface a capture failure and return to `Idle`; no automatic retry
    fn fail_listening(&mut self, error: &Error) {
        tracing::warn!(error = %error, "capture failed");
        self.capture.stop();
        self.state.response = RECOGNITION_APOLOGY.to_string();
        self.output.speak(RECOGNITION_APOLOGY);
        self.state.phase = Phase::Idle;
    }
}
