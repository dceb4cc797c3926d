//! Speech processing module
//!
//! Capture and synthesis sit behind trait seams; the platform recognizer and
//! synthesizer are opaque external collaborators.

mod capture;
mod console;
mod output;

pub use capture::{
    event_channel, CaptureSettings, RecognitionSession, Recognizer, SpeechCapture, TranscriptEvent,
};
pub use console::{ConsoleSynthesizer, LineRecognizer};
pub use output::{SpeechOutput, Synthesizer, Utterance};
