//! Console stand-ins for the platform speech boundary
//!
//! Drive the full capture → engine → output pipeline from a terminal without
//! audio hardware: typed lines play the role of recognized utterances, and
//! synthesized replies are printed instead of spoken.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::capture::{
    event_channel, CaptureSettings, RecognitionSession, Recognizer, TranscriptEvent,
};
use super::output::{Synthesizer, Utterance};
use crate::Result;

/// Recognizer that reads one line of input per session
///
/// Emits word-prefix interim results followed by the final transcript,
/// mimicking an incremental recognizer. An empty line surfaces the
/// platform's "no-speech" error code; a closed stdin surfaces "aborted" and
/// raises the closed flag.
#[derive(Debug, Default, Clone)]
pub struct LineRecognizer {
    closed: Arc<AtomicBool>,
}

impl LineRecognizer {
    /// Create a line recognizer
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flag raised once stdin has closed
    #[must_use]
    pub fn closed_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.closed)
    }
}

#[async_trait]
impl Recognizer for LineRecognizer {
    fn is_supported(&self) -> bool {
        true
    }

    async fn open_session(&self, settings: &CaptureSettings) -> Result<RecognitionSession> {
        let (tx, session) = event_channel();
        let interim = settings.interim_results;
        let closed = Arc::clone(&self.closed);

        tokio::spawn(async move {
            let mut line = String::new();
            let mut reader = BufReader::new(tokio::io::stdin());

            let heard = match reader.read_line(&mut line).await {
                Ok(0) | Err(_) => {
                    closed.store(true, Ordering::Relaxed);
                    let _ = tx.send(TranscriptEvent::Error("aborted".to_string())).await;
                    return;
                }
                Ok(_) => line.trim().to_string(),
            };

            if heard.is_empty() {
                let _ = tx.send(TranscriptEvent::Error("no-speech".to_string())).await;
                return;
            }

            if interim {
                let words: Vec<&str> = heard.split_whitespace().collect();
                for end in 1..words.len() {
                    let partial = words[..end].join(" ");
                    if tx.send(TranscriptEvent::Interim(partial)).await.is_err() {
                        return;
                    }
                }
            }

            let _ = tx.send(TranscriptEvent::Final(heard)).await;
        });

        Ok(session)
    }
}

/// Synthesizer that prints utterances to stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSynthesizer;

impl ConsoleSynthesizer {
    /// Create a console synthesizer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Synthesizer for ConsoleSynthesizer {
    fn is_supported(&self) -> bool {
        true
    }

    async fn play(&self, utterance: &Utterance) -> Result<()> {
        tracing::debug!(
            rate = utterance.rate,
            pitch = utterance.pitch,
            volume = utterance.volume,
            "playing utterance"
        );
        println!("talkie: {}", utterance.text);
        Ok(())
    }
}
