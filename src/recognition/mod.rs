//! Transcript listener: the speech-to-text boundary
//!
//! The daemon does not do speech recognition itself. An external
//! recognizer pipes one recognized utterance per line into stdin; this
//! listener normalizes each line and splits wake detections from plain
//! recognized text. It runs on a dedicated thread for the whole process
//! lifetime.

use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::events::RecognitionEvent;

/// Errors that can occur starting the transcript listener
#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    #[error("transcript listener is already running")]
    AlreadyRunning,

    #[error("failed to spawn listener thread: {0}")]
    ThreadSpawn(String),
}

/// Reads recognized utterances from stdin and emits recognition events.
pub struct TranscriptListener {
    event_tx: mpsc::Sender<RecognitionEvent>,
    wake_word: String,
    running: Arc<AtomicBool>,
}

impl TranscriptListener {
    pub fn new(event_tx: mpsc::Sender<RecognitionEvent>, wake_word: String) -> Self {
        Self {
            event_tx,
            wake_word,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start the listener thread.
    ///
    /// The thread runs until stdin closes, the controller goes away, or
    /// `stop()` is called.
    pub fn start(&self) -> Result<(), ListenerError> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(ListenerError::AlreadyRunning);
        }

        let event_tx = self.event_tx.clone();
        let wake_word = self.wake_word.clone();
        let running = Arc::clone(&self.running);

        thread::Builder::new()
            .name("transcript-listener".to_string())
            .spawn(move || {
                info!(wake_word = %wake_word, "transcript listener started");

                let stdin = std::io::stdin();
                for line in stdin.lock().lines() {
                    if !running.load(Ordering::SeqCst) {
                        break;
                    }
                    let line = match line {
                        Ok(line) => line,
                        Err(e) => {
                            warn!(error = %e, "transcript read failed");
                            break;
                        }
                    };
                    let Some(event) = interpret_line(&line, &wake_word) else {
                        continue;
                    };
                    debug!(%event, "recognition event");
                    if event_tx.blocking_send(event).is_err() {
                        warn!("controller gone, stopping listener");
                        break;
                    }
                }

                running.store(false, Ordering::SeqCst);
                info!("transcript listener stopped");
            })
            .map_err(|e| ListenerError::ThreadSpawn(e.to_string()))?;

        Ok(())
    }

    /// Stop the listener; takes effect on the next transcript line.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// Turn one transcript line into a recognition event.
///
/// Lines are lowercased and trimmed; blank lines produce nothing. A line
/// containing the wake word anywhere becomes a wake detection, everything
/// else is recognized text.
fn interpret_line(line: &str, wake_word: &str) -> Option<RecognitionEvent> {
    let text = line.trim().to_lowercase();
    if text.is_empty() {
        return None;
    }
    if text.contains(wake_word) {
        Some(RecognitionEvent::WakeDetected)
    } else {
        Some(RecognitionEvent::TextRecognized { text })
    }
}
