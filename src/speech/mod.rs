//! Speech output sink
//!
//! All spoken text is serialized through one queue drained by a dedicated
//! worker thread, so speech never overlaps no matter how many components
//! enqueue concurrently. Enqueue never blocks and never fails visibly:
//! backend failures fall through the strategy list in [`backends`].

mod backends;

pub use backends::{default_backends, SpeechBackend};

use std::thread::{self, JoinHandle};

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Messages consumed by the speech worker
#[derive(Debug)]
pub enum SpeechMessage {
    Say(String),
    /// Sentinel ending the worker thread
    Stop,
}

/// Cloneable handle for enqueueing speech.
#[derive(Debug, Clone)]
pub struct SpeechSink {
    tx: mpsc::UnboundedSender<SpeechMessage>,
}

impl SpeechSink {
    /// Create a sink and its receiving end. Pair with [`spawn_worker`] in
    /// production; tests can drain the receiver directly.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<SpeechMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Enqueue text to be spoken. Returns false for blank text; otherwise
    /// fire-and-forget.
    pub fn speak(&self, text: &str) -> bool {
        if text.trim().is_empty() {
            return false;
        }
        if self.tx.send(SpeechMessage::Say(text.to_string())).is_err() {
            warn!("speech worker gone, dropping message");
            return false;
        }
        true
    }

    /// Signal the worker to stop after draining everything queued so far.
    pub fn close(&self) {
        let _ = self.tx.send(SpeechMessage::Stop);
    }
}

/// Start the dedicated speech worker thread.
///
/// The worker pulls messages in order and tries each backend in sequence
/// until one succeeds; the terminal console backend guarantees delivery.
pub fn spawn_worker(
    mut rx: mpsc::UnboundedReceiver<SpeechMessage>,
    backends: Vec<Box<dyn SpeechBackend>>,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("speech-worker".to_string())
        .spawn(move || {
            info!("speech worker started");
            while let Some(message) = rx.blocking_recv() {
                match message {
                    SpeechMessage::Say(text) => {
                        info!(speech = %text, "speaking");
                        vocalize(&backends, &text);
                    }
                    SpeechMessage::Stop => break,
                }
            }
            info!("speech worker stopped");
        })
}

/// Try each backend in order until one succeeds.
fn vocalize(backends: &[Box<dyn SpeechBackend>], text: &str) {
    for backend in backends {
        match backend.render(text) {
            Ok(()) => {
                debug!(backend = backend.name(), "speech rendered");
                return;
            }
            Err(e) => {
                debug!(backend = backend.name(), error = %e, "backend failed, trying next");
            }
        }
    }
    // Unreachable with the default list (console never fails), but a
    // custom list may be exhaustible.
    warn!(speech = %text, "all speech backends failed");
}
