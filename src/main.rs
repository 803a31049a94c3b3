//! jarvis-daemon: wake-word voice assistant daemon
//!
//! Consumes a stream of recognition events (wake detections and recognized
//! utterances), maintains the conversational mode, and routes each
//! utterance to a built-in action, note dictation, or an asynchronous
//! language-model query. Speech output is serialized through a single
//! best-effort sink.
//!
//! External collaborators at the boundary:
//! - speech-to-text: pipes recognized utterances into stdin, one per line
//! - text-to-speech: ordered backend list, degrades to a console echo
//! - language model: `ollama run`, one independent worker per query

mod actions;
mod command;
mod config;
mod events;
mod lifecycle;
mod query;
mod recognition;
mod session;
mod speech;

use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::actions::Actions;
use crate::command::Classifier;
use crate::config::Config;
use crate::events::SessionInput;
use crate::lifecycle::ShutdownSignal;
use crate::query::QueryWorker;
use crate::recognition::TranscriptListener;
use crate::session::SessionController;
use crate::speech::SpeechSink;

/// Delay between the shutdown announcement and stopping the speech queue,
/// so the announcement has a chance to start playing.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(800);

/// Delay before the ready announcement, so it lands after the audio stack
/// has settled rather than mid-startup.
const STARTUP_ANNOUNCE_DELAY: Duration = Duration::from_millis(1500);

/// Announce readiness after a short delay, off the startup path.
fn schedule_ready_announcement(speech: SpeechSink, wake_word: String, delay: Duration) {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        speech.speak(&format!("{wake_word} is ready, say {wake_word} to activate"));
    });
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "jarvis-daemon starting"
    );

    // Load configuration
    let config = Config::load()?;
    config
        .ensure_dirs()
        .context("failed to create data directory")?;
    info!(
        data_dir = %config.data_dir.display(),
        model = %config.model,
        wake_word = %config.wake_word,
        "configuration loaded"
    );

    // Create shutdown signal handler
    let shutdown = ShutdownSignal::new();

    // Speech sink: one ordered queue drained by a dedicated worker thread
    let (speech, speech_rx) = SpeechSink::channel();
    let speech_worker = speech::spawn_worker(speech_rx, speech::default_backends())
        .context("failed to start speech worker")?;

    // Recognition events and query completions merge into one input stream
    let (session_tx, session_rx) = mpsc::channel::<SessionInput>(64);
    let (recognition_tx, mut recognition_rx) = mpsc::channel(32);

    // Transcript listener runs on a dedicated thread. A daemon that cannot
    // hear is useless, so failing to start it is fatal.
    let listener = TranscriptListener::new(recognition_tx, config.wake_word.clone());
    listener
        .start()
        .context("failed to start transcript listener")?;

    // Assemble the session controller
    let classifier = Classifier::new(config.wake_phrases.clone(), config.hide_phrases.clone());
    let actions = Actions::new(speech.clone(), config.data_dir.clone());
    let worker = QueryWorker::new(
        config.ollama_path.clone(),
        config.model.clone(),
        config.query_timeout,
    );
    let mut controller = SessionController::new(
        classifier,
        actions,
        worker,
        speech.clone(),
        session_tx.clone(),
        config.wake_word.clone(),
    );

    // Forward recognition events into the controller's input stream
    let forward_tx = session_tx;
    tokio::spawn(async move {
        while let Some(event) = recognition_rx.recv().await {
            if forward_tx
                .send(SessionInput::Recognition(event))
                .await
                .is_err()
            {
                break;
            }
        }
    });

    schedule_ready_announcement(
        speech.clone(),
        config.wake_word.clone(),
        STARTUP_ANNOUNCE_DELAY,
    );

    info!("daemon initialized, entering main loop");

    tokio::select! {
        _ = controller.run(session_rx) => {
            info!("session controller exited");
        }

        _ = shutdown.wait() => {
            info!("shutdown signal received");
        }
    }

    // Ordered shutdown: announce, let it start playing, stop the speech
    // queue, then the listener. In-flight query workers are abandoned.
    info!("shutting down...");

    speech.speak("Shutting down");
    tokio::time::sleep(SHUTDOWN_GRACE).await;
    speech.close();
    listener.stop();

    let _ = tokio::task::spawn_blocking(move || speech_worker.join()).await;

    info!("jarvis-daemon stopped");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speech::SpeechMessage;

    #[tokio::test]
    async fn test_ready_announcement_waits_for_delay() {
        let (speech, mut rx) = SpeechSink::channel();
        schedule_ready_announcement(speech, "jarvis".into(), Duration::from_millis(20));

        // Nothing is spoken on the startup path itself
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(100)).await;
        match rx.try_recv() {
            Ok(SpeechMessage::Say(text)) => {
                assert_eq!(text, "jarvis is ready, say jarvis to activate");
            }
            other => panic!("expected announcement, got {other:?}"),
        }
    }
}
