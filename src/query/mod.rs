//! Asynchronous language-model queries
//!
//! Each free-form utterance gets its own independent worker task running
//! `ollama run` under a bounded timeout. Workers never fail outward: every
//! error becomes one of a small set of spoken fallback strings, delivered
//! through the normal completion path. There is no deduplication and no
//! cancellation; completions arrive in completion order, not dispatch
//! order.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::Duration;

use tokio::process::Command;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::{info, warn};

use crate::events::SessionInput;

/// Spoken when the model returns nothing.
pub const EMPTY_RESPONSE_FALLBACK: &str =
    "I heard you, but didn't get a response. Please try again.";

/// Spoken when the model call exceeds the configured timeout.
pub const TIMEOUT_FALLBACK: &str = "The request took too long to process. Please try again.";

/// Spoken when the ollama binary cannot be found.
pub const BACKEND_MISSING_FALLBACK: &str =
    "Error: Ollama not found. Please make sure Ollama is installed and running.";

/// Dispatches model invocations onto background tasks.
#[derive(Debug, Clone)]
pub struct QueryWorker {
    ollama_path: PathBuf,
    model: String,
    timeout: Duration,
}

impl QueryWorker {
    pub fn new(ollama_path: PathBuf, model: String, timeout: Duration) -> Self {
        Self {
            ollama_path,
            model,
            timeout,
        }
    }

    /// Spawn one worker task for the prompt. The completion is sent back
    /// on `reply_tx`; the caller is never blocked and never sees an error.
    pub fn dispatch(&self, prompt: String, reply_tx: mpsc::Sender<SessionInput>) {
        let worker = self.clone();
        tokio::spawn(async move {
            info!(prompt = %prompt, "query dispatched");
            let response = worker.invoke(&prompt).await;
            info!(response = %response, "query completed");
            if reply_tx
                .send(SessionInput::QueryCompleted { response })
                .await
                .is_err()
            {
                warn!("controller gone, dropping query response");
            }
        });
    }

    /// Run the model and map every outcome to a speakable string.
    async fn invoke(&self, prompt: &str) -> String {
        match timeout(self.timeout, self.run_model(prompt)).await {
            Ok(Ok(stdout)) => {
                let cleaned = clean_response(&stdout);
                if cleaned.is_empty() {
                    EMPTY_RESPONSE_FALLBACK.to_string()
                } else {
                    cleaned
                }
            }
            Ok(Err(e)) if e.kind() == ErrorKind::NotFound => BACKEND_MISSING_FALLBACK.to_string(),
            Ok(Err(e)) => {
                warn!(error = %e, "model invocation failed");
                format!("Error processing request: {e}")
            }
            Err(_) => TIMEOUT_FALLBACK.to_string(),
        }
    }

    async fn run_model(&self, prompt: &str) -> std::io::Result<String> {
        let output = Command::new(&self.ollama_path)
            .arg("run")
            .arg(&self.model)
            .arg(prompt)
            .kill_on_drop(true)
            .output()
            .await?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// Strip structural markup the model tends to emit before speaking.
fn clean_response(response: &str) -> String {
    response.replace('*', "").replace("__", "").trim().to_string()
}
