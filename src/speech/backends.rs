//! Speech synthesis backends
//!
//! An ordered strategy list tried in sequence until one succeeds. The
//! final console backend cannot fail, so every message is always delivered
//! somewhere.

use std::process::Command;

use anyhow::{ensure, Context, Result};
use tracing::info;

/// One way of turning text into audio (or a last-resort textual record).
pub trait SpeechBackend: Send {
    /// Short name for logging
    fn name(&self) -> &'static str;

    /// Render the text. Blocks until playback finishes; called only from
    /// the dedicated speech worker thread.
    fn render(&self, text: &str) -> Result<()>;
}

/// Shell out to a synthesis command taking the text as its last argument.
struct CommandBackend {
    name: &'static str,
    program: &'static str,
    args: &'static [&'static str],
}

impl SpeechBackend for CommandBackend {
    fn name(&self) -> &'static str {
        self.name
    }

    fn render(&self, text: &str) -> Result<()> {
        let status = Command::new(self.program)
            .args(self.args)
            .arg(text)
            .status()
            .with_context(|| format!("failed to run {}", self.program))?;
        ensure!(status.success(), "{} exited with {status}", self.program);
        Ok(())
    }
}

/// Final fallback: log the text instead of speaking it. Always succeeds.
struct ConsoleBackend;

impl SpeechBackend for ConsoleBackend {
    fn name(&self) -> &'static str {
        "console"
    }

    fn render(&self, text: &str) -> Result<()> {
        info!(speech = %text, "no audio backend available, echoing");
        Ok(())
    }
}

/// The default backend list, best first.
pub fn default_backends() -> Vec<Box<dyn SpeechBackend>> {
    vec![
        #[cfg(target_os = "macos")]
        Box::new(CommandBackend {
            name: "say",
            program: "say",
            args: &[],
        }),
        Box::new(CommandBackend {
            name: "espeak-ng",
            program: "espeak-ng",
            args: &[],
        }),
        Box::new(CommandBackend {
            name: "espeak",
            program: "espeak",
            args: &[],
        }),
        Box::new(ConsoleBackend),
    ]
}
