//! System handlers: spoken clock and screen capture

use std::path::PathBuf;

use chrono::Local;
use tracing::{debug, warn};

use crate::speech::SpeechSink;

/// Speak the current local time.
pub fn report_time(speech: &SpeechSink) {
    let now = Local::now();
    speech.speak(&format!("The time is {}", now.format("%-I:%M %p")));
}

/// Capture the screen to a timestamped PNG in the data directory.
///
/// Capture can take a noticeable moment, so it runs on a background task
/// to keep the control thread responsive; the outcome is spoken exactly
/// once from that task.
pub fn take_screenshot(speech: SpeechSink, data_dir: PathBuf) {
    tokio::spawn(async move {
        let path = data_dir.join(format!("screenshot_{}.png", Local::now().timestamp()));
        match capture(&path).await {
            Ok(()) => {
                debug!(path = %path.display(), "screenshot written");
                speech.speak("Screenshot saved");
            }
            Err(e) => {
                warn!(error = %e, "screenshot failed");
                speech.speak("Couldn't take a screenshot");
            }
        }
    });
}

#[cfg(target_os = "macos")]
async fn capture(path: &std::path::Path) -> anyhow::Result<()> {
    run_capture_command("screencapture", &["-x"], path).await
}

#[cfg(not(target_os = "macos"))]
async fn capture(path: &std::path::Path) -> anyhow::Result<()> {
    run_capture_command("gnome-screenshot", &["-f"], path).await
}

async fn run_capture_command(
    program: &str,
    args: &[&str],
    path: &std::path::Path,
) -> anyhow::Result<()> {
    let status = tokio::process::Command::new(program)
        .args(args)
        .arg(path)
        .status()
        .await?;
    anyhow::ensure!(status.success(), "{program} exited with {status}");
    Ok(())
}
