//! Action handlers
//!
//! The fixed registry of side-effecting operations bound to classified
//! commands. Every handler is best-effort: failures are logged and turned
//! into a fallback spoken message, never propagated to the controller.
//! Handlers report outcomes only through the speech sink.

mod browser;
mod media;
mod notes;
mod system;

pub use notes::{ActiveNote, Notebook};

use std::path::PathBuf;
use std::sync::Arc;

use tracing::warn;

use crate::speech::SpeechSink;

/// Launches URLs and desktop applications.
///
/// The one seam between handlers and the desktop; tests substitute a
/// recording implementation so dispatches are observable without opening
/// anything.
pub trait Launcher: Send + Sync {
    /// Open a URL in the default browser
    fn open_url(&self, url: &str) -> std::io::Result<()>;

    /// Launch a desktop application by name
    fn open_app(&self, program: &str) -> std::io::Result<()>;
}

/// Real desktop launcher.
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn open_url(&self, url: &str) -> std::io::Result<()> {
        open::that_detached(url)
    }

    fn open_app(&self, program: &str) -> std::io::Result<()> {
        let mut child = std::process::Command::new(program).spawn()?;
        // Reap the child off-thread so it never lingers as a zombie
        std::thread::spawn(move || {
            let _ = child.wait();
        });
        Ok(())
    }
}

/// The handler registry handed to the session controller.
#[derive(Clone)]
pub struct Actions {
    speech: SpeechSink,
    launcher: Arc<dyn Launcher>,
    notebook: Notebook,
    data_dir: PathBuf,
}

impl Actions {
    pub fn new(speech: SpeechSink, data_dir: PathBuf) -> Self {
        Self::with_launcher(speech, data_dir, Arc::new(SystemLauncher))
    }

    pub fn with_launcher(speech: SpeechSink, data_dir: PathBuf, launcher: Arc<dyn Launcher>) -> Self {
        Self {
            speech,
            launcher,
            notebook: Notebook::new(data_dir.clone()),
            data_dir,
        }
    }

    pub fn open_browser_search(&self, query: Option<&str>) {
        browser::open_search(&self.speech, self.launcher.as_ref(), query);
    }

    pub fn open_youtube(&self) {
        browser::open_youtube(&self.speech, self.launcher.as_ref());
    }

    pub fn close_browser(&self) {
        browser::close(&self.speech);
    }

    pub fn open_media_search(&self, query: Option<&str>) {
        media::open_search(&self.speech, self.launcher.as_ref(), query);
    }

    pub fn close_media(&self) {
        media::close(&self.speech);
    }

    /// Create a note file for dictation. Returns the note on success;
    /// on failure the user hears a fallback and dictation does not start.
    pub fn open_note(&self) -> Option<ActiveNote> {
        match self.notebook.create() {
            Ok(note) => {
                self.speech.speak(
                    "Notes opened. Start speaking and I will write. Say close notes when finished.",
                );
                Some(note)
            }
            Err(e) => {
                warn!(error = %e, "failed to open note");
                self.speech.speak("Couldn't open notes");
                None
            }
        }
    }

    /// Append one dictated line to the open note.
    pub fn append_note(&self, note: &ActiveNote, text: &str) {
        match note.append(text) {
            Ok(()) => {
                self.speech.speak("Noted");
            }
            Err(e) => {
                warn!(error = %e, "failed to append note line");
                self.speech.speak("Failed to write note");
            }
        }
    }

    pub fn report_time(&self) {
        system::report_time(&self.speech);
    }

    pub fn take_screenshot(&self) {
        system::take_screenshot(self.speech.clone(), self.data_dir.clone());
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{Launched, RecordingLauncher};
    use super::*;
    use crate::speech::SpeechMessage;

    fn actions_with(launcher: Arc<RecordingLauncher>) -> (Actions, tokio::sync::mpsc::UnboundedReceiver<SpeechMessage>) {
        let dir = std::env::temp_dir();
        let (speech, speech_rx) = SpeechSink::channel();
        (Actions::with_launcher(speech, dir, launcher), speech_rx)
    }

    fn next_speech(rx: &mut tokio::sync::mpsc::UnboundedReceiver<SpeechMessage>) -> String {
        match rx.try_recv() {
            Ok(SpeechMessage::Say(text)) => text,
            other => panic!("expected speech, got {other:?}"),
        }
    }

    #[test]
    fn test_browser_search_builds_encoded_url() {
        let launcher = Arc::new(RecordingLauncher::default());
        let (actions, mut rx) = actions_with(Arc::clone(&launcher));

        actions.open_browser_search(Some("rust borrow checker"));
        assert_eq!(
            launcher.launches(),
            vec![Launched::Url(
                "https://www.google.com/search?q=rust%20borrow%20checker".into()
            )]
        );
        assert_eq!(next_speech(&mut rx), "Opening browser");
    }

    #[test]
    fn test_browser_open_without_query_hits_homepage() {
        let launcher = Arc::new(RecordingLauncher::default());
        let (actions, mut rx) = actions_with(Arc::clone(&launcher));

        actions.open_browser_search(None);
        assert_eq!(
            launcher.launches(),
            vec![Launched::Url("https://www.google.com".into())]
        );
        assert_eq!(next_speech(&mut rx), "Opening browser");
    }

    #[test]
    fn test_launch_failure_becomes_spoken_fallback() {
        let launcher = Arc::new(RecordingLauncher {
            fail_urls: true,
            ..Default::default()
        });
        let (actions, mut rx) = actions_with(Arc::clone(&launcher));

        actions.open_browser_search(None);
        assert!(launcher.launches().is_empty());
        assert_eq!(next_speech(&mut rx), "Couldn't open the browser");
    }

    #[test]
    fn test_media_open_prefers_desktop_app() {
        let launcher = Arc::new(RecordingLauncher::default());
        let (actions, mut rx) = actions_with(Arc::clone(&launcher));

        actions.open_media_search(None);
        assert_eq!(launcher.launches(), vec![Launched::App("spotify".into())]);
        assert_eq!(next_speech(&mut rx), "Opening Spotify");
    }

    #[test]
    fn test_media_open_falls_back_to_web_player() {
        let launcher = Arc::new(RecordingLauncher {
            fail_apps: true,
            ..Default::default()
        });
        let (actions, mut rx) = actions_with(Arc::clone(&launcher));

        actions.open_media_search(None);
        assert_eq!(
            launcher.launches(),
            vec![Launched::Url("https://open.spotify.com".into())]
        );
        assert_eq!(next_speech(&mut rx), "Opening Spotify");
    }

    #[test]
    fn test_youtube_opens_fixed_url() {
        let launcher = Arc::new(RecordingLauncher::default());
        let (actions, mut rx) = actions_with(Arc::clone(&launcher));

        actions.open_youtube();
        assert_eq!(
            launcher.launches(),
            vec![Launched::Url("https://www.youtube.com".into())]
        );
        assert_eq!(next_speech(&mut rx), "Opening YouTube");
    }
}
