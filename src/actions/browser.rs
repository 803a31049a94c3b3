//! Browser handlers: open, search, close, and the fixed video site

use tracing::{debug, warn};

use crate::speech::SpeechSink;

use super::Launcher;

const SEARCH_URL: &str = "https://www.google.com/search?q=";
const HOME_URL: &str = "https://www.google.com";
const VIDEO_URL: &str = "https://www.youtube.com";

/// Open the browser, on a search results page when a query is given.
pub fn open_search(speech: &SpeechSink, launcher: &dyn Launcher, query: Option<&str>) {
    let url = match query {
        Some(q) => format!("{SEARCH_URL}{}", urlencoding::encode(q)),
        None => HOME_URL.to_string(),
    };
    launch(speech, launcher, &url, "Opening browser", "Couldn't open the browser");
}

/// Open the fixed video site.
pub fn open_youtube(speech: &SpeechSink, launcher: &dyn Launcher) {
    launch(speech, launcher, VIDEO_URL, "Opening YouTube", "Couldn't open YouTube");
}

/// Kill the browser process. A browser that is not running counts as
/// closed.
pub fn close(speech: &SpeechSink) {
    match std::process::Command::new("pkill").args(["-f", "chrome"]).status() {
        Ok(status) => {
            debug!(?status, "pkill chrome finished");
            speech.speak("Closed Chrome");
        }
        Err(e) => {
            warn!(error = %e, "failed to run pkill");
            speech.speak("Could not close Chrome");
        }
    }
}

fn launch(speech: &SpeechSink, launcher: &dyn Launcher, url: &str, ok: &str, fallback: &str) {
    match launcher.open_url(url) {
        Ok(()) => {
            debug!(url, "opened in browser");
            speech.speak(ok);
        }
        Err(e) => {
            warn!(url, error = %e, "failed to open url");
            speech.speak(fallback);
        }
    }
}
