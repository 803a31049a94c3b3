//! Media player handlers (Spotify)

use tracing::{debug, warn};

use crate::speech::SpeechSink;

use super::Launcher;

const WEB_PLAYER_URL: &str = "https://open.spotify.com";

/// Open the media player, searching for a track when a query is given.
///
/// With a query, the web player's search page is the reliable target.
/// Without one, try the desktop application first and fall back to the
/// web player.
pub fn open_search(speech: &SpeechSink, launcher: &dyn Launcher, query: Option<&str>) {
    match query {
        Some(q) => {
            let url = format!("{WEB_PLAYER_URL}/search/{}", urlencoding::encode(q));
            match launcher.open_url(&url) {
                Ok(()) => {
                    speech.speak(&format!("Searching Spotify for {q}"));
                }
                Err(e) => {
                    warn!(error = %e, "failed to open spotify search");
                    speech.speak("Couldn't open Spotify");
                }
            }
        }
        None => {
            let launched = launcher.open_app("spotify").is_ok()
                || launcher
                    .open_url(WEB_PLAYER_URL)
                    .map_err(|e| debug!(error = %e, "web player fallback failed"))
                    .is_ok();
            if launched {
                speech.speak("Opening Spotify");
            } else {
                speech.speak("Couldn't open Spotify");
            }
        }
    }
}

/// Kill the media player process; not running counts as closed.
pub fn close(speech: &SpeechSink) {
    match std::process::Command::new("pkill").args(["-f", "spotify"]).status() {
        Ok(status) => {
            debug!(?status, "pkill spotify finished");
            speech.speak("Closed Spotify");
        }
        Err(e) => {
            warn!(error = %e, "failed to run pkill");
            speech.speak("Could not close Spotify");
        }
    }
}
