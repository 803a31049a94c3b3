//! Utterance classification
//!
//! Maps a normalized utterance to a [`Command`] via an ordered rule list.
//! The rules use substring and prefix matching rather than a grammar, so
//! the evaluation order is part of the contract: an utterance containing
//! both "chrome" and a search prefix resolves per whichever rule is tested
//! first. Reordering changes behavior.

/// Minimum utterance length; anything shorter is treated as noise.
pub const MIN_UTTERANCE_CHARS: usize = 2;

const SLEEP_PHRASES: [&str; 2] = ["stop listening", "go to sleep"];
const SEARCH_PREFIXES: [&str; 3] = ["search for ", "search ", "google "];
const NEW_TAB_PHRASES: [&str; 3] = ["new tab", "open tab", "open new tab"];
const MEDIA_SEARCH_PREFIXES: [&str; 2] = ["search spotify for ", "spotify search "];
const NOTES_PHRASES: [&str; 3] = ["open notes", "start notes", "take notes"];
const NOTES_DONE_PHRASES: [&str; 3] = ["close notes", "finish notes", "stop notes"];

/// Result of classifying one utterance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Leave sleep and resume listening
    WakeUp,
    /// Stop listening until the next wake
    GoToSleep,
    /// Open the browser, optionally on a search results page
    OpenBrowserSearch(Option<String>),
    /// Kill the browser process
    CloseBrowser,
    /// Open the fixed video site
    OpenYoutube,
    /// Open the media player, optionally searching for a track
    OpenMediaSearch(Option<String>),
    /// Kill the media player process
    CloseMedia,
    /// Start note dictation
    OpenNotes,
    /// Finish note dictation
    CloseNotes,
    /// Speak the current time
    ReportTime,
    /// Capture the screen to a file
    TakeScreenshot,
    /// Minimize and go to sleep
    HideToBackground,
    /// Anything unmatched: forward to the language model
    FreeFormQuery(String),
    /// Too short or not meaningful in the current mode
    Noop,
}

/// Lowercase and trim an utterance before classification.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Ordered-rule utterance classifier.
///
/// Stateless apart from the configured phrase sets; identical input always
/// yields the identical command.
#[derive(Debug, Clone)]
pub struct Classifier {
    /// Phrases that wake the assistant from sleep
    wake_phrases: Vec<String>,
    /// Phrases that minimize the assistant to the background
    hide_phrases: Vec<String>,
}

impl Classifier {
    pub fn new(wake_phrases: Vec<String>, hide_phrases: Vec<String>) -> Self {
        Self {
            wake_phrases,
            hide_phrases,
        }
    }

    /// Classify an utterance heard while actively listening.
    ///
    /// First match wins; see the module docs for why the order is fixed.
    pub fn classify(&self, text: &str) -> Command {
        if text.chars().count() < MIN_UTTERANCE_CHARS {
            return Command::Noop;
        }

        if SLEEP_PHRASES.iter().any(|p| text.contains(p)) {
            return Command::GoToSleep;
        }

        for prefix in SEARCH_PREFIXES {
            if let Some(rest) = text.strip_prefix(prefix) {
                let query = rest.trim();
                if query.is_empty() {
                    return Command::OpenBrowserSearch(None);
                }
                return Command::OpenBrowserSearch(Some(query.to_string()));
            }
        }
        if NEW_TAB_PHRASES.contains(&text) {
            return Command::OpenBrowserSearch(None);
        }

        if text.contains("open chrome") || text == "chrome" || text == "open browser" {
            return Command::OpenBrowserSearch(None);
        }
        if text.contains("close chrome") || text == "close browser" {
            return Command::CloseBrowser;
        }

        if text.contains("youtube") {
            return Command::OpenYoutube;
        }

        for prefix in MEDIA_SEARCH_PREFIXES {
            if let Some(rest) = text.strip_prefix(prefix) {
                return Command::OpenMediaSearch(Some(rest.trim().to_string()));
            }
        }
        if let Some(command) = extract_play_on_spotify(text) {
            return command;
        }
        if text.contains("open spotify") || text == "spotify" {
            return Command::OpenMediaSearch(None);
        }
        if text.contains("close spotify") {
            return Command::CloseMedia;
        }

        if NOTES_PHRASES.iter().any(|p| text.contains(p)) {
            return Command::OpenNotes;
        }

        if text.contains("what time") || text.contains("tell me the time") || text == "time" {
            return Command::ReportTime;
        }

        if text.contains("screenshot") {
            return Command::TakeScreenshot;
        }

        if self.hide_phrases.iter().any(|p| text.contains(p.as_str())) {
            return Command::HideToBackground;
        }

        Command::FreeFormQuery(text.to_string())
    }

    /// Classify an utterance heard while sleeping: only wake phrases act.
    pub fn wake_command(&self, text: &str) -> Command {
        if self.wake_phrases.iter().any(|p| text.contains(p.as_str())) {
            Command::WakeUp
        } else {
            Command::Noop
        }
    }

    /// Classify an utterance heard while dictating.
    ///
    /// Dictation replaces normal classification with a termination-phrase
    /// check: `Some(CloseNotes)` ends the note, `Some(Noop)` drops noise,
    /// and `None` means "append this as dictation text".
    pub fn dictation_command(&self, text: &str) -> Option<Command> {
        if text.chars().count() < MIN_UTTERANCE_CHARS {
            return Some(Command::Noop);
        }
        if NOTES_DONE_PHRASES.iter().any(|p| text.contains(p)) {
            return Some(Command::CloseNotes);
        }
        None
    }
}

/// Match a "play X on spotify" utterance.
///
/// A degenerate phrase with no track ("play on spotify") still opens the
/// media player, just without a search; it is a media request, not a
/// question for the language model.
fn extract_play_on_spotify(text: &str) -> Option<Command> {
    let rest = text.strip_prefix("play ")?;
    let query = if rest == "on spotify" {
        ""
    } else {
        rest.split_once(" on spotify")?.0.trim()
    };
    if query.is_empty() {
        Some(Command::OpenMediaSearch(None))
    } else {
        Some(Command::OpenMediaSearch(Some(query.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> Classifier {
        Classifier::new(
            vec!["wake".into(), "wake up".into()],
            vec!["close".into(), "hide yourself".into(), "minimize".into()],
        )
    }

    #[test]
    fn test_short_utterance_is_noop() {
        let c = classifier();
        assert_eq!(c.classify(""), Command::Noop);
        assert_eq!(c.classify("a"), Command::Noop);
    }

    #[test]
    fn test_sleep_phrases() {
        let c = classifier();
        assert_eq!(c.classify("go to sleep"), Command::GoToSleep);
        assert_eq!(c.classify("please stop listening now"), Command::GoToSleep);
    }

    #[test]
    fn test_search_prefix_extracts_query() {
        let c = classifier();
        assert_eq!(
            c.classify("search for weather"),
            Command::OpenBrowserSearch(Some("weather".into()))
        );
        assert_eq!(
            c.classify("google rust borrow checker"),
            Command::OpenBrowserSearch(Some("rust borrow checker".into()))
        );
    }

    #[test]
    fn test_search_prefix_wins_over_browser_phrases() {
        // "search for " is tested before the chrome rules, so a query
        // mentioning chrome is still a search.
        let c = classifier();
        assert_eq!(
            c.classify("search for chrome extensions"),
            Command::OpenBrowserSearch(Some("chrome extensions".into()))
        );
    }

    #[test]
    fn test_new_tab_phrases() {
        let c = classifier();
        assert_eq!(c.classify("new tab"), Command::OpenBrowserSearch(None));
        assert_eq!(c.classify("open new tab"), Command::OpenBrowserSearch(None));
    }

    #[test]
    fn test_browser_open_close() {
        let c = classifier();
        assert_eq!(c.classify("open chrome"), Command::OpenBrowserSearch(None));
        assert_eq!(c.classify("chrome"), Command::OpenBrowserSearch(None));
        assert_eq!(c.classify("close chrome"), Command::CloseBrowser);
        assert_eq!(c.classify("close browser"), Command::CloseBrowser);
    }

    #[test]
    fn test_youtube_substring() {
        let c = classifier();
        assert_eq!(c.classify("put on youtube"), Command::OpenYoutube);
    }

    #[test]
    fn test_search_prefix_wins_over_youtube() {
        let c = classifier();
        assert_eq!(
            c.classify("search for youtube downloader"),
            Command::OpenBrowserSearch(Some("youtube downloader".into()))
        );
    }

    #[test]
    fn test_play_on_spotify_extracts_track() {
        let c = classifier();
        assert_eq!(
            c.classify("play lofi beats on spotify"),
            Command::OpenMediaSearch(Some("lofi beats".into()))
        );
    }

    #[test]
    fn test_play_on_spotify_without_track_opens_player() {
        let c = classifier();
        assert_eq!(c.classify("play on spotify"), Command::OpenMediaSearch(None));
        assert_eq!(c.classify("play  on spotify"), Command::OpenMediaSearch(None));
    }

    #[test]
    fn test_play_without_spotify_is_free_form() {
        let c = classifier();
        assert!(matches!(
            c.classify("play something upbeat"),
            Command::FreeFormQuery(_)
        ));
    }

    #[test]
    fn test_media_search_prefixes() {
        let c = classifier();
        assert_eq!(
            c.classify("search spotify for jazz"),
            Command::OpenMediaSearch(Some("jazz".into()))
        );
        assert_eq!(
            c.classify("spotify search miles davis"),
            Command::OpenMediaSearch(Some("miles davis".into()))
        );
    }

    #[test]
    fn test_media_open_close() {
        let c = classifier();
        assert_eq!(c.classify("open spotify"), Command::OpenMediaSearch(None));
        assert_eq!(c.classify("spotify"), Command::OpenMediaSearch(None));
        assert_eq!(c.classify("close spotify"), Command::CloseMedia);
    }

    #[test]
    fn test_notes_phrases() {
        let c = classifier();
        assert_eq!(c.classify("take notes"), Command::OpenNotes);
        assert_eq!(c.classify("open notes please"), Command::OpenNotes);
    }

    #[test]
    fn test_time_phrases() {
        let c = classifier();
        assert_eq!(c.classify("what time is it"), Command::ReportTime);
        assert_eq!(c.classify("time"), Command::ReportTime);
        // only the exact word "time" matches the bare form
        assert!(matches!(c.classify("overtime"), Command::FreeFormQuery(_)));
    }

    #[test]
    fn test_screenshot() {
        let c = classifier();
        assert_eq!(c.classify("take a screenshot"), Command::TakeScreenshot);
    }

    #[test]
    fn test_hide_phrases() {
        let c = classifier();
        assert_eq!(c.classify("hide yourself"), Command::HideToBackground);
        assert_eq!(c.classify("minimize"), Command::HideToBackground);
    }

    #[test]
    fn test_default_is_free_form() {
        let c = classifier();
        assert_eq!(
            c.classify("why is the sky blue"),
            Command::FreeFormQuery("why is the sky blue".into())
        );
    }

    #[test]
    fn test_wake_command() {
        let c = classifier();
        assert_eq!(c.wake_command("wake up please"), Command::WakeUp);
        assert_eq!(c.wake_command("what time is it"), Command::Noop);
    }

    #[test]
    fn test_dictation_command() {
        let c = classifier();
        assert_eq!(c.dictation_command("a"), Some(Command::Noop));
        assert_eq!(c.dictation_command("close notes"), Some(Command::CloseNotes));
        assert_eq!(c.dictation_command("okay finish notes"), Some(Command::CloseNotes));
        assert_eq!(c.dictation_command("buy milk"), None);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  What TIME is it  "), "what time is it");
    }
}
