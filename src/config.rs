//! Configuration loading and management

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use tracing::debug;

/// Candidate locations for the ollama binary, probed in order.
const OLLAMA_CANDIDATES: [&str; 3] = ["ollama", "/usr/local/bin/ollama", "/opt/homebrew/bin/ollama"];

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Trigger word that produces wake events inside the recognizer
    pub wake_word: String,

    /// Spoken phrases that wake the assistant out of sleep
    pub wake_phrases: Vec<String>,

    /// Spoken phrases that minimize the assistant to the background
    pub hide_phrases: Vec<String>,

    /// Language model passed to `ollama run`
    pub model: String,

    /// Resolved path to the ollama binary
    pub ollama_path: PathBuf,

    /// Upper bound on a single model invocation
    pub query_timeout: Duration,

    /// Directory holding note and screenshot files
    pub data_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment and defaults
    pub fn load() -> Result<Self> {
        let wake_word = env_or("JARVIS_WAKE_WORD", "jarvis");

        let wake_phrases = vec![
            "wake".to_string(),
            "wake up".to_string(),
            format!("wake {wake_word}"),
            "wake me".to_string(),
        ];

        let hide_phrases = vec![
            "close".to_string(),
            "hide yourself".to_string(),
            "minimize".to_string(),
        ];

        let model = env_or("JARVIS_MODEL", "gemma:2b");

        let ollama_path = match std::env::var("JARVIS_OLLAMA_PATH") {
            Ok(path) => PathBuf::from(path),
            Err(_) => discover_ollama(),
        };

        let timeout_secs = std::env::var("JARVIS_QUERY_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30u64);

        let data_dir = match std::env::var("JARVIS_DATA_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => {
                let home = std::env::var("HOME")?;
                PathBuf::from(home)
                    .join(".local")
                    .join("share")
                    .join("jarvis")
            }
        };

        Ok(Self {
            wake_word,
            wake_phrases,
            hide_phrases,
            model,
            ollama_path,
            query_timeout: Duration::from_secs(timeout_secs),
            data_dir,
        })
    }

    /// Ensure the data directory exists
    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.data_dir)?;
        Ok(())
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Probe for an ollama binary: explicit paths first, then `which`.
/// Falls back to the bare name and lets spawn report the failure.
fn discover_ollama() -> PathBuf {
    for candidate in OLLAMA_CANDIDATES {
        if Path::new(candidate).is_absolute() && Path::new(candidate).exists() {
            debug!(path = candidate, "found ollama binary");
            return PathBuf::from(candidate);
        }
        let found = std::process::Command::new("which")
            .arg(candidate)
            .output()
            .map(|out| out.status.success())
            .unwrap_or(false);
        if found {
            debug!(path = candidate, "ollama resolved via which");
            return PathBuf::from(candidate);
        }
    }
    PathBuf::from("ollama")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_load_defaults() {
        let config = Config::load().unwrap();
        assert_eq!(config.wake_word, "jarvis");
        assert!(config.wake_phrases.contains(&"wake jarvis".to_string()));
        assert_eq!(config.query_timeout, Duration::from_secs(30));
        assert!(config.data_dir.to_string_lossy().contains("jarvis"));
    }

    #[test]
    fn test_discover_ollama_never_empty() {
        let path = discover_ollama();
        assert!(!path.as_os_str().is_empty());
    }
}
