//! Note files for dictation
//!
//! Notes are plain append-only text files in the data directory, named by
//! creation time. Each dictated utterance becomes one timestamped line.
//! Only the control thread ever writes to the open note.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;

/// Creates note files in the data directory.
#[derive(Debug, Clone)]
pub struct Notebook {
    dir: PathBuf,
}

impl Notebook {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Create a fresh note file named by the current time.
    pub fn create(&self) -> Result<ActiveNote> {
        let name = format!("notes_{}.txt", Local::now().timestamp());
        let path = self.dir.join(name);
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("failed to create note file {}", path.display()))?;
        Ok(ActiveNote { path })
    }
}

/// A note currently receiving dictation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveNote {
    path: PathBuf,
}

impl ActiveNote {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one timestamped dictation line.
    pub fn append(&self, text: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open note {}", self.path.display()))?;
        let stamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        writeln!(file, "[{stamp}] {text}").context("failed to write note line")?;
        Ok(())
    }
}
