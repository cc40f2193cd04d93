//! Persistent command history
//!
//! An append-only UTF-8 log, one input line per record. Every accepted line
//! is recorded before it is parsed, so malformed and empty lines are kept
//! too. Reading back is only used to seed the line editor's recall list.

use std::collections::VecDeque;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Default history file name, relative to the home directory
const DEFAULT_HISTORY_FILE: &str = ".mosaicsh_history";

/// Appends input lines to the history file
#[derive(Debug, Clone)]
pub struct HistoryRecorder {
    /// Path to the history file
    path: PathBuf,
}

impl HistoryRecorder {
    /// Record into a specific file
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Record into `~/.mosaicsh_history`
    pub fn new() -> Option<Self> {
        Self::default_path().map(Self::with_path)
    }

    /// Get the default history file path
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(DEFAULT_HISTORY_FILE))
    }

    /// Append `line` and a newline to the log
    pub fn record(&self, line: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                Error::io(format!("can't open history file {}", self.path.display()), e)
            })?;

        // One write call so the record lands in a single append
        let record = format!("{}\n", line);
        file.write_all(record.as_bytes())
            .map_err(|e| Error::io("can't write to history", e))?;
        Ok(())
    }

    /// The last `limit` non-empty records, oldest first
    pub fn recent(&self, limit: usize) -> Result<Vec<String>> {
        if limit == 0 || !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path).map_err(|e| {
            Error::io(format!("can't open history file {}", self.path.display()), e)
        })?;

        let mut entries = VecDeque::with_capacity(limit.min(4096));
        for line in BufReader::new(file).lines() {
            // Skip records that are not valid UTF-8 rather than giving up
            let Ok(line) = line else { continue };
            if line.trim().is_empty() {
                continue;
            }
            if entries.len() == limit {
                entries.pop_front();
            }
            entries.push_back(line);
        }

        Ok(entries.into())
    }

    /// Get history file path
    pub fn path(&self) -> &Path {
        &self.path
    }
}
