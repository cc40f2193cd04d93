//! Line editing with rustyline

use rustyline::config::Configurer;
use rustyline::error::ReadlineError;
use rustyline::{Config, DefaultEditor};

use crate::error::{Error, Result};
use crate::shell::LineReader;

/// Reads lines from the terminal with editing and in-session recall
pub struct RustylineReader {
    editor: DefaultEditor,
}

impl RustylineReader {
    /// Create a reader whose recall list holds up to `history_limit` entries
    pub fn new(history_limit: usize) -> Result<Self> {
        let input_error = |e: ReadlineError| Error::Input {
            reason: e.to_string(),
        };
        let config = Config::builder()
            .max_history_size(history_limit)
            .map_err(input_error)?
            .build();
        let editor = DefaultEditor::with_config(config).map_err(input_error)?;
        Ok(Self { editor })
    }

    /// Load earlier entries (oldest first) into the recall list.
    ///
    /// Only the newest entries that fit the history limit are kept.
    pub fn seed<I, S>(&mut self, entries: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str> + Into<String>,
    {
        for entry in entries {
            if let Err(e) = self.editor.add_history_entry(entry) {
                debug!("Skipping history entry: {}", e);
            }
        }
    }
}

impl LineReader for RustylineReader {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        loop {
            match self.editor.readline(prompt) {
                Ok(line) => return Ok(Some(line)),
                // Ctrl-C at the prompt discards the line, like other shells
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => return Ok(None),
                Err(e) => {
                    return Err(Error::Input {
                        reason: e.to_string(),
                    })
                }
            }
        }
    }

    fn add_history(&mut self, line: &str) {
        if let Err(e) = self.editor.add_history_entry(line) {
            debug!("Skipping history entry: {}", e);
        }
    }

    fn set_history_limit(&mut self, limit: usize) {
        if let Err(e) = self.editor.set_max_history_size(limit) {
            warn!("Can't resize history to {}: {}", limit, e);
        }
    }
}
