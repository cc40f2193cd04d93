//! Line reader fed from a fixed script

use std::collections::VecDeque;

use mosaicsh::error::{Error, Result};
use mosaicsh::LineReader;

/// Yields the scripted lines in order, then end of input (or a failure)
#[derive(Debug, Default)]
pub struct ScriptedReader {
    lines: VecDeque<String>,
    fail_at_end: bool,
    pub prompts: Vec<String>,
    pub recalled: Vec<String>,
    pub history_limits: Vec<usize>,
}

impl ScriptedReader {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Report an unrecoverable reader error instead of end of input
    pub fn failing_at_end(mut self) -> Self {
        self.fail_at_end = true;
        self
    }

    /// Lines not consumed by the shell
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl LineReader for ScriptedReader {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        self.prompts.push(prompt.to_string());
        match self.lines.pop_front() {
            Some(line) => Ok(Some(line)),
            None if self.fail_at_end => Err(Error::Input {
                reason: "terminal went away".to_string(),
            }),
            None => Ok(None),
        }
    }

    fn add_history(&mut self, line: &str) {
        self.recalled.push(line.to_string());
    }

    fn set_history_limit(&mut self, limit: usize) {
        self.history_limits.push(limit);
    }
}
