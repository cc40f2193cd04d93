//! The read → resolve → dispatch loop
//!
//! [`Shell`] ties the pieces together for one session: every accepted line
//! is recorded to history, tokenized, alias-resolved, then handed to a
//! builtin or the [`Executor`]. Errors from a single line are reported and
//! the loop carries on; only `exit`, end of input, or a broken line reader
//! end it.

use std::io::Write;

use crate::builtins::{BuiltinOutcome, BuiltinRegistry};
use crate::commands::{resolve, tokenize};
use crate::config::prompt::{self, PromptState};
use crate::config::ConfigStore;
use crate::error::{Error, Result};
use crate::execution::{ExitStatus, Executor};
use crate::history::HistoryRecorder;

/// Source of input lines
pub trait LineReader {
    /// Show `prompt` and read one line; `None` means end of input
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;

    /// Offer a line for in-session recall
    fn add_history(&mut self, _line: &str) {}

    /// Bound the in-session recall list
    fn set_history_limit(&mut self, _limit: usize) {}
}

/// What the loop does after one line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next line; carries the status of an external command
    Continue(Option<ExitStatus>),
    /// Leave the loop with this process exit code
    Exit(i32),
}

/// One interactive session
pub struct Shell {
    config: ConfigStore,
    builtins: BuiltinRegistry,
    executor: Executor,
    history: Option<HistoryRecorder>,
    out: Box<dyn Write>,
    err: Box<dyn Write>,
    last_status: Option<ExitStatus>,
}

impl Shell {
    /// A shell writing to the process's stdout and stderr, launching
    /// commands according to `config`
    pub fn new(config: ConfigStore, history: Option<HistoryRecorder>) -> Self {
        let executor = Executor::from_config(config.config());
        Self::with_executor(config, executor, history)
    }

    pub fn with_executor(
        config: ConfigStore,
        executor: Executor,
        history: Option<HistoryRecorder>,
    ) -> Self {
        Self {
            config,
            builtins: BuiltinRegistry::default(),
            executor,
            history,
            out: Box::new(std::io::stdout()),
            err: Box::new(std::io::stderr()),
            last_status: None,
        }
    }

    /// Redirect builtin output and error reports
    pub fn with_output(mut self, out: Box<dyn Write>, err: Box<dyn Write>) -> Self {
        self.out = out;
        self.err = err;
        self
    }

    pub fn config(&self) -> &ConfigStore {
        &self.config
    }

    /// Status of the most recent external command, if any ran
    pub fn last_status(&self) -> Option<ExitStatus> {
        self.last_status
    }

    /// The prompt for the current state
    pub fn prompt(&self) -> String {
        let config = self.config.config();
        prompt::render(&config.prompt, &PromptState::capture(), &config.color)
    }

    /// Read and run lines until `exit` or end of input; returns the exit
    /// code for the process
    pub async fn run(&mut self, reader: &mut dyn LineReader) -> i32 {
        let mut limit = self.config.config().history_size;
        reader.set_history_limit(limit);

        loop {
            let line = match reader.read_line(&self.prompt()) {
                Ok(Some(line)) => line,
                Ok(None) => {
                    info!("End of input");
                    return 0;
                }
                Err(e) => {
                    error!("Line reader failed: {}", e);
                    self.report(&e);
                    return 1;
                }
            };

            if !line.trim().is_empty() {
                reader.add_history(&line);
            }

            match self.run_line(&line).await {
                Ok(Flow::Exit(code)) => return code,
                Ok(Flow::Continue(_)) => {}
                Err(e) => self.report(&e),
            }

            let size = self.config.config().history_size;
            if size != limit {
                reader.set_history_limit(size);
                limit = size;
            }
        }
    }

    /// Record `line` to history, then run it
    pub async fn run_line(&mut self, line: &str) -> Result<Flow> {
        self.record(line);
        self.execute(line).await
    }

    /// Run `line` without recording it
    pub async fn execute(&mut self, line: &str) -> Result<Flow> {
        let tokens = tokenize(line)?;
        if tokens.is_empty() {
            return Ok(Flow::Continue(None));
        }

        let tokens = resolve(tokens, &self.config.config().aliases)?;
        trace!("Resolved to {:?}", tokens);

        if let Some(outcome) =
            self.builtins
                .dispatch(&tokens, &mut self.config, &mut *self.out, &mut *self.err)
        {
            return Ok(match outcome? {
                BuiltinOutcome::Continue => Flow::Continue(None),
                BuiltinOutcome::Exit(code) => Flow::Exit(code),
            });
        }

        let status = self.executor.run(&tokens).await?;
        self.last_status = Some(status);
        Ok(Flow::Continue(Some(status)))
    }

    /// Run one line as `-c` does and turn the result into an exit code
    pub async fn run_command(&mut self, line: &str) -> i32 {
        match self.execute(line).await {
            Ok(Flow::Continue(Some(status))) => status.code,
            Ok(Flow::Continue(None)) => 0,
            Ok(Flow::Exit(code)) => code,
            Err(e) => {
                self.report(&e);
                1
            }
        }
    }

    fn record(&mut self, line: &str) {
        let Some(history) = &self.history else {
            return;
        };
        if let Err(e) = history.record(line) {
            warn!("History not recorded: {}", e);
            let _ = writeln!(self.err, "{}: warning: {}", crate::NAME, e);
        }
    }

    fn report(&mut self, error: &Error) {
        debug!("Command failed ({:?}): {}", error.kind(), error);
        let _ = writeln!(self.err, "{}: {}", crate::NAME, error);
        let _ = self.err.flush();
    }
}
