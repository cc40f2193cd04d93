//! mosaicsh - an interactive command shell
//!
//! This library provides the command resolution and execution engine
//! behind the `mosaicsh` binary: tokenizing input lines, expanding
//! aliases, dispatching builtins and launching external programs, either
//! directly on the shell's terminal or through a pseudo-terminal when the
//! program expects one.
//!
//! ## Module Organization
//!
//! - [`commands`] - Tokenizer and alias resolution
//! - [`builtins`] - `cd`, `exit`, `version`, `help`, `set`, `alias`, `unalias`, `aliases`
//! - [`execution`] - Launch-mode classification and process execution
//! - [`pty`] - Pseudo-terminal sessions, I/O relays, raw mode
//! - [`config`] - Settings, persistence and prompt rendering
//! - [`history`] - Append-only command history
//! - [`shell`] - The per-line engine and the read loop
//! - [`reader`] - rustyline-backed line reader
//! - [`ansi`] - Prompt color palette
//! - [`mod@error`] - Error types and Result aliases
//!
//! ## Quick Start
//!
//! ```no_run
//! use mosaicsh::{ConfigStore, HistoryRecorder, RustylineReader, Shell};
//!
//! # async fn demo() -> mosaicsh::Result<()> {
//! let (config, _warnings) = ConfigStore::open_default();
//! let mut reader = RustylineReader::new(config.config().history_size)?;
//! let mut shell = Shell::new(config, HistoryRecorder::new());
//! let code = shell.run(&mut reader).await;
//! # let _ = code;
//! # Ok(())
//! # }
//! ```
//!
//! ## Threading
//!
//! One task drives the read loop and waits on each command in turn. The
//! only concurrency is inside an interactive command: two relay threads
//! copy bytes between the real terminal and the pseudo-terminal until the
//! child exits.

#[macro_use]
extern crate tracing;

pub mod ansi;
pub mod builtins;
pub mod commands;
pub mod config;
pub mod error;
pub mod execution;
pub mod history;
pub mod pty;
pub mod reader;
pub mod shell;

// Re-exports for core functionality
pub use builtins::{Builtin, BuiltinOutcome, BuiltinRegistry};
pub use commands::{resolve, tokenize, ParseError};
pub use config::loader::ConfigLoader;
pub use config::{Config, ConfigStore, Persistence};
pub use error::{ConfigError, Error, ErrorKind, Result};
pub use execution::{ExitStatus, Executor, InteractivePolicy, LaunchMode};
pub use history::HistoryRecorder;
pub use reader::RustylineReader;
pub use shell::{Flow, LineReader, Shell};

// Version information
/// The current version of mosaicsh from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The application name from Cargo.toml
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// The application description from Cargo.toml
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
