//! Error types and Result aliases for mosaicsh

use std::path::PathBuf;

use crate::commands::tokenizer::ParseError;

/// Result type alias for mosaicsh operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for mosaicsh
///
/// Every error produced while handling one input line is reported by the
/// engine and the loop continues; only [`Error::Input`] ends the session.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed command line (unterminated quote, dangling escape)
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Invalid setting, alias collision, missing alias
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// Directory change target is invalid
    #[error("cd: {}: {reason}", path.display())]
    Navigation { path: PathBuf, reason: String },

    /// Spawn failure, abnormal child termination, wait failure
    #[error("{command}: {reason}")]
    Exec { command: String, reason: String },

    /// History or configuration persistence failure
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// The line reader failed in a way the session cannot recover from
    #[error("input error: {reason}")]
    Input { reason: String },
}

/// Coarse classification of [`Error`], mirroring the shell's error taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    Config,
    Navigation,
    Exec,
    Io,
    Input,
}

impl Error {
    /// Build an [`Error::Exec`] for `command`
    pub fn exec(command: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Exec {
            command: command.into(),
            reason: reason.into(),
        }
    }

    /// Build an [`Error::Navigation`] for `path`
    pub fn navigation(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::Navigation {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Build an [`Error::Io`] with a short description of what was attempted
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Error::Io {
            context: context.into(),
            source,
        }
    }

    /// Which part of the taxonomy this error belongs to
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Parse(_) => ErrorKind::Parse,
            Error::Config(_) => ErrorKind::Config,
            Error::Navigation { .. } => ErrorKind::Navigation,
            Error::Exec { .. } => ErrorKind::Exec,
            Error::Io { .. } => ErrorKind::Io,
            Error::Input { .. } => ErrorKind::Input,
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown setting '{0}' (expected one of: prompt, color, history_size)")]
    UnknownKey(String),

    #[error("invalid history_size '{0}': must be a positive integer")]
    InvalidHistorySize(String),

    #[error("unknown color '{name}' (available: {available})")]
    UnknownColor { name: String, available: String },

    #[error("alias name cannot be empty")]
    EmptyAliasName,

    #[error("alias name '{0}' cannot contain whitespace or quotes")]
    InvalidAliasName(String),

    #[error("alias '{0}' needs a command")]
    EmptyAliasCommand(String),

    #[error("'{0}' is a builtin command and cannot be aliased")]
    ReservedName(String),

    #[error("alias '{name}' has an invalid command: {reason}")]
    InvalidAliasCommand { name: String, reason: String },

    #[error("no such alias: '{0}'")]
    UnknownAlias(String),

    #[error("usage: {0}")]
    Usage(String),

    #[error("failed to parse {format} config '{}': {reason}", path.display())]
    ParseFailed {
        path: PathBuf,
        format: &'static str,
        reason: String,
    },

    #[error("failed to serialize config as {format}: {reason}")]
    SerializationFailed { format: &'static str, reason: String },
}
