//! Configuration management for mosaicsh
//!
//! [`Config`] is the plain settings model (prompt template, color, history
//! size, aliases, interactive program list). [`ConfigStore`] owns the live
//! `Config`, validates every mutation and writes it back through
//! [`loader::ConfigLoader`]. When the file cannot be written the change is
//! kept in memory and the caller gets a warning instead of an error.

pub mod loader;
pub mod prompt;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::ansi;
use crate::builtins::is_reserved;
use crate::commands::tokenize;
use crate::error::{ConfigError, Result};
use loader::ConfigLoader;

/// Default prompt template
pub const DEFAULT_PROMPT: &str = "{dir} $ ";

/// Default prompt color
pub const DEFAULT_COLOR: &str = "green";

/// Default number of entries kept for history recall
pub const DEFAULT_HISTORY_SIZE: usize = 1000;

/// Programs that expect a controlling terminal unless configured otherwise
const DEFAULT_INTERACTIVE_COMMANDS: &[&str] = &[
    "vim", "vi", "nvim", "nano", "emacs", "pico", "micro", "less", "more", "most", "man", "top",
    "htop", "btop", "atop", "watch", "ssh", "telnet", "mosh", "ftp", "sftp", "tmux", "screen",
    "mysql", "psql", "sqlite3", "python", "python3", "node", "irb", "bash", "zsh", "fish", "sh",
];

/// Main configuration structure for mosaicsh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Prompt template with `{dir}`, `{time}`, `{date}`, `{shell}`, `{version}`
    pub prompt: String,

    /// Palette name the rendered prompt is wrapped in
    pub color: String,

    /// Number of lines kept for history recall; always > 0
    #[serde(deserialize_with = "lenient_history_size")]
    pub history_size: usize,

    /// Program names that run through a pseudo-terminal
    pub interactive_commands: BTreeSet<String>,

    /// Pseudo-terminal size used for interactive programs
    pub pty: PtyDimensions,

    /// Alias name -> command string
    pub aliases: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            color: DEFAULT_COLOR.to_string(),
            history_size: DEFAULT_HISTORY_SIZE,
            interactive_commands: DEFAULT_INTERACTIVE_COMMANDS
                .iter()
                .map(|name| name.to_string())
                .collect(),
            pty: PtyDimensions::default(),
            aliases: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Repair values a hand-edited file may get wrong.
    ///
    /// Returns one warning per repair. Aliases that could never have been
    /// created through the `alias` builtin are dropped.
    pub fn normalize(&mut self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.history_size == 0 {
            warnings.push(format!(
                "history_size must be positive, using {}",
                DEFAULT_HISTORY_SIZE
            ));
            self.history_size = DEFAULT_HISTORY_SIZE;
        }

        if ansi::lookup(&self.color).is_none() {
            warnings.push(format!(
                "unknown color '{}', prompt will not be colored",
                self.color
            ));
        }

        if self.pty.rows == 0 || self.pty.cols == 0 {
            warnings.push("pty dimensions must be positive, using 24x80".to_string());
            self.pty = PtyDimensions::default();
        }

        self.aliases.retain(|name, command| match validate_alias(name, command) {
            Ok(()) => true,
            Err(e) => {
                warnings.push(format!("dropping alias: {}", e));
                false
            }
        });

        warnings
    }
}

/// Pseudo-terminal dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PtyDimensions {
    pub rows: u16,
    pub cols: u16,
}

impl Default for PtyDimensions {
    fn default() -> Self {
        Self { rows: 24, cols: 80 }
    }
}

impl PtyDimensions {
    /// Configured size, overridden by `LINES`/`COLUMNS` when the
    /// environment exports them
    pub fn with_env_overrides(self) -> Self {
        let read = |key: &str| {
            std::env::var(key)
                .ok()
                .and_then(|v| v.trim().parse::<u16>().ok())
                .filter(|v| *v > 0)
        };
        Self {
            rows: read("LINES").unwrap_or(self.rows),
            cols: read("COLUMNS").unwrap_or(self.cols),
        }
    }
}

/// Accept any value for `history_size`, coercing invalid ones to the default
fn lenient_history_size<'de, D>(deserializer: D) -> std::result::Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    let size = match Raw::deserialize(deserializer)? {
        Raw::Int(n) => usize::try_from(n).ok().filter(|n| *n > 0),
        Raw::Text(text) => parse_history_size(&text).ok(),
        Raw::Other(_) => None,
    };

    Ok(size.unwrap_or_else(|| {
        warn!(
            "Invalid history_size in config, using default {}",
            DEFAULT_HISTORY_SIZE
        );
        DEFAULT_HISTORY_SIZE
    }))
}

/// Parse a user-supplied history size; must be a positive integer
pub fn parse_history_size(value: &str) -> std::result::Result<usize, ConfigError> {
    value
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| ConfigError::InvalidHistorySize(value.to_string()))
}

/// Check that `name -> command` is an alias the shell can hold
pub fn validate_alias(name: &str, command: &str) -> std::result::Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::EmptyAliasName);
    }
    if name
        .chars()
        .any(|c| c.is_whitespace() || c == '\'' || c == '"' || c == '\\')
    {
        return Err(ConfigError::InvalidAliasName(name.to_string()));
    }
    if is_reserved(name) {
        return Err(ConfigError::ReservedName(name.to_string()));
    }

    match tokenize(command) {
        Ok(words) if words.is_empty() => Err(ConfigError::EmptyAliasCommand(name.to_string())),
        Ok(_) => Ok(()),
        Err(e) => Err(ConfigError::InvalidAliasCommand {
            name: name.to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Settings the `set` builtin may change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    Prompt,
    Color,
    HistorySize,
}

impl SettingKey {
    pub const ALL: [SettingKey; 3] = [SettingKey::Prompt, SettingKey::Color, SettingKey::HistorySize];

    pub fn as_str(self) -> &'static str {
        match self {
            SettingKey::Prompt => "prompt",
            SettingKey::Color => "color",
            SettingKey::HistorySize => "history_size",
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        SettingKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}

/// Outcome of writing the configuration back to disk
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Persistence {
    /// Written to the given file
    Saved(PathBuf),
    /// Kept in memory only
    MemoryOnly { reason: String },
}

impl Persistence {
    /// Warning to show the user, if the change was not persisted
    pub fn warning(&self) -> Option<String> {
        match self {
            Persistence::Saved(_) => None,
            Persistence::MemoryOnly { reason } => {
                Some(format!("settings kept in memory only: {}", reason))
            }
        }
    }
}

/// Owner of the live configuration
#[derive(Debug)]
pub struct ConfigStore {
    config: Config,
    loader: Option<ConfigLoader>,
}

impl ConfigStore {
    /// A store that never touches the filesystem
    pub fn in_memory(config: Config) -> Self {
        Self {
            config,
            loader: None,
        }
    }

    /// Load from `loader`'s file, falling back to defaults.
    ///
    /// Returns the store and any warnings collected while loading. The
    /// store stays bound to the file even when it could not be read, so
    /// the next mutation rewrites it.
    pub fn open(loader: ConfigLoader) -> (Self, Vec<String>) {
        let mut warnings = Vec::new();
        let mut config = match loader.load() {
            Ok(config) => {
                info!("Configuration loaded from {}", loader.path().display());
                config
            }
            Err(e) => {
                warnings.push(format!("{}; using defaults", e));
                Config::default()
            }
        };
        warnings.extend(config.normalize());

        for warning in &warnings {
            warn!("{}", warning);
        }

        (
            Self {
                config,
                loader: Some(loader),
            },
            warnings,
        )
    }

    /// Open the per-user configuration file, or run in memory when no
    /// config directory can be determined
    pub fn open_default() -> (Self, Vec<String>) {
        match ConfigLoader::with_default_path() {
            Some(loader) => Self::open(loader),
            None => (
                Self::in_memory(Config::default()),
                vec!["no config directory found; settings will not be saved".to_string()],
            ),
        }
    }

    /// Current configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// File the store persists to, if any
    pub fn path(&self) -> Option<&Path> {
        self.loader.as_ref().map(ConfigLoader::path)
    }

    /// Read one setting as text
    pub fn get(&self, key: &str) -> Result<String> {
        let value = match key.parse::<SettingKey>()? {
            SettingKey::Prompt => self.config.prompt.clone(),
            SettingKey::Color => self.config.color.clone(),
            SettingKey::HistorySize => self.config.history_size.to_string(),
        };
        Ok(value)
    }

    /// Validate and apply one setting, then persist
    pub fn set(&mut self, key: &str, value: &str) -> Result<Persistence> {
        match key.parse::<SettingKey>()? {
            SettingKey::Prompt => self.config.prompt = value.to_string(),
            SettingKey::Color => {
                let color = ansi::lookup(value).ok_or_else(|| ConfigError::UnknownColor {
                    name: value.to_string(),
                    available: ansi::names().collect::<Vec<_>>().join(", "),
                })?;
                self.config.color = color.name.to_string();
            }
            SettingKey::HistorySize => self.config.history_size = parse_history_size(value)?,
        }
        debug!("Setting {} updated", key);
        Ok(self.persist())
    }

    /// Create or overwrite an alias, then persist
    pub fn set_alias(&mut self, name: &str, command: &str) -> Result<Persistence> {
        validate_alias(name, command)?;
        self.config
            .aliases
            .insert(name.to_string(), command.to_string());
        debug!("Alias '{}' defined", name);
        Ok(self.persist())
    }

    /// Remove an alias, returning its command, then persist
    pub fn remove_alias(&mut self, name: &str) -> Result<(String, Persistence)> {
        let command = self
            .config
            .aliases
            .remove(name)
            .ok_or_else(|| ConfigError::UnknownAlias(name.to_string()))?;
        debug!("Alias '{}' removed", name);
        Ok((command, self.persist()))
    }

    /// Write the configuration back; failures are reported, never raised
    pub fn persist(&self) -> Persistence {
        let Some(loader) = &self.loader else {
            return Persistence::MemoryOnly {
                reason: "no configuration file".to_string(),
            };
        };

        match loader.save(&self.config) {
            Ok(()) => Persistence::Saved(loader.path().to_path_buf()),
            Err(e) => {
                warn!("Failed to persist configuration: {}", e);
                Persistence::MemoryOnly {
                    reason: e.to_string(),
                }
            }
        }
    }
}
