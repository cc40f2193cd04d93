//! Configuration File Loading
//!
//! Reads and writes the configuration file. TOML is the default format;
//! a `.json` extension switches to JSON.

use std::fs;
use std::path::{Path, PathBuf};

use super::Config;
use crate::error::{ConfigError, Error, Result};

/// Directory name under the user config directory
const CONFIG_DIR_NAME: &str = "mosaicsh";

/// Default configuration file name
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML format
    Toml,
    /// JSON format
    Json,
}

impl ConfigFormat {
    /// Pick the format from a file extension, defaulting to TOML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ConfigFormat::Json,
            _ => ConfigFormat::Toml,
        }
    }

    fn name(self) -> &'static str {
        match self {
            ConfigFormat::Toml => "TOML",
            ConfigFormat::Json => "JSON",
        }
    }
}

/// Configuration file loader bound to one path
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    path: PathBuf,
    format: ConfigFormat,
}

impl ConfigLoader {
    /// Create a loader for a specific file
    pub fn new(path: PathBuf) -> Self {
        let format = ConfigFormat::from_path(&path);
        Self { path, format }
    }

    /// Loader for the per-user default location, if one can be determined
    pub fn with_default_path() -> Option<Self> {
        Self::default_path().map(Self::new)
    }

    /// `$XDG_CONFIG_HOME/mosaicsh/config.toml`, falling back to `~/.config`
    pub fn default_path() -> Option<PathBuf> {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .filter(|p| p.is_absolute())
            .or_else(dirs::config_dir)
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))?;
        Some(base.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Path this loader reads and writes
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the file, or return defaults when it does not exist yet.
    ///
    /// Fields missing from the file take their default values.
    pub fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            debug!("No config at {}, using defaults", self.path.display());
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| {
            Error::io(format!("failed to read {}", self.path.display()), e)
        })?;
        self.parse(&content)
    }

    fn parse(&self, content: &str) -> Result<Config> {
        let parsed = match self.format {
            ConfigFormat::Toml => toml::from_str::<Config>(content).map_err(|e| e.to_string()),
            ConfigFormat::Json => {
                serde_json::from_str::<Config>(content).map_err(|e| e.to_string())
            }
        };

        parsed.map_err(|reason| {
            Error::Config(ConfigError::ParseFailed {
                path: self.path.clone(),
                format: self.format.name(),
                reason,
            })
        })
    }

    /// Write `config` to the bound path, creating parent directories
    pub fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::io(format!("failed to create {}", parent.display()), e)
            })?;
        }

        let content = match self.format {
            ConfigFormat::Toml => toml::to_string_pretty(config).map_err(|e| e.to_string()),
            ConfigFormat::Json => serde_json::to_string_pretty(config).map_err(|e| e.to_string()),
        }
        .map_err(|reason| {
            Error::Config(ConfigError::SerializationFailed {
                format: self.format.name(),
                reason,
            })
        })?;

        fs::write(&self.path, content)
            .map_err(|e| Error::io(format!("failed to write {}", self.path.display()), e))?;
        debug!("Saved config to {}", self.path.display());
        Ok(())
    }
}
