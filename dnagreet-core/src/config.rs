//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/dnagreet/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/dnagreet/` (~/.config/dnagreet/)
//! - Data: `$XDG_DATA_HOME/dnagreet/` (~/.local/share/dnagreet/)
//! - State/Logs: `$XDG_STATE_HOME/dnagreet/` (~/.local/state/dnagreet/)

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_DATA_HOME or ~/.local/share
fn xdg_data_home() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/share"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Greeting timers and referrer
    #[serde(default)]
    pub greeting: GreetingConfig,

    /// Visit store selection
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Greeting refresh configuration
#[derive(Debug, Deserialize, Clone)]
pub struct GreetingConfig {
    /// Seconds between clock ticks that recompute the greeting
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,

    /// Seconds between re-renders of the rotating status
    #[serde(default = "default_status_poll")]
    pub status_poll_secs: u64,

    /// Referrer to report when none is given on the command line
    pub referrer: Option<String>,
}

impl Default for GreetingConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: default_refresh_interval(),
            status_poll_secs: default_status_poll(),
            referrer: None,
        }
    }
}

impl GreetingConfig {
    /// Clock tick interval
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    /// Status re-render interval
    pub fn status_poll(&self) -> Duration {
        Duration::from_secs(self.status_poll_secs)
    }

    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        if self.refresh_interval_secs == 0 {
            return Err(Error::Config(
                "greeting.refresh_interval_secs must be greater than zero".to_string(),
            ));
        }
        if self.status_poll_secs == 0 {
            return Err(Error::Config(
                "greeting.status_poll_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_refresh_interval() -> u64 {
    60
}

fn default_status_poll() -> u64 {
    10
}

/// Which visit store backs the visit record
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// SQLite file under the data directory
    #[default]
    Sqlite,
    /// Process-local map, forgotten on exit
    Memory,
    /// Storage turned off; every visit is a first visit
    Disabled,
}

/// Visit store configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct StorageConfig {
    /// Store backend
    #[serde(default)]
    pub backend: StorageBackend,

    /// Override path for the SQLite visit database
    pub path: Option<PathBuf>,
}

impl StorageConfig {
    /// Resolved SQLite path (override or XDG default)
    pub fn database_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(Config::database_path)
    }
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.greeting.validate()?;

        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/dnagreet/config.toml` (~/.config/dnagreet/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("dnagreet").join("config.toml")
    }

    /// Returns the data directory path (for the visit database)
    ///
    /// `$XDG_DATA_HOME/dnagreet/` (~/.local/share/dnagreet/)
    pub fn data_dir() -> PathBuf {
        xdg_data_home().join("dnagreet")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/dnagreet/` (~/.local/state/dnagreet/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("dnagreet")
    }

    /// Returns the visit database file path
    ///
    /// `$XDG_DATA_HOME/dnagreet/visits.db` (~/.local/share/dnagreet/visits.db)
    pub fn database_path() -> PathBuf {
        Self::data_dir().join("visits.db")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/dnagreet/dnagreet.log` (~/.local/state/dnagreet/dnagreet.log)
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("dnagreet.log")
    }
}
