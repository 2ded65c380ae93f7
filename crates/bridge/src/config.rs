//! Configuration management for the DroidBridge service.
//!
//! This module provides TOML-based configuration file loading and saving.
//! The default configuration path is `~/.config/droidbridge/config.toml`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("log_level must be one of: trace, debug, info, warn, error; got {0}")]
    InvalidLogLevel(String),

    #[error("poll_interval_secs must be between 1 and 3600, got {0}")]
    InvalidPollInterval(u64),

    #[error("default_root must be an absolute path, got {0}")]
    InvalidRemoteRoot(String),

    #[error("adb binary does not exist: {0}")]
    InvalidAdbPath(String),
}

/// Valid log level values for tracing configuration.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Main configuration structure for the DroidBridge service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    /// General service configuration.
    pub service: ServiceConfig,

    /// Local filesystem configuration.
    pub local: LocalConfig,

    /// Remote filesystem configuration.
    pub remote: RemoteConfig,

    /// Device presence polling configuration.
    pub presence: PresenceConfig,

    /// Debug bridge binary configuration.
    pub adb: AdbConfig,
}

/// General service configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServiceConfig {
    /// Logging level (trace, debug, info, warn, error).
    pub log_level: String,
}

/// Local filesystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LocalConfig {
    /// Root directory local browsing is anchored to.
    pub root: PathBuf,
}

/// Remote filesystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RemoteConfig {
    /// Directory remote browsing starts in when no path is given.
    pub default_root: String,
}

/// Device presence polling configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PresenceConfig {
    /// Seconds between device list broadcasts.
    pub poll_interval_secs: u64,
}

/// Debug bridge binary configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct AdbConfig {
    /// Path to the adb binary. When unset, the binary is looked up on PATH.
    pub binary: Option<PathBuf>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            root: default_local_root(),
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            default_root: "/sdcard".to_string(),
        }
    }
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 2,
        }
    }
}

impl PresenceConfig {
    /// The poll interval as a [`Duration`].
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

/// Returns the default configuration file path.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("droidbridge")
        .join("config.toml")
}

/// Returns the default local browsing root.
fn default_local_root() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

impl Config {
    /// Apply environment variable overrides to the configuration.
    ///
    /// Environment variables take precedence over config file values.
    /// Supported variables:
    /// - DROIDBRIDGE_LOG_LEVEL: Override log level (trace, debug, info, warn, error)
    /// - DROIDBRIDGE_LOCAL_ROOT: Override the local browsing root
    /// - DROIDBRIDGE_REMOTE_ROOT: Override the remote browsing root
    /// - DROIDBRIDGE_POLL_INTERVAL: Override presence polling interval in seconds
    /// - DROIDBRIDGE_ADB_PATH: Override the adb binary path
    pub fn apply_env_overrides(&mut self) {
        if let Ok(level) = std::env::var("DROIDBRIDGE_LOG_LEVEL") {
            if !level.is_empty() {
                tracing::info!("Overriding log_level from environment: {}", level);
                self.service.log_level = level;
            }
        }

        if let Ok(root) = std::env::var("DROIDBRIDGE_LOCAL_ROOT") {
            if !root.is_empty() {
                tracing::info!("Overriding local root from environment: {}", root);
                self.local.root = PathBuf::from(root);
            }
        }

        if let Ok(root) = std::env::var("DROIDBRIDGE_REMOTE_ROOT") {
            if !root.is_empty() {
                tracing::info!("Overriding remote root from environment: {}", root);
                self.remote.default_root = root;
            }
        }

        if let Ok(value) = std::env::var("DROIDBRIDGE_POLL_INTERVAL") {
            if !value.is_empty() {
                match value.parse::<u64>() {
                    Ok(secs) => {
                        tracing::info!("Overriding poll interval from environment: {}", secs);
                        self.presence.poll_interval_secs = secs;
                    }
                    Err(_) => {
                        tracing::warn!("Ignoring non-numeric DROIDBRIDGE_POLL_INTERVAL: {}", value);
                    }
                }
            }
        }

        if let Ok(path) = std::env::var("DROIDBRIDGE_ADB_PATH") {
            if !path.is_empty() {
                tracing::info!("Overriding adb binary from environment: {}", path);
                self.adb.binary = Some(PathBuf::from(path));
            }
        }
    }

    /// Validate the configuration values.
    ///
    /// Returns an error if any configuration value is outside the valid range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Validate log_level is a known value
        let level = self.service.log_level.to_lowercase();
        if !VALID_LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(self.service.log_level.clone()));
        }

        // Validate poll_interval_secs: 1-3600
        let interval = self.presence.poll_interval_secs;
        if interval < 1 || interval > 3600 {
            return Err(ConfigError::InvalidPollInterval(interval));
        }

        // Validate the remote root is absolute
        if !self.remote.default_root.starts_with('/') {
            return Err(ConfigError::InvalidRemoteRoot(
                self.remote.default_root.clone(),
            ));
        }

        // Validate the adb binary when one is configured
        if let Some(binary) = &self.adb.binary {
            if binary.is_absolute() {
                if !binary.exists() {
                    return Err(ConfigError::InvalidAdbPath(binary.display().to_string()));
                }
            } else if which::which(binary).is_err() {
                return Err(ConfigError::InvalidAdbPath(binary.display().to_string()));
            }
        }

        Ok(())
    }

    /// Load configuration from a file.
    ///
    /// If the file does not exist, returns the default configuration.
    /// If the file exists but is invalid TOML, returns an error with
    /// a helpful message.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::debug!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Load configuration from the default path.
    ///
    /// The default path is `~/.config/droidbridge/config.toml`.
    pub fn load_default() -> Result<Self> {
        Self::load(default_config_path())
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str)
            .map_err(|e| anyhow::anyhow!("Invalid TOML configuration: {}", format_toml_error(&e)))
    }

    /// Save configuration to a file.
    ///
    /// Creates parent directories if they don't exist.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = self.to_toml()?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::debug!("Configuration saved to {:?}", path);
        Ok(())
    }

    /// Save configuration to the default path.
    pub fn save_default(&self) -> Result<()> {
        self.save(default_config_path())
    }

    /// Serialize configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")
    }
}

/// Format a TOML deserialization error for user-friendly display.
fn format_toml_error(error: &toml::de::Error) -> String {
    let mut msg = error.message().to_string();

    if let Some(span) = error.span() {
        msg.push_str(&format!(" (at position {}..{})", span.start, span.end));
    }

    msg
}
