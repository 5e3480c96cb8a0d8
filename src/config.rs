//! Configuration module for smplbin.

use serde::Deserialize;
use std::path::Path;

use crate::bins::{DEFAULT_MAX_BIN_SIZE, DEFAULT_RETENTION_DAYS};
use crate::{Result, SmplbinError};

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origins. Empty allows any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/smplbin.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Bin storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Root directory holding one subdirectory per bin.
    #[serde(default = "default_upload_path")]
    pub upload_path: String,
    /// Maximum cumulative size of one bin in bytes.
    #[serde(default = "default_max_bin_size")]
    pub max_bin_size_bytes: u64,
    /// Days a bin is kept before it becomes eligible for the sweep.
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
}

fn default_upload_path() -> String {
    "uploads".to_string()
}

fn default_max_bin_size() -> u64 {
    DEFAULT_MAX_BIN_SIZE
}

fn default_retention_days() -> u32 {
    DEFAULT_RETENTION_DAYS
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_path: default_upload_path(),
            max_bin_size_bytes: default_max_bin_size(),
            retention_days: default_retention_days(),
        }
    }
}

/// Expiry sweep configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SweepConfig {
    /// Interval of the background sweep in seconds (0 disables the task).
    #[serde(default = "default_sweep_interval")]
    pub interval_secs: u64,
    /// Run a sweep whenever the landing route is served.
    #[serde(default = "default_sweep_on_landing")]
    pub on_landing: bool,
}

fn default_sweep_interval() -> u64 {
    3600 // 1 hour
}

fn default_sweep_on_landing() -> bool {
    true
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_sweep_interval(),
            on_landing: default_sweep_on_landing(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/smplbin.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Bin storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Expiry sweep configuration.
    #[serde(default)]
    pub sweep: SweepConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(SmplbinError::Io)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| SmplbinError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `SMPLBIN_DATABASE_PATH`: Override the database file path
    /// - `SMPLBIN_UPLOAD_PATH`: Override the upload root directory
    pub fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("SMPLBIN_DATABASE_PATH") {
            if !path.is_empty() {
                self.database.path = path;
            }
        }
        if let Ok(path) = std::env::var("SMPLBIN_UPLOAD_PATH") {
            if !path.is_empty() {
                self.storage.upload_path = path;
            }
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if the bin quota or the retention window is zero.
    pub fn validate(&self) -> Result<()> {
        if self.storage.max_bin_size_bytes == 0 {
            return Err(SmplbinError::Config(
                "storage.max_bin_size_bytes must be greater than zero".to_string(),
            ));
        }
        if self.storage.retention_days == 0 {
            return Err(SmplbinError::Config(
                "storage.retention_days must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
