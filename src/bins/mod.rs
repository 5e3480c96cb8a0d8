//! Bin lifecycle management for smplbin.
//!
//! This module provides everything needed to run temporary file bins:
//! - Opaque bin identifiers
//! - Bin and file metadata repositories
//! - Per-bin directory storage for file bytes
//! - Quota accounting, expiry and the expiry sweep

mod entry;
mod filename;
mod id;
mod record;
mod service;
mod storage;

pub use entry::{BinFile, BinFileRepository, NewBinFile};
pub use filename::sanitize_filename;
pub use id::BinId;
pub use record::{Bin, BinRepository, NewBin};
pub use service::{AddedFiles, BinService, BinSummary, DownloadResult, RemovedFile, UploadFile};
pub use storage::BinStorage;

use chrono::{DateTime, Duration, Utc};

use crate::config::StorageConfig;

/// Default maximum cumulative size of one bin (5MB).
pub const DEFAULT_MAX_BIN_SIZE: u64 = 5 * 1024 * 1024;

/// Default number of days a bin is retained.
pub const DEFAULT_RETENTION_DAYS: u32 = 3;

/// Maximum length for a sanitized filename (in bytes).
pub const MAX_FILENAME_LENGTH: usize = 255;

/// Immutable quota and retention settings for the bin service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinSettings {
    /// Maximum cumulative size of one bin in bytes.
    pub max_bin_size: u64,
    /// How long a bin lives after creation.
    pub retention: Duration,
}

impl BinSettings {
    /// Create settings with an explicit quota and retention window.
    pub fn new(max_bin_size: u64, retention: Duration) -> Self {
        Self {
            max_bin_size,
            retention,
        }
    }

    /// Build settings from the storage section of the configuration.
    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(
            config.max_bin_size_bytes,
            Duration::days(i64::from(config.retention_days)),
        )
    }

    /// When a bin created at `created_at` expires.
    pub fn expires_at(&self, created_at: DateTime<Utc>) -> DateTime<Utc> {
        created_at + self.retention
    }
}

impl Default for BinSettings {
    fn default() -> Self {
        Self::new(
            DEFAULT_MAX_BIN_SIZE,
            Duration::days(i64::from(DEFAULT_RETENTION_DAYS)),
        )
    }
}
