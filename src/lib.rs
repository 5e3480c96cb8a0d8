//! smplbin - Simple temporary file bins
//!
//! Upload one or more files as a bin, share its id, download or prune the
//! files, and let the bin expire after a fixed retention window.

pub mod bins;
pub mod config;
pub mod datetime;
pub mod db;
pub mod error;
pub mod logging;
pub mod web;

pub use bins::{
    AddedFiles, Bin, BinFile, BinId, BinService, BinSettings, BinStorage, BinSummary,
    DownloadResult, RemovedFile, UploadFile, DEFAULT_MAX_BIN_SIZE, DEFAULT_RETENTION_DAYS,
};
pub use config::Config;
pub use db::Database;
pub use error::{Result, SmplbinError};
