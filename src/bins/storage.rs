//! Blob storage for bin files.
//!
//! Every bin owns one directory named by its id:
//! ```text
//! {base_path}/
//! ├── 0f8e2c1a-7d4b-4e5f-9a6b-3c2d1e0f9a8b/
//! │   ├── report.pdf
//! │   └── notes.txt
//! └── ...
//! ```
//!
//! Removals tolerate targets that are already gone, since the expiry sweep
//! and explicit deletes may race.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::BinId;
use crate::{Result, SmplbinError};

/// Directory-per-bin file storage.
#[derive(Debug, Clone)]
pub struct BinStorage {
    /// Root upload directory.
    base_path: PathBuf,
}

impl BinStorage {
    /// Create a new BinStorage rooted at the given path.
    ///
    /// The root directory will be created if it doesn't exist.
    pub fn new(base_path: impl Into<PathBuf>) -> Result<Self> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path)?;

        Ok(Self { base_path })
    }

    /// Get the root path of this storage.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Directory holding a bin's files.
    pub fn bin_dir(&self, bin_id: &BinId) -> PathBuf {
        self.base_path.join(bin_id.to_string())
    }

    /// Path of one file inside a bin.
    ///
    /// `filename` must already be sanitized.
    pub fn file_path(&self, bin_id: &BinId, filename: &str) -> PathBuf {
        self.bin_dir(bin_id).join(filename)
    }

    /// Create a bin's directory (no-op if it already exists).
    pub fn create_bin_dir(&self, bin_id: &BinId) -> Result<()> {
        fs::create_dir_all(self.bin_dir(bin_id))?;
        Ok(())
    }

    /// Recursively delete a bin's directory.
    ///
    /// # Returns
    ///
    /// `true` if the directory was deleted, `false` if it didn't exist
    pub fn delete_bin_dir(&self, bin_id: &BinId) -> Result<bool> {
        match fs::remove_dir_all(self.bin_dir(bin_id)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Check whether a bin's directory exists.
    pub fn bin_dir_exists(&self, bin_id: &BinId) -> bool {
        self.bin_dir(bin_id).is_dir()
    }

    /// Write a file into a bin, replacing any previous content.
    pub fn save(&self, bin_id: &BinId, filename: &str, content: &[u8]) -> Result<()> {
        let file_path = self.file_path(bin_id, filename);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&file_path, content)?;
        Ok(())
    }

    /// Read a file from a bin.
    pub fn load(&self, bin_id: &BinId, filename: &str) -> Result<Vec<u8>> {
        match fs::read(self.file_path(bin_id, filename)) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(SmplbinError::NotFound(format!("file '{filename}'")))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a single file from a bin.
    ///
    /// # Returns
    ///
    /// `true` if the file was deleted, `false` if it didn't exist
    pub fn delete(&self, bin_id: &BinId, filename: &str) -> Result<bool> {
        match fs::remove_file(self.file_path(bin_id, filename)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Check if a file exists in a bin.
    pub fn exists(&self, bin_id: &BinId, filename: &str) -> bool {
        self.file_path(bin_id, filename).is_file()
    }

    /// List the filenames stored in a bin, sorted.
    ///
    /// A missing directory lists as empty.
    pub fn list(&self, bin_id: &BinId) -> Result<Vec<String>> {
        let entries = match fs::read_dir(self.bin_dir(bin_id)) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                if let Some(name) = entry.file_name().to_str() {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();

        Ok(names)
    }
}
