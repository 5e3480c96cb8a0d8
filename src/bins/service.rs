//! Bin service for smplbin.
//!
//! This module provides the bin lifecycle operations:
//! - Creation and incremental additions under the size quota
//! - File removal, download and whole-bin deletion
//! - The expiry sweep
//!
//! Blobs are written before metadata is committed, so the metadata store
//! decides whether a file exists. The two stores are not updated in one
//! transaction and concurrent additions to the same bin are not serialized.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::db::Database;
use crate::{Result, SmplbinError};

use super::entry::{BinFile, BinFileRepository, NewBinFile};
use super::filename::sanitize_filename;
use super::id::BinId;
use super::record::{Bin, BinRepository, NewBin};
use super::storage::BinStorage;
use super::BinSettings;

/// One uploaded file as received from the caller.
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// Filename as supplied (sanitized before use).
    pub name: String,
    /// File content.
    pub content: Vec<u8>,
}

impl UploadFile {
    /// Create a new upload.
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// Everything a caller needs to render a bin.
#[derive(Debug, Clone)]
pub struct BinSummary {
    /// Bin identifier.
    pub id: BinId,
    /// When the bin was created.
    pub created_at: DateTime<Utc>,
    /// When the bin becomes eligible for the sweep.
    pub expires_at: DateTime<Utc>,
    /// Sum of file sizes in bytes.
    pub total_size: u64,
    /// Files in upload order.
    pub files: Vec<BinFile>,
    /// Whether the bin holds no files.
    pub is_empty: bool,
}

/// Outcome of removing one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedFile {
    /// Name of the removed file.
    pub filename: String,
    /// Its recorded size.
    pub size: u64,
    /// Whether the bin is now empty.
    pub bin_empty: bool,
}

/// Outcome of adding files to a bin.
#[derive(Debug, Clone)]
pub struct AddedFiles {
    /// The bin after the addition.
    pub bin: Bin,
    /// Stored names of the added files, in request order.
    pub filenames: Vec<String>,
}

/// Result of a file download.
#[derive(Debug)]
pub struct DownloadResult {
    /// File record.
    pub file: BinFile,
    /// File content.
    pub content: Vec<u8>,
}

/// Bin lifecycle manager.
pub struct BinService<'a> {
    db: &'a Database,
    storage: &'a BinStorage,
    settings: &'a BinSettings,
}

impl<'a> BinService<'a> {
    /// Create a new BinService.
    pub fn new(db: &'a Database, storage: &'a BinStorage, settings: &'a BinSettings) -> Self {
        Self {
            db,
            storage,
            settings,
        }
    }

    /// Get the quota and retention settings.
    pub fn settings(&self) -> &BinSettings {
        self.settings
    }

    /// Create a bin holding `files`, stamped with the current time.
    pub async fn create_bin(&self, files: Vec<UploadFile>) -> Result<Bin> {
        self.create_bin_at(files, Utc::now()).await
    }

    /// Create a bin holding `files` with an explicit creation time.
    ///
    /// Zero files is allowed and yields an empty bin. If the running total
    /// goes over the quota, every blob written so far is removed and
    /// nothing is recorded.
    pub async fn create_bin_at(
        &self,
        files: Vec<UploadFile>,
        created_at: DateTime<Utc>,
    ) -> Result<Bin> {
        let files = prepare_files(files)?;
        let id = BinId::generate();

        let mut total: u64 = 0;
        for (name, content) in &files {
            total += content.len() as u64;
            if total > self.settings.max_bin_size {
                self.discard_blobs(&id);
                info!(
                    "Rejected new bin: {} bytes exceeds limit of {}",
                    total, self.settings.max_bin_size
                );
                return Err(SmplbinError::QuotaExceeded {
                    limit: self.settings.max_bin_size,
                    attempted: total,
                });
            }
            if let Err(e) = self.storage.save(&id, name, content) {
                self.discard_blobs(&id);
                return Err(e);
            }
        }

        match self.record_new_bin(&id, &files, total, created_at).await {
            Ok(bin) => {
                info!("Created bin {} with {} file(s), {} bytes", id, files.len(), total);
                Ok(bin)
            }
            Err(e) => {
                if let Err(cleanup) = BinRepository::new(self.db.pool()).delete(&id).await {
                    warn!("Failed to roll back bin record {}: {}", id, cleanup);
                }
                self.discard_blobs(&id);
                Err(e)
            }
        }
    }

    async fn record_new_bin(
        &self,
        id: &BinId,
        files: &[(String, Vec<u8>)],
        total: u64,
        created_at: DateTime<Utc>,
    ) -> Result<Bin> {
        let bin = BinRepository::new(self.db.pool())
            .create(
                &NewBin::new(*id)
                    .with_created_at(created_at)
                    .with_total_size(total as i64),
            )
            .await?;

        let file_repo = BinFileRepository::new(self.db.pool());
        for (name, content) in files {
            file_repo
                .upsert(&NewBinFile::new(*id, name.as_str(), content.len() as i64))
                .await?;
        }

        Ok(bin)
    }

    fn discard_blobs(&self, id: &BinId) {
        if let Err(e) = self.storage.delete_bin_dir(id) {
            warn!("Failed to remove directory of bin {}: {}", id, e);
        }
    }

    /// Add files to an existing bin.
    ///
    /// A file whose name is already present replaces the old one and the
    /// old size no longer counts toward the quota. Nothing is written when
    /// the new total would exceed the quota.
    pub async fn add_files(&self, bin_id: &BinId, files: Vec<UploadFile>) -> Result<AddedFiles> {
        let bin_repo = BinRepository::new(self.db.pool());
        let file_repo = BinFileRepository::new(self.db.pool());

        let bin = bin_repo
            .get_by_id(bin_id)
            .await?
            .ok_or_else(|| SmplbinError::NotFound("bin".to_string()))?;

        if files.is_empty() {
            return Err(SmplbinError::BadInput("no files supplied".to_string()));
        }
        let files = prepare_files(files)?;

        let mut replaced: u64 = 0;
        for (name, _) in &files {
            if let Some(existing) = file_repo.get(bin_id, name).await? {
                replaced += existing.size as u64;
            }
        }
        let incoming: u64 = files.iter().map(|(_, c)| c.len() as u64).sum();
        let new_total = (bin.total_size as u64).saturating_sub(replaced) + incoming;

        if new_total > self.settings.max_bin_size {
            info!(
                "Rejected upload to bin {}: {} bytes exceeds limit of {}",
                bin_id, new_total, self.settings.max_bin_size
            );
            return Err(SmplbinError::QuotaExceeded {
                limit: self.settings.max_bin_size,
                attempted: new_total,
            });
        }

        for (name, content) in &files {
            self.storage.save(bin_id, name, content)?;
        }
        for (name, content) in &files {
            file_repo
                .upsert(&NewBinFile::new(*bin_id, name.as_str(), content.len() as i64))
                .await?;
        }
        bin_repo.set_total_size(bin_id, new_total as i64).await?;

        info!(
            "Added {} file(s) to bin {}, now {} bytes",
            files.len(),
            bin_id,
            new_total
        );

        let bin = bin_repo
            .get_by_id(bin_id)
            .await?
            .ok_or_else(|| SmplbinError::NotFound("bin".to_string()))?;

        Ok(AddedFiles {
            bin,
            filenames: files.into_iter().map(|(name, _)| name).collect(),
        })
    }

    /// Remove one file from a bin.
    ///
    /// When the last file goes, the bin's directory is removed but the bin
    /// itself stays as an empty bin.
    pub async fn remove_file(&self, bin_id: &BinId, filename: &str) -> Result<RemovedFile> {
        let bin_repo = BinRepository::new(self.db.pool());
        let file_repo = BinFileRepository::new(self.db.pool());

        if !bin_repo.exists(bin_id).await? {
            return Err(SmplbinError::NotFound("bin".to_string()));
        }
        let file = file_repo
            .get(bin_id, filename)
            .await?
            .ok_or_else(|| SmplbinError::NotFound(format!("file '{filename}'")))?;

        if !self.storage.delete(bin_id, &file.filename)? {
            debug!("Blob {}/{} was already absent", bin_id, file.filename);
        }
        file_repo.delete(bin_id, &file.filename).await?;
        bin_repo.subtract_size(bin_id, file.size).await?;

        let bin_empty = file_repo.count_by_bin(bin_id).await? == 0;
        if bin_empty {
            self.storage.delete_bin_dir(bin_id)?;
        }

        info!("Removed {} from bin {}", file.filename, bin_id);

        Ok(RemovedFile {
            filename: file.filename,
            size: file.size as u64,
            bin_empty,
        })
    }

    /// Get a bin with its files and expiry.
    pub async fn get_bin(&self, bin_id: &BinId) -> Result<BinSummary> {
        let bin = BinRepository::new(self.db.pool())
            .get_by_id(bin_id)
            .await?
            .ok_or_else(|| SmplbinError::NotFound("bin".to_string()))?;
        let files = BinFileRepository::new(self.db.pool())
            .list_by_bin(bin_id)
            .await?;

        Ok(BinSummary {
            id: bin.id,
            created_at: bin.created_at,
            expires_at: self.settings.expires_at(bin.created_at),
            total_size: bin.total_size.max(0) as u64,
            is_empty: files.is_empty(),
            files,
        })
    }

    /// Read one file of a bin.
    ///
    /// Only files with a metadata record can be downloaded.
    pub async fn download(&self, bin_id: &BinId, filename: &str) -> Result<DownloadResult> {
        if !BinRepository::new(self.db.pool()).exists(bin_id).await? {
            return Err(SmplbinError::NotFound("bin".to_string()));
        }
        let file = BinFileRepository::new(self.db.pool())
            .get(bin_id, filename)
            .await?
            .ok_or_else(|| SmplbinError::NotFound(format!("file '{filename}'")))?;

        let content = self.storage.load(bin_id, &file.filename)?;

        Ok(DownloadResult { file, content })
    }

    /// Delete a bin with all its files.
    pub async fn delete_bin(&self, bin_id: &BinId) -> Result<()> {
        let bin_repo = BinRepository::new(self.db.pool());

        if !bin_repo.exists(bin_id).await? {
            return Err(SmplbinError::NotFound("bin".to_string()));
        }

        self.storage.delete_bin_dir(bin_id)?;
        if !bin_repo.delete(bin_id).await? {
            // Lost a race with the sweep or another delete
            return Err(SmplbinError::NotFound("bin".to_string()));
        }

        info!("Deleted bin {}", bin_id);
        Ok(())
    }

    /// Purge every bin older than the retention window as of `now`.
    ///
    /// Safe to run concurrently with itself: a bin already removed by
    /// another sweep is skipped.
    ///
    /// # Returns
    ///
    /// The number of bins this call deleted.
    pub async fn sweep_expired(&self, now: DateTime<Utc>) -> Result<usize> {
        let bin_repo = BinRepository::new(self.db.pool());
        let cutoff = now - self.settings.retention;
        let expired = bin_repo.list_created_before(&cutoff).await?;

        let mut purged = 0;
        for bin in &expired {
            if let Err(e) = self.storage.delete_bin_dir(&bin.id) {
                warn!("Failed to remove directory of expired bin {}: {}", bin.id, e);
                continue;
            }
            if bin_repo.delete(&bin.id).await? {
                debug!("Purged expired bin {} (created {})", bin.id, bin.created_at);
                purged += 1;
            }
        }

        if purged > 0 {
            info!("Expiry sweep purged {} bin(s)", purged);
        }

        Ok(purged)
    }
}

/// Sanitize names and collapse duplicates within one request.
///
/// A later file with the same sanitized name replaces the earlier one in
/// place.
fn prepare_files(files: Vec<UploadFile>) -> Result<Vec<(String, Vec<u8>)>> {
    let mut prepared: Vec<(String, Vec<u8>)> = Vec::with_capacity(files.len());

    for file in files {
        let name = sanitize_filename(&file.name)?;
        match prepared.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = file.content,
            None => prepared.push((name, file.content)),
        }
    }

    Ok(prepared)
}
