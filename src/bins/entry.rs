//! File records within a bin and their repository.

use sqlx::SqlitePool;

use super::BinId;
use crate::{Result, SmplbinError};

/// A file stored in a bin.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct BinFile {
    /// Row ID.
    pub id: i64,
    /// Owning bin.
    #[sqlx(try_from = "String")]
    pub bin_id: BinId,
    /// Sanitized filename, unique within the bin.
    pub filename: String,
    /// Size in bytes at upload time.
    pub size: i64,
}

/// Data for recording a file in a bin.
#[derive(Debug, Clone)]
pub struct NewBinFile {
    /// Owning bin.
    pub bin_id: BinId,
    /// Sanitized filename.
    pub filename: String,
    /// Size in bytes.
    pub size: i64,
}

impl NewBinFile {
    /// Create a new NewBinFile.
    pub fn new(bin_id: BinId, filename: impl Into<String>, size: i64) -> Self {
        Self {
            bin_id,
            filename: filename.into(),
            size,
        }
    }
}

/// Repository for file records.
pub struct BinFileRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> BinFileRepository<'a> {
    /// Create a new BinFileRepository with the given database pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Record a file, replacing the size of an existing same-named file.
    pub async fn upsert(&self, file: &NewBinFile) -> Result<BinFile> {
        sqlx::query(
            "INSERT INTO files (bin_id, filename, size) VALUES (?, ?, ?)
             ON CONFLICT(bin_id, filename) DO UPDATE SET size = excluded.size",
        )
        .bind(file.bin_id.to_string())
        .bind(&file.filename)
        .bind(file.size)
        .execute(self.pool)
        .await
        .map_err(|e| SmplbinError::Database(e.to_string()))?;

        self.get(&file.bin_id, &file.filename)
            .await?
            .ok_or_else(|| SmplbinError::Database("failed to retrieve stored file".to_string()))
    }

    /// Get a file record by bin and name.
    pub async fn get(&self, bin_id: &BinId, filename: &str) -> Result<Option<BinFile>> {
        let file = sqlx::query_as::<_, BinFile>(
            "SELECT id, bin_id, filename, size FROM files WHERE bin_id = ? AND filename = ?",
        )
        .bind(bin_id.to_string())
        .bind(filename)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| SmplbinError::Database(e.to_string()))?;

        Ok(file)
    }

    /// List a bin's files in upload order.
    pub async fn list_by_bin(&self, bin_id: &BinId) -> Result<Vec<BinFile>> {
        let files = sqlx::query_as::<_, BinFile>(
            "SELECT id, bin_id, filename, size FROM files WHERE bin_id = ? ORDER BY id",
        )
        .bind(bin_id.to_string())
        .fetch_all(self.pool)
        .await
        .map_err(|e| SmplbinError::Database(e.to_string()))?;

        Ok(files)
    }

    /// Count a bin's files.
    pub async fn count_by_bin(&self, bin_id: &BinId) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM files WHERE bin_id = ?")
            .bind(bin_id.to_string())
            .fetch_one(self.pool)
            .await
            .map_err(|e| SmplbinError::Database(e.to_string()))?;

        Ok(count.0)
    }

    /// Sum of a bin's file sizes.
    pub async fn sum_size_by_bin(&self, bin_id: &BinId) -> Result<i64> {
        let sum: (i64,) =
            sqlx::query_as("SELECT COALESCE(SUM(size), 0) FROM files WHERE bin_id = ?")
                .bind(bin_id.to_string())
                .fetch_one(self.pool)
                .await
                .map_err(|e| SmplbinError::Database(e.to_string()))?;

        Ok(sum.0)
    }

    /// Delete a file record.
    pub async fn delete(&self, bin_id: &BinId, filename: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM files WHERE bin_id = ? AND filename = ?")
            .bind(bin_id.to_string())
            .bind(filename)
            .execute(self.pool)
            .await
            .map_err(|e| SmplbinError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}
