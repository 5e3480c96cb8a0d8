//! Bin records and repository.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use super::BinId;
use crate::datetime::to_db_timestamp;
use crate::{Result, SmplbinError};

/// A bin's metadata record.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Bin {
    /// Bin identifier.
    #[sqlx(try_from = "String")]
    pub id: BinId,
    /// When the bin was created.
    pub created_at: DateTime<Utc>,
    /// Sum of member file sizes in bytes.
    pub total_size: i64,
}

/// Data for creating a new bin record.
#[derive(Debug, Clone)]
pub struct NewBin {
    /// Bin identifier.
    pub id: BinId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Initial total size in bytes.
    pub total_size: i64,
}

impl NewBin {
    /// Create a new NewBin stamped with the current time.
    pub fn new(id: BinId) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            total_size: 0,
        }
    }

    /// Set the creation timestamp.
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Set the initial total size.
    pub fn with_total_size(mut self, total_size: i64) -> Self {
        self.total_size = total_size;
        self
    }
}

/// Repository for bin records.
pub struct BinRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> BinRepository<'a> {
    /// Create a new BinRepository with the given database pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a bin record.
    pub async fn create(&self, bin: &NewBin) -> Result<Bin> {
        sqlx::query("INSERT INTO bins (id, created_at, total_size) VALUES (?, ?, ?)")
            .bind(bin.id.to_string())
            .bind(to_db_timestamp(&bin.created_at))
            .bind(bin.total_size)
            .execute(self.pool)
            .await
            .map_err(|e| SmplbinError::Database(e.to_string()))?;

        self.get_by_id(&bin.id)
            .await?
            .ok_or_else(|| SmplbinError::Database("failed to retrieve created bin".to_string()))
    }

    /// Get a bin by id.
    pub async fn get_by_id(&self, id: &BinId) -> Result<Option<Bin>> {
        let bin = sqlx::query_as::<_, Bin>(
            "SELECT id, created_at, total_size FROM bins WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(self.pool)
        .await
        .map_err(|e| SmplbinError::Database(e.to_string()))?;

        Ok(bin)
    }

    /// Check whether a bin exists.
    pub async fn exists(&self, id: &BinId) -> Result<bool> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM bins WHERE id = ?")
            .bind(id.to_string())
            .fetch_one(self.pool)
            .await
            .map_err(|e| SmplbinError::Database(e.to_string()))?;

        Ok(count.0 > 0)
    }

    /// Overwrite a bin's total size.
    pub async fn set_total_size(&self, id: &BinId, total_size: i64) -> Result<bool> {
        let result = sqlx::query("UPDATE bins SET total_size = ? WHERE id = ?")
            .bind(total_size)
            .bind(id.to_string())
            .execute(self.pool)
            .await
            .map_err(|e| SmplbinError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    /// Decrease a bin's total size, clamping at zero.
    pub async fn subtract_size(&self, id: &BinId, size: i64) -> Result<bool> {
        let result =
            sqlx::query("UPDATE bins SET total_size = MAX(total_size - ?, 0) WHERE id = ?")
                .bind(size)
                .bind(id.to_string())
                .execute(self.pool)
                .await
                .map_err(|e| SmplbinError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a bin record. Its file records go with it.
    ///
    /// # Returns
    ///
    /// `true` if a row was deleted, `false` if the bin was already gone
    pub async fn delete(&self, id: &BinId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM bins WHERE id = ?")
            .bind(id.to_string())
            .execute(self.pool)
            .await
            .map_err(|e| SmplbinError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    /// List all bins, oldest first.
    pub async fn list_all(&self) -> Result<Vec<Bin>> {
        let bins = sqlx::query_as::<_, Bin>(
            "SELECT id, created_at, total_size FROM bins ORDER BY created_at, id",
        )
        .fetch_all(self.pool)
        .await
        .map_err(|e| SmplbinError::Database(e.to_string()))?;

        Ok(bins)
    }

    /// List bins created strictly before `cutoff`, oldest first.
    pub async fn list_created_before(&self, cutoff: &DateTime<Utc>) -> Result<Vec<Bin>> {
        let bins = sqlx::query_as::<_, Bin>(
            "SELECT id, created_at, total_size FROM bins
             WHERE created_at < ? ORDER BY created_at, id",
        )
        .bind(to_db_timestamp(cutoff))
        .fetch_all(self.pool)
        .await
        .map_err(|e| SmplbinError::Database(e.to_string()))?;

        Ok(bins)
    }

    /// Count all bins.
    pub async fn count(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM bins")
            .fetch_one(self.pool)
            .await
            .map_err(|e| SmplbinError::Database(e.to_string()))?;

        Ok(count.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use chrono::{Duration, TimeZone};

    async fn setup_db() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    #[tokio::test]
    async fn test_create_bin() {
        let db = setup_db().await;
        let repo = BinRepository::new(db.pool());
        let created_at = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        let id = BinId::generate();

        let bin = repo
            .create(
                &NewBin::new(id)
                    .with_created_at(created_at)
                    .with_total_size(42),
            )
            .await
            .unwrap();

        assert_eq!(bin.id, id);
        assert_eq!(bin.created_at, created_at);
        assert_eq!(bin.total_size, 42);
    }

    #[tokio::test]
    async fn test_get_bin_not_found() {
        let db = setup_db().await;
        let repo = BinRepository::new(db.pool());

        assert!(repo.get_by_id(&BinId::generate()).await.unwrap().is_none());
        assert!(!repo.exists(&BinId::generate()).await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let db = setup_db().await;
        let repo = BinRepository::new(db.pool());
        let id = BinId::generate();

        repo.create(&NewBin::new(id)).await.unwrap();
        let result = repo.create(&NewBin::new(id)).await;
        assert!(matches!(result, Err(SmplbinError::Database(_))));
    }

    #[tokio::test]
    async fn test_set_and_subtract_size() {
        let db = setup_db().await;
        let repo = BinRepository::new(db.pool());
        let id = BinId::generate();
        repo.create(&NewBin::new(id)).await.unwrap();

        assert!(repo.set_total_size(&id, 100).await.unwrap());
        assert!(repo.subtract_size(&id, 30).await.unwrap());
        assert_eq!(repo.get_by_id(&id).await.unwrap().unwrap().total_size, 70);

        // Never goes below zero
        repo.subtract_size(&id, 500).await.unwrap();
        assert_eq!(repo.get_by_id(&id).await.unwrap().unwrap().total_size, 0);

        assert!(!repo.set_total_size(&BinId::generate(), 1).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_bin() {
        let db = setup_db().await;
        let repo = BinRepository::new(db.pool());
        let id = BinId::generate();
        repo.create(&NewBin::new(id)).await.unwrap();

        assert!(repo.delete(&id).await.unwrap());
        assert!(!repo.delete(&id).await.unwrap());
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_created_before() {
        let db = setup_db().await;
        let repo = BinRepository::new(db.pool());
        let base = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();

        let old = BinId::generate();
        let recent = BinId::generate();
        repo.create(&NewBin::new(old).with_created_at(base))
            .await
            .unwrap();
        repo.create(&NewBin::new(recent).with_created_at(base + Duration::days(2)))
            .await
            .unwrap();

        let expired = repo
            .list_created_before(&(base + Duration::days(1)))
            .await
            .unwrap();
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].id, old);

        // Strictly before
        let none = repo.list_created_before(&base).await.unwrap();
        assert!(none.is_empty());

        let all = repo.list_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, old);
        assert_eq!(all[1].id, recent);
    }
}
