//! Response DTOs for the web API.

use serde::Serialize;
use utoipa::ToSchema;

use crate::bins::{BinFile, BinSummary};
use crate::datetime::to_rfc3339;

/// Response for a newly created bin.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreateBinResponse {
    /// Always true.
    pub success: bool,
    /// Identifier of the new bin.
    pub file_id: String,
    /// Human-readable message.
    pub message: String,
}

/// Response for files added to a bin.
#[derive(Debug, Serialize, ToSchema)]
pub struct AddFilesResponse {
    /// Always true.
    pub success: bool,
    /// Bin identifier.
    pub file_id: String,
    /// Stored (sanitized) names of the added files.
    pub filenames: Vec<String>,
    /// Human-readable message.
    pub message: String,
}

/// A file within a bin.
#[derive(Debug, Serialize, ToSchema)]
pub struct BinFileResponse {
    /// Stored filename.
    pub filename: String,
    /// Size in bytes.
    pub size: i64,
}

impl From<&BinFile> for BinFileResponse {
    fn from(file: &BinFile) -> Self {
        Self {
            filename: file.filename.clone(),
            size: file.size,
        }
    }
}

/// Bin information.
#[derive(Debug, Serialize, ToSchema)]
pub struct BinInfoResponse {
    /// Bin identifier.
    pub file_id: String,
    /// Filenames in upload order.
    pub filenames: Vec<String>,
    /// Files with their sizes.
    pub files: Vec<BinFileResponse>,
    /// Creation time (RFC3339).
    pub upload_date: String,
    /// Expiry time (RFC3339).
    pub expiry_date: String,
    /// Sum of file sizes in bytes.
    pub total_size: u64,
    /// Whether the bin holds no files.
    pub is_empty: bool,
}

impl From<&BinSummary> for BinInfoResponse {
    fn from(summary: &BinSummary) -> Self {
        Self {
            file_id: summary.id.to_string(),
            filenames: summary.files.iter().map(|f| f.filename.clone()).collect(),
            files: summary.files.iter().map(BinFileResponse::from).collect(),
            upload_date: to_rfc3339(&summary.created_at),
            expiry_date: to_rfc3339(&summary.expires_at),
            total_size: summary.total_size,
            is_empty: summary.is_empty,
        }
    }
}

/// Response for a deleted file.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteFileResponse {
    /// Always true.
    pub success: bool,
    /// Human-readable message.
    pub message: String,
    /// Whether the bin is now empty.
    pub is_empty: bool,
}

/// Response for a deleted bin.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteBinResponse {
    /// Always true.
    pub success: bool,
    /// Human-readable message.
    pub message: String,
}

/// Service information shown on the landing route.
#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceInfoResponse {
    /// Service name.
    pub name: String,
    /// Crate version.
    pub version: String,
    /// Maximum cumulative bin size in bytes.
    pub max_bin_size: u64,
    /// Retention window in days.
    pub retention_days: i64,
    /// Bins purged by the sweep run for this request.
    pub purged: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bins::BinId;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn test_bin_info_from_summary() {
        let id = BinId::generate();
        let created = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        let summary = BinSummary {
            id,
            created_at: created,
            expires_at: created + Duration::days(3),
            total_size: 7,
            files: vec![
                BinFile {
                    id: 1,
                    bin_id: id,
                    filename: "a.txt".to_string(),
                    size: 3,
                },
                BinFile {
                    id: 2,
                    bin_id: id,
                    filename: "b.txt".to_string(),
                    size: 4,
                },
            ],
            is_empty: false,
        };

        let response = BinInfoResponse::from(&summary);
        assert_eq!(response.file_id, id.to_string());
        assert_eq!(response.filenames, vec!["a.txt", "b.txt"]);
        assert_eq!(response.files[1].size, 4);
        assert_eq!(response.upload_date, "2024-01-15T10:30:00Z");
        assert_eq!(response.expiry_date, "2024-01-18T10:30:00Z");
        assert!(!response.is_empty);
    }

    #[test]
    fn test_create_bin_response_serialization() {
        let response = CreateBinResponse {
            success: true,
            file_id: "abc".to_string(),
            message: "Bin created successfully".to_string(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["file_id"], "abc");
    }
}
