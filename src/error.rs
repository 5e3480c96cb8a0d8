//! Error types for smplbin.

use thiserror::Error;

/// Common error type for smplbin.
#[derive(Error, Debug)]
pub enum SmplbinError {
    /// Database error.
    ///
    /// Errors from sqlx are converted into this variant.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error from the blob store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Bin or file reference does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// A mutation would push a bin over its size quota.
    #[error("bin size limit exceeded: {attempted} bytes requested, limit is {limit} bytes")]
    QuotaExceeded {
        /// Configured quota in bytes.
        limit: u64,
        /// Size the bin would have reached.
        attempted: u64,
    },

    /// Malformed caller input (empty filename, missing file part).
    #[error("bad input: {0}")]
    BadInput(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for SmplbinError {
    fn from(e: sqlx::Error) -> Self {
        SmplbinError::Database(e.to_string())
    }
}

/// Result type alias for smplbin operations.
pub type Result<T> = std::result::Result<T, SmplbinError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error_display() {
        let err = SmplbinError::NotFound("bin".to_string());
        assert_eq!(err.to_string(), "bin not found");
    }

    #[test]
    fn test_quota_exceeded_display() {
        let err = SmplbinError::QuotaExceeded {
            limit: 5 * 1024 * 1024,
            attempted: 6 * 1024 * 1024,
        };
        assert_eq!(
            err.to_string(),
            "bin size limit exceeded: 6291456 bytes requested, limit is 5242880 bytes"
        );
    }

    #[test]
    fn test_bad_input_display() {
        let err = SmplbinError::BadInput("no file part".to_string());
        assert_eq!(err.to_string(), "bad input: no file part");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: SmplbinError = io_err.into();
        assert!(matches!(err, SmplbinError::Io(_)));
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_sqlx_error_conversion() {
        let err: SmplbinError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, SmplbinError::Database(_)));
    }

    #[test]
    fn test_result_alias() {
        fn sample_ok() -> Result<i32> {
            Ok(42)
        }

        fn sample_err() -> Result<i32> {
            Err(SmplbinError::Config("test".to_string()))
        }

        assert_eq!(sample_ok().unwrap(), 42);
        assert!(sample_err().is_err());
    }
}
