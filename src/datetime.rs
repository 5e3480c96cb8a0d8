//! Date/time utilities for smplbin.

use chrono::{DateTime, SecondsFormat, Utc};

/// Format used for timestamps stored in the database.
///
/// Fixed width with microsecond precision, so string comparison in SQL
/// orders the same way as the timestamps themselves.
const DB_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// Format a timestamp for storage in a TEXT column.
pub fn to_db_timestamp(dt: &DateTime<Utc>) -> String {
    dt.format(DB_TIMESTAMP_FORMAT).to_string()
}

/// Format a timestamp as RFC3339 with second precision for API responses.
///
/// # Returns
///
/// RFC3339 formatted string (e.g., "2024-01-15T10:30:00Z")
pub fn to_rfc3339(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}
