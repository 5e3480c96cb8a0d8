//! Database schema and migrations for smplbin.
//!
//! Migrations are applied sequentially when the database is first opened
//! or upgraded.

/// Database migrations.
///
/// Each migration is a SQL script that will be executed in order.
/// The schema_version table tracks which migrations have been applied.
pub const MIGRATIONS: &[&str] = &[
    // v1: Bins and their files
    r#"
-- One row per bin; the id doubles as the upload directory name
CREATE TABLE bins (
    id          TEXT PRIMARY KEY,             -- UUID v4, canonical form
    created_at  TEXT NOT NULL,                -- fixed-width UTC timestamp
    total_size  INTEGER NOT NULL DEFAULT 0    -- sum of member file sizes in bytes
);

CREATE INDEX idx_bins_created_at ON bins(created_at);

-- One row per file stored in a bin
CREATE TABLE files (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    bin_id      TEXT NOT NULL REFERENCES bins(id) ON DELETE CASCADE,
    filename    TEXT NOT NULL,                -- sanitized name, blob path segment
    size        INTEGER NOT NULL,
    UNIQUE(bin_id, filename)
);

CREATE INDEX idx_files_bin_id ON files(bin_id);
"#,
];
