//! SQL schema for the SBOM store.
//!
//! `initialise` executes [`RESET_SCHEMA`] on every call, so any existing
//! history is discarded.

/// Name of the database file inside the store location.
pub const DB_FILENAME: &str = "sbom.db";

/// Tables that must exist for a file to be accepted as a store.
pub const REQUIRED_TABLES: [&str; 3] = ["sbom_file", "sbom_data", "audit"];

/// Drop and recreate every table.
pub const RESET_SCHEMA: &str = "
PRAGMA foreign_keys = ON;

DROP TABLE IF EXISTS sbom_data;
DROP TABLE IF EXISTS sbom_file;
DROP TABLE IF EXISTS audit;

-- One row per ingested document. file_version counts per project from 1.
CREATE TABLE sbom_file (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    filename      TEXT NOT NULL,
    project       TEXT NOT NULL,
    description   TEXT NOT NULL,
    sbom_type     TEXT NOT NULL,
    file_version  INTEGER NOT NULL CHECK (file_version > 0),
    record_count  INTEGER NOT NULL DEFAULT 0,
    added_at      TEXT NOT NULL
);

CREATE UNIQUE INDEX sbom_file_project_version_idx ON sbom_file(project, file_version);

-- vendor, product and version are stored lower-cased.
CREATE TABLE sbom_data (
    id       INTEGER PRIMARY KEY AUTOINCREMENT,
    file_id  INTEGER NOT NULL REFERENCES sbom_file(id) ON DELETE CASCADE,
    vendor   TEXT NOT NULL,
    product  TEXT NOT NULL,
    version  TEXT NOT NULL,
    license  TEXT NOT NULL
);

CREATE INDEX sbom_data_file_idx    ON sbom_data(file_id);
CREATE INDEX sbom_data_product_idx ON sbom_data(product);

-- Append-only. No UPDATE or DELETE is ever issued against this table.
CREATE TABLE audit (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    timestamp  TEXT NOT NULL,
    command    TEXT NOT NULL
);
";
