//! Versioned, project-scoped SBOM store.
//!
//! Records live in a single SQLite file (`<location>/sbom.db`). Each ingest
//! gets the next `file_version` for its project; nothing is ever updated in
//! place except the record count written right after the rows.
//!
//! A connection is opened for each operation and closed when it returns, so
//! the database file can be copied between operations.
//!
//! ## Usage
//!
//! ```no_run
//! use sbom_manager::model::CanonicalRecord;
//! use sbom_manager::store::{ListScope, SbomStore};
//!
//! let store = SbomStore::new("/tmp/sbom-store");
//! store.initialise().unwrap();
//! let records = vec![CanonicalRecord::product("zlib", "1.3")];
//! let version = store
//!     .add_file("bom.csv", "nightly", "router", "csv", &records)
//!     .unwrap();
//! assert_eq!(version, 1);
//! let latest = store.list_entries(ListScope::All, "router", false, None).unwrap();
//! assert_eq!(latest.len(), 1);
//! ```

mod files;
pub(crate) mod query;
mod schema;

pub use files::{validate_project, FileStore};
pub use schema::DB_FILENAME;

use crate::audit::{AuditSink, TracingAuditSink};
use crate::error::{Result, SbomManagerError};
use crate::model::{AuditEntry, CanonicalRecord, Entries, EntryRow, ModuleRow, SbomFile};
use chrono::Utc;
use clap::ValueEnum;
use query::{order, shape, QueryBuilder};
use rusqlite::{params, params_from_iter, Connection, OpenFlags, Row, TransactionBehavior};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// A file no larger than one SQLite page holds no schema.
pub const MIN_STORE_SIZE: u64 = 4096;

/// How long a writer waits for a competing lock before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Row shape requested from [`SbomStore::list_entries`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ListScope {
    /// File header joined with each of its records
    #[default]
    All,
    /// One row per ingested document
    Sbom,
    /// One row per stored record
    Module,
}

/// The versioned record store.
#[derive(Clone)]
pub struct SbomStore {
    location: PathBuf,
    db_path: PathBuf,
    audit: Arc<dyn AuditSink>,
}

impl std::fmt::Debug for SbomStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SbomStore")
            .field("location", &self.location)
            .field("db_path", &self.db_path)
            .finish_non_exhaustive()
    }
}

impl SbomStore {
    /// Store rooted at `location`, auditing through `tracing`.
    pub fn new(location: impl Into<PathBuf>) -> Self {
        Self::with_audit_sink(location, Arc::new(TracingAuditSink))
    }

    /// Store rooted at `location` with a caller-supplied audit sink.
    pub fn with_audit_sink(location: impl Into<PathBuf>, audit: Arc<dyn AuditSink>) -> Self {
        let location = location.into();
        let db_path = location.join(DB_FILENAME);
        tracing::debug!("Database location {}", db_path.display());
        Self {
            location,
            db_path,
            audit,
        }
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Blob store sharing this store's location.
    pub fn file_store(&self) -> FileStore {
        FileStore::new(&self.location)
    }

    // ========================================================================
    // Connection handling
    // ========================================================================

    fn open(&self) -> Result<Connection> {
        let conn = Connection::open(&self.db_path)
            .map_err(|e| SbomManagerError::storage(&self.db_path, e))?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.pragma_update(None, "foreign_keys", true)?;
        Ok(conn)
    }

    /// Open an existing, initialised store.
    fn connect(&self) -> Result<Connection> {
        if !self.check_exists() {
            return Err(SbomManagerError::StoreNotInitialised);
        }
        self.open()
    }

    /// Persist an audit entry. The sink is notified separately by the
    /// caller once the surrounding work is committed.
    fn insert_audit(conn: &Connection, entry: &AuditEntry) -> Result<()> {
        conn.execute(
            "INSERT INTO audit (timestamp, command) VALUES (?1, ?2)",
            params![entry.timestamp, entry.command],
        )?;
        Ok(())
    }

    fn log_audit(&self, conn: &Connection, command: &str) -> Result<()> {
        let entry = AuditEntry::now(command);
        Self::insert_audit(conn, &entry)?;
        self.audit.record(&entry);
        Ok(())
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Drop and recreate every table. All history is lost.
    pub fn initialise(&self) -> Result<()> {
        if !self.location.is_dir() {
            fs::create_dir_all(&self.location)
                .map_err(|e| SbomManagerError::storage(&self.location, e))?;
        }

        let conn = self.open()?;
        conn.execute_batch(schema::RESET_SCHEMA)?;
        tracing::info!("Initialised SBOM store at {}", self.db_path.display());
        self.log_audit(&conn, "initialise")
    }

    /// Whether an initialised store file is present.
    pub fn check_exists(&self) -> bool {
        fs::metadata(&self.db_path)
            .map(|meta| meta.is_file() && meta.len() > MIN_STORE_SIZE)
            .unwrap_or(false)
    }

    /// Ingest one document's records as the next version of `project`.
    ///
    /// The header, every record and the audit entry are written in a single
    /// IMMEDIATE transaction, so the version count and the insert cannot
    /// interleave with another writer.
    pub fn add_file(
        &self,
        filename: &str,
        description: &str,
        project: &str,
        sbom_type: &str,
        records: &[CanonicalRecord],
    ) -> Result<u32> {
        validate_project(project)?;
        let mut conn = self.connect()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let prior: u32 = tx.query_row(
            "SELECT COUNT(*) FROM sbom_file WHERE project = ?1",
            params![project],
            |row| row.get(0),
        )?;
        let file_version = prior + 1;

        tx.execute(
            "INSERT INTO sbom_file (filename, project, description, sbom_type, file_version, record_count, added_at)
             VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6)",
            params![filename, project, description, sbom_type, file_version, Utc::now()],
        )?;
        let file_id = tx.last_insert_rowid();

        let mut inserted: u32 = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO sbom_data (file_id, vendor, product, version, license)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for record in records {
                let record = record.canonicalize();
                stmt.execute(params![
                    file_id,
                    record.vendor,
                    record.product,
                    record.version,
                    record.license
                ])?;
                inserted += 1;
            }
        }

        tx.execute(
            "UPDATE sbom_file SET record_count = ?1 WHERE id = ?2",
            params![inserted, file_id],
        )?;

        let entry = AuditEntry::now("add");
        Self::insert_audit(&tx, &entry)?;
        tx.commit()?;
        self.audit.record(&entry);

        tracing::info!(
            "Added {filename} to {project} as version {file_version} ({inserted} records)"
        );
        Ok(file_version)
    }

    /// Records whose product contains `module`, case-insensitively.
    ///
    /// Without `include_history` only each project's latest version is
    /// searched. An empty `project` searches every project.
    pub fn find_module(
        &self,
        module: &str,
        project: &str,
        include_history: bool,
    ) -> Result<Vec<ModuleRow>> {
        let conn = self.connect()?;
        let query = QueryBuilder::new(shape::MODULE)
            .search(module)
            .project(project)
            .latest_only(!include_history)
            .order_by(order::BY_PRODUCT);
        let rows = Self::select(&conn, &query, module_row)?;

        tracing::debug!("find {module}: {} row(s)", rows.len());
        self.log_audit(&conn, "find")?;
        Ok(rows)
    }

    /// List stored entries.
    ///
    /// `version` selects exactly that `file_version`. Otherwise only the
    /// latest version of each project is listed unless `include_history`.
    pub fn list_entries(
        &self,
        scope: ListScope,
        project: &str,
        include_history: bool,
        version: Option<u32>,
    ) -> Result<Entries> {
        let conn = self.connect()?;
        let latest_only = !include_history && version.is_none();

        let entries = match scope {
            ListScope::Sbom => {
                let query = QueryBuilder::new(shape::SBOM)
                    .project(project)
                    .version(version)
                    .latest_only(latest_only)
                    .order_by(order::BY_PROJECT);
                Entries::Sbom(Self::select(&conn, &query, sbom_file)?)
            }
            ListScope::Module => {
                let query = QueryBuilder::new(shape::MODULE)
                    .project(project)
                    .version(version)
                    .latest_only(latest_only)
                    .order_by(order::BY_PRODUCT);
                Entries::Module(Self::select(&conn, &query, module_row)?)
            }
            ListScope::All => {
                let query = QueryBuilder::new(shape::ALL)
                    .project(project)
                    .version(version)
                    .latest_only(latest_only)
                    .order_by(order::BY_PROJECT_THEN_ROW);
                Entries::All(Self::select(&conn, &query, entry_row)?)
            }
        };

        self.log_audit(&conn, "list")?;
        Ok(entries)
    }

    /// Copy the whole store file to (`export`) or from `filename`.
    ///
    /// An imported file must already contain the store tables; it replaces
    /// the current store entirely. `filename` must not be the store file.
    pub fn copy(&self, filename: &Path, export: bool) -> Result<()> {
        if same_file(filename, &self.db_path) {
            return Err(SbomManagerError::storage(
                filename,
                "source and destination are the same store file",
            ));
        }

        if export {
            if !self.check_exists() {
                return Err(SbomManagerError::StoreNotInitialised);
            }
            fs::copy(&self.db_path, filename).map_err(|e| SbomManagerError::io(filename, e))?;
            tracing::info!("Exported store to {}", filename.display());

            let conn = self.open()?;
            self.log_audit(&conn, "Export database")
        } else {
            verify_store_file(filename)?;
            if !self.location.is_dir() {
                fs::create_dir_all(&self.location)
                    .map_err(|e| SbomManagerError::storage(&self.location, e))?;
            }
            fs::copy(filename, &self.db_path).map_err(|e| SbomManagerError::io(filename, e))?;
            tracing::info!("Imported store from {}", filename.display());

            let conn = self.open()?;
            self.log_audit(&conn, "Import database")
        }
    }

    /// The audit trail, oldest first. Reading it is itself audited.
    pub fn audit_entries(&self) -> Result<Vec<AuditEntry>> {
        let conn = self.connect()?;
        let entries = {
            let mut stmt = conn.prepare("SELECT timestamp, command FROM audit ORDER BY id ASC")?;
            let rows = stmt.query_map([], |row| {
                Ok(AuditEntry {
                    timestamp: row.get(0)?,
                    command: row.get(1)?,
                })
            })?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        };
        self.log_audit(&conn, "audit")?;
        Ok(entries)
    }

    fn select<T>(
        conn: &Connection,
        query: &QueryBuilder,
        map: fn(&Row<'_>) -> rusqlite::Result<T>,
    ) -> Result<Vec<T>> {
        let (sql, params) = query.build();
        tracing::trace!("{sql}");
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(params.iter()), map)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}

/// Whether both paths resolve to the same existing file.
fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Reject files that are not a store before they overwrite one.
fn verify_store_file(path: &Path) -> Result<()> {
    let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
        .map_err(|e| SbomManagerError::storage(path, e))?;

    for table in schema::REQUIRED_TABLES {
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                params![table],
                |row| row.get(0),
            )
            .map_err(|e| SbomManagerError::storage(path, e))?;
        if count == 0 {
            return Err(SbomManagerError::storage(
                path,
                format!("not an SBOM store (missing table {table})"),
            ));
        }
    }
    Ok(())
}

// ============================================================================
// Row mapping
// ============================================================================

fn sbom_file(row: &Row<'_>) -> rusqlite::Result<SbomFile> {
    Ok(SbomFile {
        id: row.get(0)?,
        filename: row.get(1)?,
        project: row.get(2)?,
        description: row.get(3)?,
        sbom_type: row.get(4)?,
        file_version: row.get(5)?,
        record_count: row.get(6)?,
        added_at: row.get(7)?,
    })
}

fn module_row(row: &Row<'_>) -> rusqlite::Result<ModuleRow> {
    Ok(ModuleRow {
        project: row.get(0)?,
        file_version: row.get(1)?,
        vendor: row.get(2)?,
        product: row.get(3)?,
        version: row.get(4)?,
        license: row.get(5)?,
    })
}

fn entry_row(row: &Row<'_>) -> rusqlite::Result<EntryRow> {
    Ok(EntryRow {
        filename: row.get(0)?,
        project: row.get(1)?,
        description: row.get(2)?,
        file_version: row.get(3)?,
        vendor: row.get(4)?,
        product: row.get(5)?,
        version: row.get(6)?,
        license: row.get(7)?,
    })
}
