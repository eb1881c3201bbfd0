//! **A versioned, project-scoped store for Software Bills of Materials.**
//!
//! `sbom-manager` ingests SBOM documents in several formats, reduces every
//! component to a [`CanonicalRecord`] and stores the records as numbered
//! versions of a named project. Queries see only the latest version of each
//! project unless history is requested.
//!
//! ## Supported inputs
//!
//! - **SPDX** tag-value and JSON
//! - **CycloneDX** XML and JSON
//! - **CSV** with `vendor,product,version` lines
//! - **File inventories**: one `name-version...` file name per line
//!
//! ## Core Concepts & Modules
//!
//! - **[`parsers`]**: format normalizers and [`SbomFormat`] dispatch, including
//!   content sniffing for the `auto` type.
//! - **[`store`]**: the SQLite-backed [`SbomStore`] with its audit trail, and the
//!   [`FileStore`](store::FileStore) that keeps copies of ingested documents.
//! - **[`generate`]**: SPDX tag-value export of a stored project.
//! - **[`reports`]**: console and CSV rendering of query results.
//! - **[`scan`]**: runs an external vulnerability scanner over stored documents.
//!
//! ## Getting Started
//!
//! ```no_run
//! use sbom_manager::{normalize_file, SbomStore};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = SbomStore::new("/var/lib/sbom-manager");
//!     store.initialise()?;
//!
//!     let path = Path::new("firmware.spdx");
//!     let records = normalize_file(path, "auto")?;
//!     let version = store.add_file("firmware.spdx", "nightly", "router", "spdx", &records)?;
//!     println!("stored {} records as version {version}", records.len());
//!
//!     for row in store.find_module("openssl", "", false)? {
//!         println!("{} v{}: {} {}", row.project, row.file_version, row.product, row.version);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Command-Line Interface (CLI)
//!
//! The `sbom-manager` binary wraps these operations; see `sbom-manager --help`.

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

pub mod audit;
pub mod cli;
pub mod config;
pub mod error;
pub mod generate;
pub mod model;
pub mod parsers;
pub mod reports;
pub mod scan;
pub mod store;

// Re-export main types for convenience
pub use audit::{AuditSink, MemoryAuditSink, TracingAuditSink};
pub use config::{AppConfig, ConfigError, Validatable};
pub use error::{ErrorContext, OptionContext, Result, SbomManagerError};
pub use generate::SpdxTagGenerator;
pub use model::{AuditEntry, CanonicalRecord, Entries, EntryRow, ModuleRow, SbomFile};
pub use parsers::{detect_format, normalize_file, SbomFormat, SbomNormalizer};
pub use reports::{OutputFormat, ReportGenerator};
pub use scan::Scanner;
pub use store::{ListScope, SbomStore};
