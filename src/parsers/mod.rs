//! SBOM format normalizers.
//!
//! Each supported input format has a normalizer that turns a document into
//! a list of [`CanonicalRecord`]s. Normalizers never touch the store.
//!
//! ## Format selection
//!
//! [`SbomFormat`] enumerates the formats. [`SbomFormat::resolve`] maps a
//! declared type (as given on the command line) plus the document path to a
//! concrete variant, and `auto` falls back to [`detect_format`].
//!
//! ## Usage
//!
//! ```no_run
//! use sbom_manager::parsers::normalize_file;
//! use std::path::Path;
//!
//! let records = normalize_file(Path::new("bom.json"), "cyclonedx").unwrap();
//! for record in &records {
//!     println!("{} {}", record.product, record.version);
//! }
//! ```

mod csv;
mod cyclonedx;
mod detection;
mod format;
mod inventory;
mod spdx;
mod traits;

pub use csv::CsvParser;
pub use cyclonedx::{CycloneDxEncoding, CycloneDxParser};
pub use detection::detect_format;
pub use format::SbomFormat;
pub use inventory::{split_product_version, DirectoryInventoryParser};
pub use spdx::{SpdxEncoding, SpdxParser};
pub use traits::{read_document, SbomNormalizer};

use crate::error::Result;
use crate::model::CanonicalRecord;
use std::path::Path;

/// Resolve the declared type for `path` and normalize the document.
pub fn normalize_file(path: &Path, declared: &str) -> Result<Vec<CanonicalRecord>> {
    SbomFormat::resolve(declared, path)?.normalize(path)
}
