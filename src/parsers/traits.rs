//! Normalizer trait and shared helpers.
//!
//! A normalizer turns one document into canonical records without touching
//! the store. Document-level failures are returned; a bad individual record
//! is logged and dropped so the rest of the document still ingests.

use crate::error::{ParseErrorKind, Result, SbomManagerError};
use crate::model::CanonicalRecord;
use std::path::Path;

/// Trait implemented by every format-specific normalizer.
pub trait SbomNormalizer {
    /// Normalize a document from a file path.
    fn normalize(&self, path: &Path) -> Result<Vec<CanonicalRecord>> {
        let content = read_document(path)?;
        self.normalize_str(&content)
    }

    /// Normalize a document already held in memory.
    fn normalize_str(&self, content: &str) -> Result<Vec<CanonicalRecord>>;

    /// Human-readable format name, used in log lines.
    fn format_name(&self) -> &str;
}

/// Read a document, mapping any open/read failure to `UnreadableDocument`.
///
/// Invalid UTF-8 sequences are replaced rather than rejected; the
/// normalizers only look at ASCII structure.
pub fn read_document(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| SbomManagerError::unreadable(path, e))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Collects records, dropping the incomplete ones.
///
/// `index` counts every candidate so skipped records can be located in the
/// source document.
#[derive(Debug, Default)]
pub(crate) struct RecordCollector {
    records: Vec<CanonicalRecord>,
    index: usize,
    skipped: usize,
}

impl RecordCollector {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Offer a candidate record.
    pub(crate) fn offer(&mut self, record: CanonicalRecord) {
        if record.is_complete() {
            tracing::debug!("Add {} {}", record.product, record.version);
            self.records.push(record);
            self.index += 1;
        } else {
            self.skip(format!(
                "missing product or version (product={:?}, version={:?})",
                record.product, record.version
            ));
        }
    }

    /// Record that a candidate could not be used at all.
    pub(crate) fn skip(&mut self, reason: impl Into<String>) {
        let err = ParseErrorKind::MalformedRecord {
            index: self.index,
            reason: reason.into(),
        };
        tracing::debug!("Skipping {err}");
        self.index += 1;
        self.skipped += 1;
    }

    pub(crate) fn finish(self, format_name: &str) -> Vec<CanonicalRecord> {
        if self.skipped > 0 {
            tracing::warn!(
                skipped = self.skipped,
                "{format_name}: skipped {} malformed record(s)",
                self.skipped
            );
        }
        self.records
    }
}
