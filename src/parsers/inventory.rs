//! Filename inventory normalizer.
//!
//! Each line names a file, e.g. `lib/libfoo-2.3.1-linux64.so`. Product and
//! version are recovered from the file name: the first `-<digit>...` run is
//! the version and everything before it is the product.

use crate::error::Result;
use crate::model::CanonicalRecord;
use crate::parsers::traits::{RecordCollector, SbomNormalizer};
use indexmap::IndexSet;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"-\d[.\d]*[a-z0-9]*").expect("version pattern is a valid regex")
});

/// Normalizer for directory listings / file inventories
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryInventoryParser;

impl DirectoryInventoryParser {
    pub const fn new() -> Self {
        Self
    }
}

/// Split a path into `(product, version)`.
///
/// The file name is lower-cased and its final extension removed before
/// matching. Returns `None` when no version-like suffix is present.
pub fn split_product_version(line: &str) -> Option<(String, String)> {
    let stem = Path::new(line).file_stem()?.to_string_lossy().to_lowercase();
    let found = VERSION_PATTERN.find(&stem)?;

    let product = stem[..found.start()].trim();
    let version = found.as_str()[1..].trim();
    if product.is_empty() || version.is_empty() {
        return None;
    }
    Some((product.to_string(), version.to_string()))
}

impl SbomNormalizer for DirectoryInventoryParser {
    fn normalize_str(&self, content: &str) -> Result<Vec<CanonicalRecord>> {
        let mut collector = RecordCollector::new();
        let mut seen = IndexSet::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((product, version)) = split_product_version(line) else {
                tracing::debug!("No version in {line}");
                continue;
            };

            let record = CanonicalRecord::product(product, version);
            if seen.insert(record.dedup_key()) {
                collector.offer(record);
            }
        }

        Ok(collector.finish(self.format_name()))
    }

    fn format_name(&self) -> &str {
        "directory inventory"
    }
}
