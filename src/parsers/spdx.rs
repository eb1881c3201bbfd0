//! SPDX normalizer.
//!
//! Handles the tag-value and JSON encodings. Only package name, version and
//! concluded license are extracted.

use crate::error::Result;
use crate::model::CanonicalRecord;
use crate::parsers::traits::{RecordCollector, SbomNormalizer};
use serde::Deserialize;

/// SPDX document encodings understood by [`SpdxParser`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpdxEncoding {
    TagValue,
    Json,
}

/// Normalizer for SPDX documents
#[derive(Debug, Clone, Copy)]
pub struct SpdxParser {
    encoding: SpdxEncoding,
}

impl SpdxParser {
    /// Parser for `Tag: value` documents
    pub const fn tag_value() -> Self {
        Self {
            encoding: SpdxEncoding::TagValue,
        }
    }

    /// Parser for SPDX JSON documents
    pub const fn json() -> Self {
        Self {
            encoding: SpdxEncoding::Json,
        }
    }

    pub const fn encoding(&self) -> SpdxEncoding {
        self.encoding
    }

    /// Parse tag-value format.
    ///
    /// A record starts at each `PackageName` tag. The record in progress is
    /// emitted when the next `PackageName` appears and once more at end of
    /// input, so a trailing blank line is not required.
    fn parse_tag_value(&self, content: &str) -> Vec<CanonicalRecord> {
        let mut collector = RecordCollector::new();
        let mut current_package: Option<CanonicalRecord> = None;

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();

            match key.trim() {
                "PackageName" => {
                    if let Some(pkg) = current_package.take() {
                        collector.offer(pkg);
                    }
                    current_package = Some(CanonicalRecord::product(value, ""));
                }
                "PackageVersion" => {
                    if let Some(ref mut pkg) = current_package {
                        pkg.version = strip_version_suffix(value).to_string();
                    }
                }
                "PackageLicenseConcluded" => {
                    if let Some(ref mut pkg) = current_package {
                        pkg.license = value.to_string();
                    }
                }
                _ => {}
            }
        }

        // Don't forget the last package
        if let Some(pkg) = current_package {
            collector.offer(pkg);
        }

        collector.finish(self.format_name())
    }

    /// Parse SPDX JSON format.
    ///
    /// Packages are decoded one at a time so a single bad entry does not
    /// reject the whole document.
    fn parse_json(&self, content: &str) -> Result<Vec<CanonicalRecord>> {
        let doc: SpdxJsonDocument = serde_json::from_str(content)?;
        let mut collector = RecordCollector::new();

        for value in doc.packages.unwrap_or_default() {
            match serde_json::from_value::<SpdxJsonPackage>(value) {
                Ok(pkg) => collector.offer(CanonicalRecord::new(
                    String::new(),
                    pkg.name.unwrap_or_default(),
                    pkg.version_info.unwrap_or_default(),
                    pkg.license_concluded.unwrap_or_default(),
                )),
                Err(e) => collector.skip(e.to_string()),
            }
        }

        Ok(collector.finish(self.format_name()))
    }
}

impl Default for SpdxParser {
    fn default() -> Self {
        Self::tag_value()
    }
}

impl SbomNormalizer for SpdxParser {
    fn normalize_str(&self, content: &str) -> Result<Vec<CanonicalRecord>> {
        match self.encoding {
            SpdxEncoding::TagValue => Ok(self.parse_tag_value(content)),
            SpdxEncoding::Json => self.parse_json(content),
        }
    }

    fn format_name(&self) -> &str {
        match self.encoding {
            SpdxEncoding::TagValue => "SPDX tag-value",
            SpdxEncoding::Json => "SPDX JSON",
        }
    }
}

/// Drop build metadata and release suffixes: `1.2.3-r0` and `1.2.3+git` both
/// become `1.2.3`.
fn strip_version_suffix(version: &str) -> &str {
    version
        .split(|c: char| c == '-' || c == '+')
        .next()
        .unwrap_or_default()
        .trim()
}

// SPDX JSON structures for deserialization

#[derive(Debug, Deserialize)]
struct SpdxJsonDocument {
    packages: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpdxJsonPackage {
    name: Option<String>,
    version_info: Option<String>,
    license_concluded: Option<String>,
}
