//! Format selection and dispatch.

use crate::error::{ErrorContext, Result, SbomManagerError};
use crate::model::CanonicalRecord;
use crate::parsers::traits::{read_document, SbomNormalizer};
use crate::parsers::{
    detect_format, CsvParser, CycloneDxParser, DirectoryInventoryParser, SpdxParser,
};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Every input format with a normalizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SbomFormat {
    /// SPDX tag-value
    Spdx,
    SpdxJson,
    /// CycloneDX XML
    CycloneDx,
    CycloneDxJson,
    Csv,
    /// Filename inventory
    Dir,
}

impl SbomFormat {
    /// All variants, in the order they are listed to users.
    pub const ALL: [Self; 6] = [
        Self::Spdx,
        Self::SpdxJson,
        Self::CycloneDx,
        Self::CycloneDxJson,
        Self::Csv,
        Self::Dir,
    ];

    /// The name accepted on the command line and stored as `sbom_type`.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Spdx => "spdx",
            Self::SpdxJson => "spdx_json",
            Self::CycloneDx => "cyclonedx",
            Self::CycloneDxJson => "cyclonedx_json",
            Self::Csv => "csv",
            Self::Dir => "dir",
        }
    }

    /// Pick the variant for a declared type and document path.
    ///
    /// The `spdx` and `cyclonedx` families look at the file extension:
    /// `.json` selects the JSON variant and `.xml` selects CycloneDX XML.
    /// `auto` reads the document and sniffs its content.
    pub fn resolve(declared: &str, path: &Path) -> Result<Self> {
        let declared = declared.trim().to_lowercase();
        if declared == "auto" {
            let content = read_document(path)?;
            return detect_format(&content, path)
                .ok_or_else(|| SbomManagerError::unsupported_format("auto (undetected)"));
        }

        let format: Self = declared.parse()?;
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        let resolved = match (format, extension.as_str()) {
            (Self::Spdx | Self::CycloneDx, "json") => format.json_variant(),
            (Self::Spdx | Self::CycloneDx, "xml") => Self::CycloneDx,
            _ => format,
        };
        if resolved != format {
            tracing::debug!(
                "Declared type {} resolved to {} by extension",
                format,
                resolved
            );
        }
        Ok(resolved)
    }

    const fn json_variant(self) -> Self {
        match self {
            Self::Spdx => Self::SpdxJson,
            Self::CycloneDx => Self::CycloneDxJson,
            other => other,
        }
    }

    /// Normalize in-memory content with this format's normalizer.
    pub fn normalize_str(self, content: &str) -> Result<Vec<CanonicalRecord>> {
        match self {
            Self::Spdx => SpdxParser::tag_value().normalize_str(content),
            Self::SpdxJson => SpdxParser::json().normalize_str(content),
            Self::CycloneDx => CycloneDxParser::xml().normalize_str(content),
            Self::CycloneDxJson => CycloneDxParser::json().normalize_str(content),
            Self::Csv => CsvParser::new().normalize_str(content),
            Self::Dir => DirectoryInventoryParser::new().normalize_str(content),
        }
    }

    /// Read and normalize a document.
    pub fn normalize(self, path: &Path) -> Result<Vec<CanonicalRecord>> {
        let content = read_document(path)?;
        let records = self
            .normalize_str(&content)
            .with_context(|| path.display().to_string())?;
        tracing::info!(
            "Normalized {} record(s) from {} as {}",
            records.len(),
            path.display(),
            self
        );
        Ok(records)
    }
}

impl fmt::Display for SbomFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SbomFormat {
    type Err = SbomManagerError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|format| format.name() == normalized)
            .ok_or_else(|| SbomManagerError::unsupported_format(s))
    }
}
