//! Configuration types for sbom-manager.

use crate::reports::{OutputFormat, DEFAULT_COLUMN_WIDTH};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Directory name used under the user cache directory.
const STORE_DIR_NAME: &str = "sbom-manager";

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Unified application configuration that can be loaded from CLI args or config files.
///
/// CLI arguments are layered over the file with [`AppConfig::merge`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Where the database and document copies live
    pub store: StoreConfig,
    /// External vulnerability scanner
    pub scanner: ScannerConfig,
    /// Listing output
    pub output: OutputConfig,
}

impl AppConfig {
    /// Create a new `AppConfig` with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

// ============================================================================
// Sections
// ============================================================================

/// Store location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct StoreConfig {
    /// Store directory (defaults to `<cache dir>/sbom-manager`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<PathBuf>,
}

impl StoreConfig {
    /// The configured location, or the default under the user cache directory.
    #[must_use]
    pub fn resolved_location(&self) -> PathBuf {
        self.location.clone().unwrap_or_else(default_store_location)
    }
}

/// Default store directory.
#[must_use]
pub fn default_store_location() -> PathBuf {
    dirs::cache_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".cache")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(STORE_DIR_NAME)
}

/// External scanner invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ScannerConfig {
    /// Program to run; scanning is disabled when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
    /// Whitespace-separated options placed before the document path
    pub options: String,
}

/// Listing output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format
    pub format: OutputFormat,
    /// Output file path (None for stdout)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Console column width
    #[schemars(range(min = 4))]
    pub width: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            file: None,
            width: DEFAULT_COLUMN_WIDTH,
        }
    }
}
