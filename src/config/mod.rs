//! Configuration module for sbom-manager.
//!
//! This module provides:
//! - Type-safe configuration structures
//! - Validation for all configuration values
//! - YAML config file loading and discovery
//! - CLI argument merging
//!
//! # Configuration File
//!
//! Place a `.sbom-manager.yaml` file in the working directory or
//! `~/.config/sbom-manager/`:
//!
//! ```yaml
//! store:
//!   location: /var/lib/sbom-manager
//! scanner:
//!   program: grype
//!   options: -o table
//! output:
//!   format: csv
//! ```

pub mod file;
mod types;
mod validation;

// Re-export main types
pub use types::{default_store_location, AppConfig, OutputConfig, ScannerConfig, StoreConfig};
pub use validation::{ConfigError, Validatable};

// Re-export file utilities
pub use file::{
    discover_config_file, generate_example_config, load_config_file, load_or_default,
    ConfigFileError,
};

/// Generate a JSON Schema for the `AppConfig` configuration format.
///
/// This schema documents all configuration options that can be set in
/// `.sbom-manager.yaml` config files. It can be used by editors for
/// validation and autocompletion.
pub fn generate_json_schema() -> crate::error::Result<String> {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema)
        .map_err(|e| crate::error::SbomManagerError::config(e.to_string()))
}
