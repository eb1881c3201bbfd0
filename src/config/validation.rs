//! Configuration validation for sbom-manager.

use super::types::{AppConfig, OutputConfig, ScannerConfig, StoreConfig};

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.store.validate());
        errors.extend(self.scanner.validate());
        errors.extend(self.output.validate());
        errors
    }
}

impl Validatable for StoreConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if let Some(ref location) = self.location {
            if location.as_os_str().is_empty() {
                errors.push(ConfigError::new("store.location", "Location must not be empty"));
            } else if location.is_file() {
                errors.push(ConfigError::new(
                    "store.location",
                    format!("{} is a file, expected a directory", location.display()),
                ));
            }
        }
        errors
    }
}

impl Validatable for ScannerConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if let Some(ref program) = self.program {
            if program.trim().is_empty() {
                errors.push(ConfigError::new(
                    "scanner.program",
                    "Program must not be empty; omit it to disable scanning",
                ));
            }
        }
        errors
    }
}

impl Validatable for OutputConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if let Some(ref file_path) = self.file {
            if let Some(parent) = file_path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    errors.push(ConfigError::new(
                        "output.file",
                        format!("Parent directory does not exist: {}", parent.display()),
                    ));
                }
            }
        }

        if self.width < 4 {
            errors.push(ConfigError::new(
                "output.width",
                format!("Width must be at least 4, got {}", self.width),
            ));
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AppConfig::default().is_valid());
    }

    #[test]
    fn test_output_width_validation() {
        let config = OutputConfig {
            width: 2,
            ..OutputConfig::default()
        };
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "output.width");
    }

    #[test]
    fn test_output_file_parent_validation() {
        let config = OutputConfig {
            file: Some(PathBuf::from("/nonexistent/dir/out.csv")),
            ..OutputConfig::default()
        };
        assert!(!config.is_valid());
    }

    #[test]
    fn test_empty_scanner_program() {
        let config = ScannerConfig {
            program: Some("  ".to_string()),
            options: String::new(),
        };
        assert!(!config.is_valid());
        assert!(ScannerConfig::default().is_valid());
    }

    #[test]
    fn test_store_location_must_be_directory() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = StoreConfig {
            location: Some(file.path().to_path_buf()),
        };
        let errors = config.validate();
        assert!(errors[0].to_string().starts_with("store.location:"));
    }
}
