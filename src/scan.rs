//! External vulnerability scanner.
//!
//! The scanner is an arbitrary program configured by the user. It is run
//! once per stored document as `<program> <options...> <document>` and its
//! standard output is returned line by line.

use crate::config::ScannerConfig;
use crate::error::{Result, SbomManagerError};
use std::path::Path;
use std::process::Command;

/// A configured scanner program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scanner {
    program: String,
    options: Vec<String>,
}

impl Scanner {
    pub fn new(program: impl Into<String>, options: &str) -> Self {
        Self {
            program: program.into(),
            options: options.split_whitespace().map(str::to_string).collect(),
        }
    }

    /// Build a scanner from configuration.
    ///
    /// Returns `None`, with a warning, when no program is configured.
    pub fn from_config(config: &ScannerConfig) -> Option<Self> {
        match config.program.as_deref().map(str::trim) {
            Some(program) if !program.is_empty() => Some(Self::new(program, &config.options)),
            _ => {
                tracing::warn!("No scanner configured; set scanner.program in the config file");
                None
            }
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Scan one document and return the scanner's stdout lines.
    pub fn scan(&self, document: &Path) -> Result<Vec<String>> {
        tracing::info!("Scan {} for vulnerabilities", document.display());

        let output = Command::new(&self.program)
            .args(&self.options)
            .arg(document)
            .output()
            .map_err(|e| {
                SbomManagerError::scanner(format!("failed to run {}: {e}", self.program))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SbomManagerError::scanner(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::to_string)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_requires_program() {
        assert_eq!(Scanner::from_config(&ScannerConfig::default()), None);

        let config = ScannerConfig {
            program: Some("grype".to_string()),
            options: "-o  table --quiet".to_string(),
        };
        let scanner = Scanner::from_config(&config).unwrap();
        assert_eq!(scanner.program(), "grype");
        assert_eq!(scanner.options(), ["-o", "table", "--quiet"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_returns_stdout_lines() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "line one\nline two\n").unwrap();

        let lines = Scanner::new("cat", "").scan(file.path()).unwrap();
        assert_eq!(lines, vec!["line one", "line two"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_failure_is_error() {
        let err = Scanner::new("cat", "")
            .scan(Path::new("/nonexistent/document.spdx"))
            .unwrap_err();
        assert!(matches!(err, SbomManagerError::Scanner(_)));
    }

    #[test]
    fn test_missing_program_is_error() {
        let err = Scanner::new("definitely-not-a-scanner-binary", "")
            .scan(Path::new("bom.json"))
            .unwrap_err();
        assert!(matches!(err, SbomManagerError::Scanner(_)));
    }
}
