//! Scan command handler.
//!
//! Runs the configured scanner over stored copies of a project's documents:
//! the most recent one, or all of them with history enabled.

use super::{emit, require_store, OutputConfig, ScannerConfig};
use crate::scan::Scanner;
use crate::store::SbomStore;
use anyhow::Result;

/// Run the scan command. Returns the number of documents scanned.
pub fn run_scan(
    store: &SbomStore,
    scanner: &ScannerConfig,
    project: &str,
    include_history: bool,
    output: &OutputConfig,
) -> Result<usize> {
    require_store(store)?;
    let Some(scanner) = Scanner::from_config(scanner) else {
        return Ok(0);
    };

    let mut documents = store.file_store().list_project_files(project)?;
    if documents.is_empty() {
        tracing::warn!("No stored documents for {project}");
        return Ok(0);
    }
    if !include_history {
        documents.truncate(1);
    }

    let mut report = String::new();
    for document in &documents {
        for line in scanner.scan(document)? {
            report.push_str(&line);
            report.push('\n');
        }
    }
    emit(&report, output)?;
    Ok(documents.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::test_support::initialised_store;

    #[test]
    fn test_scan_without_scanner_is_noop() {
        let (_tmp, store, _sink) = initialised_store();
        let scanned = run_scan(
            &store,
            &ScannerConfig::default(),
            "fw",
            false,
            &OutputConfig::default(),
        )
        .unwrap();
        assert_eq!(scanned, 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_latest_or_all_documents() {
        let (tmp, store, _sink) = initialised_store();
        let files = store.file_store();
        for version in 1..=2 {
            let source = tmp.path().join("bom.txt");
            std::fs::write(&source, format!("document {version}\n")).unwrap();
            files.store(&source, "fw", version).unwrap();
        }

        let config = ScannerConfig {
            program: Some("cat".to_string()),
            options: String::new(),
        };
        let out = tmp.path().join("scan.txt");
        let output = OutputConfig {
            file: Some(out.clone()),
            ..OutputConfig::default()
        };

        assert_eq!(run_scan(&store, &config, "fw", false, &output).unwrap(), 1);
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "document 2\n");

        assert_eq!(run_scan(&store, &config, "fw", true, &output).unwrap(), 2);
        assert_eq!(
            std::fs::read_to_string(&out).unwrap(),
            "document 2\ndocument 1\n"
        );
    }
}
