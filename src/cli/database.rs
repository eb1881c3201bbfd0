//! Store lifecycle handlers: init, export-db, import-db and log.

use super::{emit, reporter_for, require_store, OutputConfig};
use crate::reports::render_audit;
use crate::store::SbomStore;
use anyhow::{Context, Result};
use std::path::Path;

/// Create (or wipe) the store and its document copies.
pub fn run_init(store: &SbomStore) -> Result<()> {
    store
        .initialise()
        .with_context(|| format!("failed to initialise {}", store.location().display()))?;
    store.file_store().reset_all()?;
    Ok(())
}

/// Copy the store file to `target`.
pub fn run_export(store: &SbomStore, target: &Path) -> Result<()> {
    require_store(store)?;
    store.copy(target, true)?;
    Ok(())
}

/// Replace the store file with `source`.
pub fn run_import(store: &SbomStore, source: &Path) -> Result<()> {
    store
        .copy(source, false)
        .with_context(|| format!("failed to import {}", source.display()))?;
    Ok(())
}

/// Print the audit trail.
pub fn run_log(store: &SbomStore, output: &OutputConfig) -> Result<()> {
    require_store(store)?;
    let entries = store.audit_entries()?;
    let reporter = reporter_for(output);
    emit(&render_audit(reporter.as_ref(), &entries), output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::MemoryAuditSink;
    use crate::cli::test_support::initialised_store;
    use crate::error::SbomManagerError;
    use tempfile::TempDir;

    #[test]
    fn test_init_clears_document_copies() {
        let (_tmp, store, _sink) = initialised_store();
        let project_dir = store.location().join("firmware");
        std::fs::create_dir_all(&project_dir).unwrap();
        std::fs::write(project_dir.join("1_bom.json"), "{}").unwrap();

        run_init(&store).unwrap();
        assert!(!project_dir.exists());
        assert!(store.check_exists());
    }

    #[test]
    fn test_export_then_import_into_fresh_location() {
        let (tmp, store, _sink) = initialised_store();
        let exported = tmp.path().join("backup.db");
        run_export(&store, &exported).unwrap();
        assert!(exported.is_file());

        let sink = MemoryAuditSink::new();
        let other = SbomStore::with_audit_sink(tmp.path().join("restored"), sink.clone());
        run_import(&other, &exported).unwrap();
        assert!(other.check_exists());
        assert_eq!(sink.commands(), vec!["Import database"]);
    }

    #[test]
    fn test_export_requires_store() {
        let tmp = TempDir::new().unwrap();
        let store = SbomStore::new(tmp.path().join("missing"));
        let err = run_export(&store, &tmp.path().join("out.db")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SbomManagerError>(),
            Some(SbomManagerError::StoreNotInitialised)
        ));
    }

    #[test]
    fn test_log_writes_audit_trail() {
        let (tmp, store, _sink) = initialised_store();
        let out = tmp.path().join("log.csv");
        let output = OutputConfig {
            format: crate::reports::OutputFormat::Csv,
            file: Some(out.clone()),
            ..OutputConfig::default()
        };
        run_log(&store, &output).unwrap();

        let written = std::fs::read_to_string(out).unwrap();
        assert!(written.starts_with("\"Timestamp\",\"Command\""));
        assert!(written.contains("\"initialise\""));
    }
}
