//! Add command handler.
//!
//! Normalizes one document, stores its records as the next version of the
//! project, then keeps a copy of the document alongside the database.

use super::require_store;
use crate::parsers::SbomFormat;
use crate::store::SbomStore;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Description recorded when none is given.
pub const DEFAULT_DESCRIPTION: &str = "Not specified";

/// Arguments of the `add` command
#[derive(Debug, Clone)]
pub struct AddOptions {
    pub file: PathBuf,
    /// Declared type, or `auto`
    pub sbom_type: String,
    pub project: String,
    pub description: Option<String>,
}

/// Run the add command, returning the assigned file version.
pub fn run_add(store: &SbomStore, options: &AddOptions) -> Result<u32> {
    require_store(store)?;

    let format = SbomFormat::resolve(&options.sbom_type, &options.file)?;
    let records = format
        .normalize(&options.file)
        .with_context(|| format!("failed to process {}", options.file.display()))?;
    if records.is_empty() {
        tracing::warn!(
            "No components found in {}; recording an empty version",
            options.file.display()
        );
    }

    let description = options
        .description
        .as_deref()
        .unwrap_or(DEFAULT_DESCRIPTION);
    let filename = options.file.display().to_string();
    let version = store.add_file(
        &filename,
        description,
        &options.project,
        format.name(),
        &records,
    )?;

    let copy = store
        .file_store()
        .store(&options.file, &options.project, version)?;
    tracing::debug!("Stored copy at {}", copy.display());

    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::test_support::initialised_store;
    use crate::error::SbomManagerError;
    use crate::store::ListScope;
    use tempfile::TempDir;

    fn write_csv(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("components.csv");
        std::fs::write(&path, "Acme,Widget,1.2\n# comment\nacme,sprocket,2.0\n").unwrap();
        path
    }

    #[test]
    fn test_add_assigns_versions_and_copies_document() {
        let (tmp, store, sink) = initialised_store();
        let file = write_csv(&tmp);
        let options = AddOptions {
            file: file.clone(),
            sbom_type: "csv".to_string(),
            project: "firmware".to_string(),
            description: None,
        };

        assert_eq!(run_add(&store, &options).unwrap(), 1);
        assert_eq!(run_add(&store, &options).unwrap(), 2);

        let copies = store.file_store().list_project_files("firmware").unwrap();
        assert_eq!(copies.len(), 2);
        assert!(copies[0].ends_with("2_components.csv"));

        let entries = store
            .list_entries(ListScope::Sbom, "firmware", true, None)
            .unwrap();
        let table = entries.to_table();
        assert_eq!(table.len(), 2);
        assert_eq!(table[0][3], DEFAULT_DESCRIPTION);
        assert!(sink.commands().iter().filter(|c| *c == "add").count() == 2);
    }

    #[test]
    fn test_add_auto_detects_format() {
        let (tmp, store, _sink) = initialised_store();
        let file = write_csv(&tmp);
        let options = AddOptions {
            file,
            sbom_type: "auto".to_string(),
            project: "p".to_string(),
            description: Some("nightly".to_string()),
        };
        run_add(&store, &options).unwrap();

        let entries = store.list_entries(ListScope::Sbom, "p", false, None).unwrap();
        assert_eq!(entries.to_table()[0][4], "csv");
    }

    #[test]
    fn test_add_unknown_type_fails_without_new_version() {
        let (tmp, store, _sink) = initialised_store();
        let file = write_csv(&tmp);
        let options = AddOptions {
            file,
            sbom_type: "swid".to_string(),
            project: "p".to_string(),
            description: None,
        };
        let err = run_add(&store, &options).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SbomManagerError>(),
            Some(SbomManagerError::UnsupportedFormat(_))
        ));
        assert!(store
            .list_entries(ListScope::Sbom, "p", true, None)
            .unwrap()
            .is_empty());
    }
}
