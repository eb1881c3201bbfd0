//! Find and list command handlers.

use super::{emit, reporter_for, require_store, OutputConfig};
use crate::reports::{render_entries, render_modules};
use crate::store::{ListScope, SbomStore};
use anyhow::Result;

/// Search stored records by product name.
///
/// An empty `project` searches every project.
pub fn run_find(
    store: &SbomStore,
    module: &str,
    project: &str,
    include_history: bool,
    output: &OutputConfig,
) -> Result<()> {
    require_store(store)?;
    let rows = store.find_module(module, project, include_history)?;
    if rows.is_empty() {
        tracing::info!("No modules matching {module}");
        return Ok(());
    }

    let reporter = reporter_for(output);
    emit(&render_modules(reporter.as_ref(), &rows), output)
}

/// List stored files, records, or both.
pub fn run_list(
    store: &SbomStore,
    scope: ListScope,
    project: &str,
    include_history: bool,
    version: Option<u32>,
    output: &OutputConfig,
) -> Result<()> {
    require_store(store)?;
    let entries = store.list_entries(scope, project, include_history, version)?;
    if entries.is_empty() {
        tracing::info!("No entries found");
        return Ok(());
    }

    let reporter = reporter_for(output);
    emit(&render_entries(reporter.as_ref(), &entries), output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::test_support::initialised_store;
    use crate::model::CanonicalRecord;
    use crate::reports::OutputFormat;
    use std::path::Path;

    fn csv_output(path: &Path) -> OutputConfig {
        OutputConfig {
            format: OutputFormat::Csv,
            file: Some(path.to_path_buf()),
            ..OutputConfig::default()
        }
    }

    #[test]
    fn test_find_reports_latest_matches() {
        let (tmp, store, _sink) = initialised_store();
        store
            .add_file("a.csv", "", "p", "csv", &[CanonicalRecord::product("OpenSSL", "1.1")])
            .unwrap();
        store
            .add_file("b.csv", "", "p", "csv", &[CanonicalRecord::product("openssl", "3.0")])
            .unwrap();

        let out = tmp.path().join("find.csv");
        run_find(&store, "SSL", "", false, &csv_output(&out)).unwrap();
        let written = std::fs::read_to_string(&out).unwrap();
        assert_eq!(written.lines().count(), 2);
        assert!(written.contains("\"3.0\""));
        assert!(!written.contains("\"1.1\""));
    }

    #[test]
    fn test_list_empty_store_writes_nothing() {
        let (tmp, store, sink) = initialised_store();
        let out = tmp.path().join("list.csv");
        run_list(&store, ListScope::All, "", false, None, &csv_output(&out)).unwrap();
        assert!(!out.exists());
        assert!(sink.commands().contains(&"list".to_string()));
    }

    #[test]
    fn test_list_specific_version() {
        let (tmp, store, _sink) = initialised_store();
        for version in ["1.0", "2.0"] {
            store
                .add_file("a.csv", "", "p", "csv", &[CanonicalRecord::product("zlib", version)])
                .unwrap();
        }

        let out = tmp.path().join("list.csv");
        run_list(&store, ListScope::Module, "p", false, Some(1), &csv_output(&out)).unwrap();
        let written = std::fs::read_to_string(&out).unwrap();
        assert!(written.contains("\"1.0\""));
        assert!(!written.contains("\"2.0\""));
    }
}
