//! CLI command handlers.
//!
//! This module provides testable command handlers that are invoked by main.rs.
//! Each handler implements the business logic for a specific CLI subcommand.

mod add;
mod database;
mod generate;
mod query;
mod scan;

pub use add::{run_add, AddOptions, DEFAULT_DESCRIPTION};
pub use database::{run_export, run_import, run_init, run_log};
pub use generate::run_generate;
pub use query::{run_find, run_list};
pub use scan::run_scan;

// Re-export config types used by handlers
pub use crate::config::{OutputConfig, ScannerConfig};

use crate::error::SbomManagerError;
use crate::reports::{create_reporter, write_output, OutputTarget, ReportGenerator};
use crate::store::SbomStore;
use anyhow::Result;

/// Fail unless the store has been initialised.
fn require_store(store: &SbomStore) -> Result<()> {
    if store.check_exists() {
        Ok(())
    } else {
        Err(SbomManagerError::StoreNotInitialised.into())
    }
}

fn reporter_for(output: &OutputConfig) -> Box<dyn ReportGenerator> {
    create_reporter(output.format, output.width)
}

fn emit(content: &str, output: &OutputConfig) -> Result<()> {
    write_output(content, &OutputTarget::from_option(output.file.clone()))
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::audit::MemoryAuditSink;
    use crate::store::SbomStore;
    use std::sync::Arc;
    use tempfile::TempDir;

    /// An initialised store in a fresh temporary directory.
    pub(crate) fn initialised_store() -> (TempDir, SbomStore, Arc<MemoryAuditSink>) {
        let tmp = TempDir::new().unwrap();
        let sink = MemoryAuditSink::new();
        let store = SbomStore::with_audit_sink(tmp.path().join("store"), sink.clone());
        super::run_init(&store).unwrap();
        (tmp, store, sink)
    }
}
