//! Generate command handler.
//!
//! Exports the latest version of a project as an SPDX tag-value document.

use super::require_store;
use crate::generate::SpdxTagGenerator;
use crate::model::{CanonicalRecord, Entries};
use crate::reports::{write_output, OutputTarget};
use crate::store::{ListScope, SbomStore};
use anyhow::{bail, Result};
use std::path::PathBuf;

/// Run the generate command.
pub fn run_generate(store: &SbomStore, project: &str, output_file: Option<PathBuf>) -> Result<()> {
    require_store(store)?;
    if project.trim().is_empty() {
        bail!("A project name is required to generate an SBOM");
    }

    let entries = store.list_entries(ListScope::Module, project, false, None)?;
    let records: Vec<CanonicalRecord> = match &entries {
        Entries::Module(rows) => rows.iter().map(CanonicalRecord::from).collect(),
        _ => Vec::new(),
    };
    if records.is_empty() {
        tracing::warn!("Project {project} has no stored components");
    }

    let document = SpdxTagGenerator::new().generate(project, &records);
    write_output(&document, &OutputTarget::from_option(output_file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::test_support::initialised_store;
    use crate::parsers::{SbomNormalizer, SpdxParser};

    #[test]
    fn test_generate_latest_version_only() {
        let (tmp, store, _sink) = initialised_store();
        store
            .add_file("a", "", "fw", "csv", &[CanonicalRecord::product("busybox", "1.35")])
            .unwrap();
        store
            .add_file(
                "b",
                "",
                "fw",
                "csv",
                &[
                    CanonicalRecord::product("busybox", "1.36"),
                    CanonicalRecord::product("dropbear", "2022.83").with_license("MIT"),
                ],
            )
            .unwrap();

        let out = tmp.path().join("fw.spdx");
        run_generate(&store, "fw", Some(out.clone())).unwrap();

        let document = std::fs::read_to_string(out).unwrap();
        let records = SpdxParser::tag_value().normalize_str(&document).unwrap();
        let products: Vec<_> = records
            .iter()
            .map(|r| (r.product.as_str(), r.version.as_str()))
            .collect();
        assert_eq!(products, vec![("busybox", "1.36"), ("dropbear", "2022.83")]);
        assert!(records.iter().all(|r| r.license == crate::model::NO_ASSERTION));
    }

    #[test]
    fn test_generate_requires_project() {
        let (_tmp, store, _sink) = initialised_store();
        assert!(run_generate(&store, " ", None).is_err());
    }
}
