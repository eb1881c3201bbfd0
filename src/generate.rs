//! SPDX 2.2 tag-value export.
//!
//! Produces a minimal document listing one package per record. Licenses and
//! copyright are always `NOASSERTION`; only product and version are carried
//! over from the store.

use crate::model::{CanonicalRecord, NO_ASSERTION};
use chrono::{DateTime, Utc};
use std::fmt::Write as _;
use uuid::Uuid;

const SPDX_VERSION: &str = "SPDX-2.2";
const DATA_LICENSE: &str = "CC0-1.0";
const SPDX_NAMESPACE: &str = "http://spdx.org/spdxdocs/";
const LICENSE_LIST_VERSION: &str = "3.9";
const DOCUMENT_ID: &str = "SPDXRef-DOCUMENT";
const TOOL_NAME: &str = "sbom-manager";

/// Generator for SPDX tag-value documents.
#[derive(Debug, Clone)]
pub struct SpdxTagGenerator {
    tool_version: String,
}

impl Default for SpdxTagGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SpdxTagGenerator {
    /// Generator identifying itself with this crate's version.
    pub fn new() -> Self {
        Self {
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Render `records` as the contents of project `project_name`.
    pub fn generate(&self, project_name: &str, records: &[CanonicalRecord]) -> String {
        self.generate_with(project_name, records, Uuid::new_v4(), Utc::now())
    }

    /// Same as [`generate`](Self::generate) with a fixed namespace id and
    /// creation time.
    pub fn generate_with(
        &self,
        project_name: &str,
        records: &[CanonicalRecord],
        namespace_id: Uuid,
        created: DateTime<Utc>,
    ) -> String {
        let document_name = project_name.replace(' ', "-");
        let mut doc = String::new();

        tag(&mut doc, "SPDXVersion", SPDX_VERSION);
        tag(&mut doc, "DataLicense", DATA_LICENSE);
        tag(&mut doc, "SPDXID", DOCUMENT_ID);
        tag(&mut doc, "DocumentName", &document_name);
        tag(
            &mut doc,
            "DocumentNamespace",
            &format!("{SPDX_NAMESPACE}{document_name}-{namespace_id}"),
        );
        tag(&mut doc, "LicenseListVersion", LICENSE_LIST_VERSION);
        tag(
            &mut doc,
            "Creator",
            &format!("Tool: {TOOL_NAME}-{}", self.tool_version),
        );
        tag(&mut doc, "Created", &created.format("%Y-%m-%dT%H:%M:%SZ").to_string());
        tag(
            &mut doc,
            "CreatorComment",
            "<text>This document has been automatically generated.</text>",
        );

        doc.push_str("\n##### Package\n");
        for (index, record) in records.iter().enumerate() {
            let package_id = format!("SPDXRef-Package-{}", index + 1);
            doc.push('\n');
            tag(&mut doc, "PackageName", &record.product);
            tag(&mut doc, "SPDXID", &package_id);
            tag(&mut doc, "PackageVersion", &record.version);
            tag(&mut doc, "PackageDownloadLocation", "NONE");
            tag(&mut doc, "FilesAnalyzed", "false");
            tag(&mut doc, "PackageLicenseConcluded", NO_ASSERTION);
            tag(&mut doc, "PackageLicenseDeclared", NO_ASSERTION);
            tag(&mut doc, "PackageCopyrightText", NO_ASSERTION);
            tag(
                &mut doc,
                "Relationship",
                &format!("{DOCUMENT_ID} CONTAINS {package_id}"),
            );
        }

        doc
    }
}

fn tag(doc: &mut String, name: &str, value: &str) {
    let _ = writeln!(doc, "{name}: {value}");
}
