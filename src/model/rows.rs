//! Row shapes returned by the versioned store.

use super::CanonicalRecord;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Header row for one ingested SBOM document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SbomFile {
    pub id: i64,
    pub filename: String,
    pub project: String,
    pub description: String,
    pub sbom_type: String,
    /// 1-based, per-project ingestion number
    pub file_version: u32,
    pub record_count: u32,
    pub added_at: DateTime<Utc>,
}

/// One persisted component, together with the project version it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleRow {
    pub project: String,
    pub file_version: u32,
    pub vendor: String,
    pub product: String,
    pub version: String,
    pub license: String,
}

impl From<&ModuleRow> for CanonicalRecord {
    fn from(row: &ModuleRow) -> Self {
        Self::new(&row.vendor, &row.product, &row.version, &row.license)
    }
}

/// Joined file + component row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryRow {
    pub filename: String,
    pub project: String,
    pub description: String,
    pub file_version: u32,
    pub vendor: String,
    pub product: String,
    pub version: String,
    pub license: String,
}

/// One line of the audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub command: String,
}

impl AuditEntry {
    /// An entry stamped with the current time.
    pub fn now(command: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            command: command.into(),
        }
    }
}

/// Result of a `list` query; the variant follows the requested scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entries {
    Sbom(Vec<SbomFile>),
    Module(Vec<ModuleRow>),
    All(Vec<EntryRow>),
}

impl Entries {
    /// Number of rows, whatever the scope.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Sbom(rows) => rows.len(),
            Self::Module(rows) => rows.len(),
            Self::All(rows) => rows.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Column headings matching [`Entries::to_table`].
    #[must_use]
    pub fn headings(&self) -> Vec<&'static str> {
        match self {
            Self::Sbom(_) => vec![
                "Filename",
                "Project",
                "Version",
                "Description",
                "SBOM Type",
                "Records",
                "Date Added",
            ],
            Self::Module(_) => vec!["Project", "Version", "Vendor", "Product", "Release", "License"],
            Self::All(_) => EntryRow::headings(),
        }
    }

    /// Rows flattened to strings for rendering.
    #[must_use]
    pub fn to_table(&self) -> Vec<Vec<String>> {
        match self {
            Self::Sbom(rows) => rows
                .iter()
                .map(|f| {
                    vec![
                        f.filename.clone(),
                        f.project.clone(),
                        f.file_version.to_string(),
                        f.description.clone(),
                        f.sbom_type.clone(),
                        f.record_count.to_string(),
                        f.added_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                    ]
                })
                .collect(),
            Self::Module(rows) => rows
                .iter()
                .map(|m| {
                    vec![
                        m.project.clone(),
                        m.file_version.to_string(),
                        m.vendor.clone(),
                        m.product.clone(),
                        m.version.clone(),
                        m.license.clone(),
                    ]
                })
                .collect(),
            Self::All(rows) => rows.iter().map(EntryRow::to_cells).collect(),
        }
    }
}

impl EntryRow {
    /// Column headings matching [`EntryRow::to_cells`].
    #[must_use]
    pub fn headings() -> Vec<&'static str> {
        vec![
            "Filename",
            "Project",
            "Version",
            "Description",
            "Vendor",
            "Product",
            "Release",
            "License",
        ]
    }

    #[must_use]
    pub fn to_cells(&self) -> Vec<String> {
        vec![
            self.filename.clone(),
            self.project.clone(),
            self.file_version.to_string(),
            self.description.clone(),
            self.vendor.clone(),
            self.product.clone(),
            self.version.clone(),
            self.license.clone(),
        ]
    }
}
