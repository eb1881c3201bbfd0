//! SQL composition for store reads.
//!
//! Every read is a fixed `SELECT ... FROM ...` shape plus up to four optional
//! predicates. [`QueryBuilder::build`] always emits them in the same order,
//! whatever order the setters were called in:
//!
//! 1. search term (substring of the product)
//! 2. project
//! 3. exact version
//! 4. latest version per project, only when no exact version was requested

use rusqlite::types::Value;

/// Columns and joins for the three row shapes.
pub(crate) mod shape {
    pub const SBOM: &str = "SELECT f.id, f.filename, f.project, f.description, f.sbom_type, \
         f.file_version, f.record_count, f.added_at \
         FROM sbom_file f";

    pub const MODULE: &str = "SELECT f.project, f.file_version, d.vendor, d.product, d.version, d.license \
         FROM sbom_data d JOIN sbom_file f ON f.id = d.file_id";

    pub const ALL: &str = "SELECT f.filename, f.project, f.description, f.file_version, \
         d.vendor, d.product, d.version, d.license \
         FROM sbom_data d JOIN sbom_file f ON f.id = d.file_id";
}

/// Orderings used by the store.
pub(crate) mod order {
    pub const BY_PROJECT: &str = "f.project ASC, f.file_version DESC";
    pub const BY_PRODUCT: &str = "d.product ASC, f.project ASC, f.file_version DESC, d.id ASC";
    pub const BY_PROJECT_THEN_ROW: &str = "f.project ASC, f.file_version DESC, d.id ASC";
}

const LATEST_ONLY: &str =
    "f.file_version = (SELECT MAX(l.file_version) FROM sbom_file l WHERE l.project = f.project)";

/// Builds one parameterised SELECT.
#[derive(Debug, Clone)]
pub(crate) struct QueryBuilder {
    select: &'static str,
    search: Option<String>,
    project: Option<String>,
    version: Option<u32>,
    latest_only: bool,
    order_by: Option<&'static str>,
}

impl QueryBuilder {
    pub(crate) fn new(select: &'static str) -> Self {
        Self {
            select,
            search: None,
            project: None,
            version: None,
            latest_only: false,
            order_by: None,
        }
    }

    /// Case-insensitive substring match on `d.product`. Empty terms are ignored.
    pub(crate) fn search(mut self, term: &str) -> Self {
        let term = term.trim();
        if !term.is_empty() {
            self.search = Some(term.to_lowercase());
        }
        self
    }

    /// Restrict to one project. An empty name means every project.
    pub(crate) fn project(mut self, project: &str) -> Self {
        if !project.is_empty() {
            self.project = Some(project.to_string());
        }
        self
    }

    pub(crate) fn version(mut self, version: Option<u32>) -> Self {
        self.version = version;
        self
    }

    /// Keep only each project's highest `file_version`.
    ///
    /// Ignored when an exact version is set.
    pub(crate) fn latest_only(mut self, latest_only: bool) -> Self {
        self.latest_only = latest_only;
        self
    }

    pub(crate) fn order_by(mut self, order_by: &'static str) -> Self {
        self.order_by = Some(order_by);
        self
    }

    /// Produce the SQL text and its positional parameters.
    pub(crate) fn build(&self) -> (String, Vec<Value>) {
        let mut predicates: Vec<&str> = Vec::new();
        let mut params: Vec<Value> = Vec::new();

        if let Some(term) = &self.search {
            predicates.push("instr(d.product, ?) > 0");
            params.push(Value::Text(term.clone()));
        }
        if let Some(project) = &self.project {
            predicates.push("f.project = ?");
            params.push(Value::Text(project.clone()));
        }
        if let Some(version) = self.version {
            predicates.push("f.file_version = ?");
            params.push(Value::Integer(i64::from(version)));
        } else if self.latest_only {
            predicates.push(LATEST_ONLY);
        }

        let mut sql = String::from(self.select);
        if !predicates.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&predicates.join(" AND "));
        }
        if let Some(order_by) = self.order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(order_by);
        }

        (sql, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_predicates() {
        let (sql, params) = QueryBuilder::new(shape::SBOM).build();
        assert_eq!(sql, shape::SBOM);
        assert!(params.is_empty());
    }

    #[test]
    fn test_predicates_in_fixed_order() {
        let (sql, params) = QueryBuilder::new(shape::MODULE)
            .latest_only(true)
            .project("router")
            .search("OpenSSL")
            .order_by(order::BY_PRODUCT)
            .build();

        let search = sql.find("instr(").unwrap();
        let project = sql.find("f.project = ?").unwrap();
        let latest = sql.find("SELECT MAX").unwrap();
        let order = sql.find("ORDER BY").unwrap();
        assert!(search < project && project < latest && latest < order);
        assert_eq!(
            params,
            vec![
                Value::Text("openssl".to_string()),
                Value::Text("router".to_string())
            ]
        );
    }

    #[test]
    fn test_version_overrides_latest_only() {
        let (sql, params) = QueryBuilder::new(shape::ALL)
            .project("router")
            .version(Some(2))
            .latest_only(true)
            .build();
        assert!(sql.contains("f.file_version = ?"));
        assert!(!sql.contains("MAX("));
        assert_eq!(params[1], Value::Integer(2));
    }

    #[test]
    fn test_empty_filters_ignored() {
        let (sql, _) = QueryBuilder::new(shape::MODULE)
            .search("  ")
            .project("")
            .build();
        assert!(!sql.contains("WHERE"));
    }
}
