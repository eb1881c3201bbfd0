//! Raw document copies, one directory per project.
//!
//! Layout: `<location>/<project>/<version>_<basename>`. The database file
//! lives next to the project directories and is never touched here.

use crate::error::{OptionContext, Result, SbomManagerError};
use std::fs;
use std::path::{Path, PathBuf};

/// Blob store for ingested documents.
#[derive(Debug, Clone)]
pub struct FileStore {
    location: PathBuf,
}

impl FileStore {
    pub fn new(location: impl Into<PathBuf>) -> Self {
        Self {
            location: location.into(),
        }
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    fn project_dir(&self, project: &str) -> Result<PathBuf> {
        validate_project(project)?;
        Ok(self.location.join(project))
    }

    /// Copy `source` into the project directory as `<version>_<basename>`.
    pub fn store(&self, source: &Path, project: &str, version: u32) -> Result<PathBuf> {
        let project_dir = self.project_dir(project)?;
        if !project_dir.is_dir() {
            tracing::debug!("Creating file store for {project}");
            fs::create_dir_all(&project_dir)
                .map_err(|e| SbomManagerError::storage(&project_dir, e))?;
        }

        let basename = source
            .file_name()
            .context_none(format!("{} has no file name", source.display()))?;
        let destination = project_dir.join(format!("{version}_{}", basename.to_string_lossy()));

        tracing::debug!("Copying {} to {}", source.display(), destination.display());
        fs::copy(source, &destination).map_err(|e| SbomManagerError::io(source, e))?;
        Ok(destination)
    }

    /// Path of a stored copy, if present.
    pub fn get_file(&self, name: &str, project: &str) -> Option<PathBuf> {
        let path = self.project_dir(project).ok()?.join(name);
        if path.is_file() {
            Some(path)
        } else {
            tracing::debug!("File {name} not found for {project}");
            None
        }
    }

    /// Stored copies for a project, highest version first.
    ///
    /// Dot-files are ignored. A project with no directory has no files.
    pub fn list_project_files(&self, project: &str) -> Result<Vec<PathBuf>> {
        let project_dir = self.project_dir(project)?;
        if !project_dir.is_dir() {
            tracing::debug!("No files for {project}");
            return Ok(Vec::new());
        }

        let mut files: Vec<(u32, PathBuf)> = Vec::new();
        let entries =
            fs::read_dir(&project_dir).map_err(|e| SbomManagerError::io(&project_dir, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| SbomManagerError::io(&project_dir, e))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') || !entry.path().is_file() {
                continue;
            }
            files.push((version_prefix(&name).unwrap_or(0), entry.path()));
        }

        files.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
        Ok(files.into_iter().map(|(_, path)| path).collect())
    }

    /// Remove every project directory. Dot-entries and plain files, including
    /// the database, are left alone.
    pub fn reset_all(&self) -> Result<()> {
        if !self.location.is_dir() {
            return Ok(());
        }

        let entries =
            fs::read_dir(&self.location).map_err(|e| SbomManagerError::io(&self.location, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| SbomManagerError::io(&self.location, e))?;
            let path = entry.path();
            if entry.file_name().to_string_lossy().starts_with('.') || !path.is_dir() {
                continue;
            }
            tracing::debug!("Deleting project directory {}", path.display());
            fs::remove_dir_all(&path).map_err(|e| SbomManagerError::io(&path, e))?;
        }
        Ok(())
    }
}

/// Check that `project` names exactly one directory under the store location.
///
/// Empty names, path separators and leading dots are rejected: an empty
/// project filter means "every project", and dot-entries are never listed.
pub fn validate_project(project: &str) -> Result<()> {
    let reason = if project.trim().is_empty() {
        "project name is empty"
    } else if project.contains(['/', '\\']) {
        "project name contains a path separator"
    } else if project.starts_with('.') || project.contains("..") {
        "project name starts with a dot or contains `..`"
    } else {
        return Ok(());
    };
    Err(SbomManagerError::invalid_project(project, reason))
}

/// Parse the `<version>_` prefix of a stored file name.
fn version_prefix(name: &str) -> Option<u32> {
    name.split_once('_')?.0.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn source_file(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, "acme,widget,1.0\n").unwrap();
        path
    }

    #[test]
    fn test_store_and_get() {
        let store_dir = TempDir::new().unwrap();
        let input_dir = TempDir::new().unwrap();
        let store = FileStore::new(store_dir.path());

        let stored = store
            .store(&source_file(input_dir.path(), "bom.csv"), "router", 3)
            .unwrap();
        assert_eq!(stored, store_dir.path().join("router").join("3_bom.csv"));
        assert_eq!(store.get_file("3_bom.csv", "router"), Some(stored));
        assert_eq!(store.get_file("4_bom.csv", "router"), None);
    }

    #[test]
    fn test_list_is_most_recent_first() {
        let store_dir = TempDir::new().unwrap();
        let input_dir = TempDir::new().unwrap();
        let store = FileStore::new(store_dir.path());
        let source = source_file(input_dir.path(), "bom.csv");

        for version in [1, 2, 10] {
            store.store(&source, "router", version).unwrap();
        }
        fs::write(store_dir.path().join("router").join(".hidden"), "").unwrap();

        let names: Vec<String> = store
            .list_project_files("router")
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["10_bom.csv", "2_bom.csv", "1_bom.csv"]);
        assert!(store.list_project_files("unknown").unwrap().is_empty());
    }

    #[test]
    fn test_store_stays_inside_location() {
        let store_dir = TempDir::new().unwrap();
        let input_dir = TempDir::new().unwrap();
        let store = FileStore::new(store_dir.path().join("s"));
        let source = source_file(input_dir.path(), "bom.csv");

        let outside = store_dir.path().join("outside");
        for project in [outside.to_string_lossy().as_ref(), "../outside", "", "."] {
            let err = store.store(&source, project, 1).unwrap_err();
            assert!(matches!(err, SbomManagerError::InvalidProject { .. }));
        }
        assert!(!outside.exists());
        assert!(!store_dir.path().join("s").exists());
        assert!(store.list_project_files("../outside").is_err());
        assert_eq!(store.get_file("1_bom.csv", ".."), None);
    }

    #[test]
    fn test_validate_project() {
        assert!(validate_project("router").is_ok());
        assert!(validate_project("fw 2.0_beta").is_ok());
        assert!(validate_project("a..b").is_err());
        assert!(validate_project("a\\b").is_err());
    }

    #[test]
    fn test_reset_all_keeps_plain_files() {
        let store_dir = TempDir::new().unwrap();
        let input_dir = TempDir::new().unwrap();
        let store = FileStore::new(store_dir.path());
        store
            .store(&source_file(input_dir.path(), "bom.csv"), "router", 1)
            .unwrap();
        fs::write(store_dir.path().join("sbom.db"), "db").unwrap();
        fs::create_dir(store_dir.path().join(".keep")).unwrap();

        store.reset_all().unwrap();
        assert!(!store_dir.path().join("router").exists());
        assert!(store_dir.path().join("sbom.db").exists());
        assert!(store_dir.path().join(".keep").exists());
    }
}
