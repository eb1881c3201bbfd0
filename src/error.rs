//! Unified error types for sbom-manager.
//!
//! Document-level and store-level failures abort the current operation and
//! surface here. Record-level problems ([`ParseErrorKind::MalformedRecord`])
//! are logged by the normalizers and never returned.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for sbom-manager operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SbomManagerError {
    /// The source document could not be opened or read
    #[error("Unreadable document {path:?}: {source}")]
    UnreadableDocument {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No normalizer is registered for the declared format
    #[error("Unsupported SBOM format: {0}")]
    UnsupportedFormat(String),

    /// The document as a whole could not be parsed
    #[error("Failed to parse SBOM: {context}")]
    Parse {
        context: String,
        #[source]
        source: ParseErrorKind,
    },

    /// The store file or directory cannot be created or opened
    #[error("Storage unavailable at {path:?}: {message}")]
    StorageUnavailable { path: PathBuf, message: String },

    /// A project name that cannot be stored or isolated
    #[error("Invalid project name {name:?}: {reason}")]
    InvalidProject { name: String, reason: String },

    /// An operation was attempted before the store was initialised
    #[error("SBOM store has not been initialised (run `sbom-manager init`)")]
    StoreNotInitialised,

    /// SQLite errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The external scanner failed to run or reported failure
    #[error("Scanner failed: {0}")]
    Scanner(String),
}

/// Specific parse error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ParseErrorKind {
    #[error("Invalid JSON structure: {0}")]
    InvalidJson(String),

    #[error("Invalid XML structure: {0}")]
    InvalidXml(String),

    #[error("Malformed record #{index}: {reason}")]
    MalformedRecord { index: usize, reason: String },
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for sbom-manager operations
pub type Result<T> = std::result::Result<T, SbomManagerError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl SbomManagerError {
    /// Create a parse error with context
    pub fn parse(context: impl Into<String>, source: ParseErrorKind) -> Self {
        Self::Parse {
            context: context.into(),
            source,
        }
    }

    /// Create an error for a document that could not be read
    pub fn unreadable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::UnreadableDocument {
            path: path.into(),
            source,
        }
    }

    /// Create an error for a format with no normalizer
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat(format.into())
    }

    /// Create a storage error for the given location
    pub fn storage(path: impl Into<PathBuf>, message: impl std::fmt::Display) -> Self {
        Self::StorageUnavailable {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Create an error for a rejected project name
    pub fn invalid_project(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidProject {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a scanner error
    pub fn scanner(message: impl Into<String>) -> Self {
        Self::Scanner(message.into())
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for SbomManagerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for SbomManagerError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(
            "JSON deserialization",
            ParseErrorKind::InvalidJson(err.to_string()),
        )
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// The context string is prepended to the error's existing context, so a
/// failure deep in a normalizer reads like
/// `"adding sbom.json: parsing packages: Invalid JSON structure ..."`.
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, evaluated only on error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<SbomManagerError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
///
/// Variants without a free-form message are returned unchanged.
fn add_context_to_error(err: SbomManagerError, new_ctx: &str) -> SbomManagerError {
    match err {
        SbomManagerError::Parse {
            context: existing,
            source,
        } => SbomManagerError::Parse {
            context: chain_context(new_ctx, &existing),
            source,
        },
        SbomManagerError::StorageUnavailable { path, message } => {
            SbomManagerError::StorageUnavailable {
                path,
                message: chain_context(new_ctx, &message),
            }
        }
        SbomManagerError::Io {
            path,
            message,
            source,
        } => SbomManagerError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        SbomManagerError::Config(msg) => SbomManagerError::Config(chain_context(new_ctx, &msg)),
        SbomManagerError::Scanner(msg) => SbomManagerError::Scanner(chain_context(new_ctx, &msg)),
        other => other,
    }
}

/// Chain two context strings together.
///
/// If the existing context is empty, returns just the new context.
/// Otherwise, returns "`new_context`: `existing_context`".
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}

/// Extension trait for Option types to convert to errors with context.
pub trait OptionContext<T> {
    /// Convert None to a config error with the given context.
    fn context_none(self, context: impl Into<String>) -> Result<T>;
}

impl<T> OptionContext<T> for Option<T> {
    fn context_none(self, context: impl Into<String>) -> Result<T> {
        self.ok_or_else(|| SbomManagerError::Config(context.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SbomManagerError::unsupported_format("rdf");
        assert!(err.to_string().contains("rdf"));

        let err = SbomManagerError::StoreNotInitialised;
        assert!(err.to_string().contains("init"));
    }

    #[test]
    fn test_unreadable_mentions_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = SbomManagerError::unreadable("/path/to/sbom.spdx", io_err);

        assert!(err.to_string().contains("/path/to/sbom.spdx"));
    }

    #[test]
    fn test_context_chaining_multiple_levels() {
        fn inner() -> Result<()> {
            Err(SbomManagerError::parse(
                "base",
                ParseErrorKind::InvalidXml("eof".to_string()),
            ))
        }

        fn middle() -> Result<()> {
            inner().context("middle layer")
        }

        fn outer() -> Result<()> {
            middle().context("outer layer")
        }

        match outer() {
            Err(SbomManagerError::Parse { context, .. }) => {
                assert_eq!(context, "outer layer: middle layer: base");
            }
            other => panic!("Expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_context_leaves_store_not_initialised_alone() {
        let result: Result<()> = Err(SbomManagerError::StoreNotInitialised);
        assert!(matches!(
            result.context("listing"),
            Err(SbomManagerError::StoreNotInitialised)
        ));
    }

    #[test]
    fn test_with_context_lazy_evaluation() {
        let mut called = false;

        let ok_result: Result<i32> = Ok(42);
        let _ = ok_result.with_context(|| {
            called = true;
            "should not be called"
        });
        assert!(!called, "Closure should not be called for Ok result");

        let err_result: Result<i32> = Err(SbomManagerError::config("error"));
        let _ = err_result.with_context(|| {
            called = true;
            "should be called"
        });
        assert!(called, "Closure should be called for Err result");
    }

    #[test]
    fn test_option_context() {
        let none_value: Option<i32> = None;
        match none_value.context_none("missing value") {
            Err(SbomManagerError::Config(msg)) => assert_eq!(msg, "missing value"),
            other => panic!("Expected Config error, got {other:?}"),
        }
        assert_eq!(Some(7).context_none("unused").ok(), Some(7));
    }

    #[test]
    fn test_chain_context_helper() {
        assert_eq!(chain_context("new", ""), "new");
        assert_eq!(chain_context("new", "existing"), "new: existing");
    }
}
