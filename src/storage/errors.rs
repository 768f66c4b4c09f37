//! Storage error types
//!
//! Storage errors never corrupt in-memory state; the shell reports them and
//! keeps running.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug, Error)]
pub enum StorageError {
    /// Disk I/O failure
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// File content is not valid JSON of the expected shape
    #[error("malformed data file '{path}': {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// JSON is well-formed but breaks a schema invariant
    #[error("invalid schema file '{path}': {reason}")]
    InvalidSchema { path: PathBuf, reason: String },

    /// A stored record lacks an integer `ID`
    #[error("invalid table file '{path}': {reason}")]
    InvalidTable { path: PathBuf, reason: String },
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn malformed(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Malformed {
            path: path.into(),
            source,
        }
    }

    /// Returns the file the error refers to
    pub fn path(&self) -> &std::path::Path {
        match self {
            StorageError::Io { path, .. }
            | StorageError::Malformed { path, .. }
            | StorageError::InvalidSchema { path, .. }
            | StorageError::InvalidTable { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display_includes_path() {
        let err = StorageError::io(
            "/tmp/db_meta.json",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        let display = err.to_string();
        assert!(display.contains("/tmp/db_meta.json"));
        assert!(display.contains("denied"));
        assert_eq!(err.path(), std::path::Path::new("/tmp/db_meta.json"));
    }
}
