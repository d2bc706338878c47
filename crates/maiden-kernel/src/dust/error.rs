//! Dust error types.

use std::io;
use std::path::Path;
use thiserror::Error;

/// Error taxonomy for resource resolution and mutation.
///
/// The HTTP layer maps each variant onto a status code.
#[derive(Debug, Error)]
pub enum DustError {
    /// File or directory not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Expected a directory.
    #[error("not a directory: {0}")]
    NotADirectory(String),

    /// Missing or malformed request input.
    #[error("{0}")]
    BadRequest(String),

    /// Resolved path is not under the data root.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Any other filesystem failure.
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl DustError {
    /// Create a NotFound error.
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound(path.into())
    }

    /// Create a NotADirectory error.
    pub fn not_a_directory(path: impl Into<String>) -> Self {
        Self::NotADirectory(path.into())
    }

    /// Create a BadRequest error.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    /// Create an InvalidPath error.
    pub fn invalid_path(path: impl Into<String>) -> Self {
        Self::InvalidPath(path.into())
    }

    /// Classify an I/O error raised while operating on `path`.
    ///
    /// `NotFound` and `NotADirectory` keep their identity; everything else
    /// (permissions, full disk, cross-device rename, ...) becomes `Io`.
    pub fn from_io(err: io::Error, path: &Path) -> Self {
        let shown = path.display().to_string();
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound(shown),
            io::ErrorKind::NotADirectory => Self::NotADirectory(shown),
            _ => Self::Io {
                context: shown,
                source: err,
            },
        }
    }

    /// Like [`DustError::from_io`], but never downgrades to `NotFound`.
    ///
    /// Used where a missing path is a failure of the operation itself
    /// (writing into a missing parent directory) rather than an absent
    /// resource.
    pub fn io(err: io::Error, path: &Path) -> Self {
        Self::Io {
            context: path.display().to_string(),
            source: err,
        }
    }
}

/// Dust result type.
pub type DustResult<T> = Result<T, DustError>;
