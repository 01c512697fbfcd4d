//! Error types for manifest operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for manifest operations.
pub type ManifestResult<T> = Result<T, ManifestError>;

/// Errors that can occur while reading or persisting the manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The manifest file exists but could not be read.
    #[error("failed to read manifest {path}: {source}")]
    ReadFailed { path: PathBuf, source: io::Error },

    /// The manifest file could not be written.
    #[error("failed to write manifest {path}: {source}")]
    WriteFailed { path: PathBuf, source: io::Error },

    /// The manifest file holds invalid JSON.
    #[error("failed to parse manifest {path}: {source}")]
    ParseFailed {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The tracked config folder could not be hashed.
    #[error("failed to hash config folder {path}: {source}")]
    DigestFailed { path: PathBuf, source: io::Error },
}
