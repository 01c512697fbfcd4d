//! Error types for package installation.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::ledger::LedgerError;

/// Result type for installer operations.
pub type InstallResult<T> = Result<T, InstallError>;

/// Errors that can occur while installing or removing packages.
///
/// `NotFound` and dependency-reference parse failures are deliberately not
/// represented here: both are per-branch skips reported through the
/// [`InstallReport`](super::InstallReport), never errors.
#[derive(Debug, Error)]
pub enum InstallError {
    /// The archive download failed after exhausting retries.
    #[error("failed to install {package}: download of {url} failed: {reason}")]
    DownloadFailed {
        package: String,
        url: String,
        reason: String,
    },

    /// The downloaded archive could not be extracted.
    #[error("failed to install {package}: {reason}")]
    ExtractionFailed { package: String, reason: String },

    /// An installed package directory could not be deleted.
    #[error("failed to remove {path}: {source}")]
    RemoveFailed { path: PathBuf, source: io::Error },

    /// Persisting the ledger failed; the operation aborts.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl InstallError {
    /// Whether this failure corrupts shared state and must abort the whole
    /// batch, as opposed to a per-branch failure siblings can survive.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Ledger(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_failed_display() {
        let err = InstallError::DownloadFailed {
            package: "alice-ExampleMod".to_string(),
            url: "https://example.com/a.zip".to_string(),
            reason: "connection reset".to_string(),
        };
        assert!(err.to_string().contains("alice-ExampleMod"));
        assert!(err.to_string().contains("connection reset"));
        assert!(!err.is_fatal());
    }
}
