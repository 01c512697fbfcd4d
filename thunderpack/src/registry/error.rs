//! Error types for registry operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors that can occur while fetching or caching the registry catalog.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The catalog fetch failed.
    #[error("failed to fetch package catalog from {url}: {reason}")]
    FetchFailed { url: String, reason: String },

    /// The catalog fetch timed out.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout { url: String, timeout_secs: u64 },

    /// The catalog response could not be parsed.
    #[error("failed to parse package catalog from {url}: {reason}")]
    ParseFailed { url: String, reason: String },

    /// The snapshot cache file could not be read.
    #[error("failed to read snapshot cache {path}: {source}")]
    CacheReadFailed { path: PathBuf, source: io::Error },

    /// The snapshot cache file could not be written.
    #[error("failed to write snapshot cache {path}: {source}")]
    CacheWriteFailed { path: PathBuf, source: io::Error },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_failed_display() {
        let err = RegistryError::FetchFailed {
            url: "https://example.com/api".to_string(),
            reason: "connection refused".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "failed to fetch package catalog from https://example.com/api: connection refused"
        );
    }
}
