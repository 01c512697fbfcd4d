//! HTTP download of package archives.
//!
//! Downloads are idempotent at the file level: a previously completed,
//! non-empty archive is reused; an empty or missing file is (re)fetched.
//! Transient network failures trigger a bounded full-request retry loop
//! with linear backoff - there is no resumable/partial download support.

use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::Client;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Default timeout for archive downloads (5 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Base delay between retry attempts; multiplied by the attempt number.
const RETRY_BACKOFF: Duration = Duration::from_millis(500);

/// Result type for download operations.
pub type DownloadResult<T> = Result<T, DownloadError>;

/// Errors that can occur during an archive download.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The HTTP request failed (connection error, reset, timeout).
    #[error("request to {url} failed: {reason}")]
    RequestFailed { url: String, reason: String },

    /// The server answered with a non-success status.
    #[error("download of {url} failed with HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    /// The archive could not be written to disk.
    #[error("failed to write {path}: {source}")]
    WriteFailed { path: PathBuf, source: io::Error },

    /// All attempts failed.
    #[error("download of {url} failed after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        last_error: String,
    },
}

/// Downloader for package archives.
///
/// This trait abstracts archive fetching to enable testing without network
/// access.
pub trait ArchiveDownloader: Send + Sync {
    /// Download `url` to `dest`, reusing a completed prior download.
    ///
    /// # Returns
    ///
    /// The size of the archive on disk in bytes.
    fn download(&self, url: &str, dest: &Path) -> DownloadResult<u64>;
}

/// HTTP-based implementation of [`ArchiveDownloader`].
#[derive(Clone)]
pub struct HttpArchiveDownloader {
    client: Client,
    max_retries: u32,
}

impl std::fmt::Debug for HttpArchiveDownloader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpArchiveDownloader")
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl HttpArchiveDownloader {
    /// Create a downloader that retries a failed download `max_retries`
    /// times before giving up.
    pub fn new(max_retries: u32) -> Self {
        Self::with_timeout(max_retries, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a downloader with a custom request timeout.
    pub fn with_timeout(max_retries: u32, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("thunderpack/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("failed to create HTTP client");

        Self {
            client,
            max_retries,
        }
    }

    /// Perform one full-request fetch attempt.
    fn fetch_once(&self, url: &str, dest: &Path) -> DownloadResult<u64> {
        let mut response =
            self.client
                .get(url)
                .send()
                .map_err(|e| DownloadError::RequestFailed {
                    url: url.to_string(),
                    reason: e.to_string(),
                })?;

        if !response.status().is_success() {
            return Err(DownloadError::HttpStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let file = File::create(dest).map_err(|e| DownloadError::WriteFailed {
            path: dest.to_path_buf(),
            source: e,
        })?;
        let mut writer = BufWriter::new(file);

        let bytes = io::copy(&mut response, &mut writer).map_err(|e| {
            DownloadError::RequestFailed {
                url: url.to_string(),
                reason: format!("stream error: {}", e),
            }
        })?;

        Ok(bytes)
    }
}

impl ArchiveDownloader for HttpArchiveDownloader {
    fn download(&self, url: &str, dest: &Path) -> DownloadResult<u64> {
        // A completed prior download is reused; a zero-byte file is a
        // partial failure and gets re-fetched.
        if let Ok(metadata) = fs::metadata(dest) {
            if metadata.len() > 0 {
                debug!(path = %dest.display(), "archive already downloaded");
                return Ok(metadata.len());
            }
        }

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|e| DownloadError::WriteFailed {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        info!(url, path = %dest.display(), "downloading archive");

        let attempts = self.max_retries + 1;
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            match self.fetch_once(url, dest) {
                Ok(bytes) if bytes > 0 => return Ok(bytes),
                Ok(_) => last_error = "empty response body".to_string(),
                Err(e) => last_error = e.to_string(),
            }

            // Leave no partial file behind for the next attempt to reuse.
            fs::remove_file(dest).ok();

            if attempt < attempts {
                warn!(url, attempt, error = %last_error, "download failed, retrying");
                std::thread::sleep(RETRY_BACKOFF * attempt);
            }
        }

        Err(DownloadError::RetriesExhausted {
            url: url.to_string(),
            attempts,
            last_error,
        })
    }
}
