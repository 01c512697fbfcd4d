//! Archive extraction for package installs.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

/// Result type for extraction operations.
pub type ExtractResult<T> = Result<T, ExtractError>;

/// Errors that can occur during archive extraction.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The archive file could not be opened.
    #[error("failed to open archive {path}: {source}")]
    OpenFailed { path: PathBuf, source: io::Error },

    /// The archive is not a valid zip file or extraction failed mid-way.
    #[error("failed to extract {path}: {reason}")]
    InvalidArchive { path: PathBuf, reason: String },

    /// An existing install directory could not be replaced.
    #[error("failed to replace {path}: {source}")]
    ReplaceFailed { path: PathBuf, source: io::Error },
}

/// Extractor for package archives.
///
/// This trait abstracts archive extraction to support different formats and
/// enable testing.
pub trait ArchiveExtractor: Send + Sync {
    /// Extract `archive` into `dest`, replacing any existing directory.
    ///
    /// # Returns
    ///
    /// The number of entries extracted.
    fn extract(&self, archive: &Path, dest: &Path) -> ExtractResult<usize>;
}

/// Zip-based implementation of [`ArchiveExtractor`].
///
/// Registry packages ship as flat zip archives extracted directly into the
/// package's install directory.
#[derive(Debug, Default)]
pub struct ZipExtractor;

impl ZipExtractor {
    /// Create a new zip extractor.
    pub fn new() -> Self {
        Self
    }
}

impl ArchiveExtractor for ZipExtractor {
    fn extract(&self, archive: &Path, dest: &Path) -> ExtractResult<usize> {
        // Replace semantics: a stale install never survives an update.
        if dest.exists() {
            debug!(path = %dest.display(), "removing existing install directory");
            fs::remove_dir_all(dest).map_err(|e| ExtractError::ReplaceFailed {
                path: dest.to_path_buf(),
                source: e,
            })?;
        }
        fs::create_dir_all(dest).map_err(|e| ExtractError::ReplaceFailed {
            path: dest.to_path_buf(),
            source: e,
        })?;

        let file = File::open(archive).map_err(|e| ExtractError::OpenFailed {
            path: archive.to_path_buf(),
            source: e,
        })?;

        let mut zip = zip::ZipArchive::new(file).map_err(|e| ExtractError::InvalidArchive {
            path: archive.to_path_buf(),
            reason: e.to_string(),
        })?;

        let entries = zip.len();
        zip.extract(dest).map_err(|e| ExtractError::InvalidArchive {
            path: archive.to_path_buf(),
            reason: e.to_string(),
        })?;

        info!(
            archive = %archive.display(),
            dest = %dest.display(),
            entries,
            "extracted archive"
        );
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    fn write_test_zip(path: &Path) {
        let file = File::create(path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let options = SimpleFileOptions::default();

        writer.start_file("plugin.dll", options).unwrap();
        writer.write_all(b"binary").unwrap();
        writer.start_file("README.md", options).unwrap();
        writer.write_all(b"# Example").unwrap();
        writer.finish().unwrap();
    }

    #[test]
    fn test_extract_zip() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("pkg.zip");
        write_test_zip(&archive);

        let dest = temp.path().join("installed/alice-ExampleMod");
        let entries = ZipExtractor::new().extract(&archive, &dest).unwrap();

        assert_eq!(entries, 2);
        assert_eq!(fs::read(dest.join("plugin.dll")).unwrap(), b"binary");
    }

    #[test]
    fn test_extract_replaces_existing_directory() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("pkg.zip");
        write_test_zip(&archive);

        let dest = temp.path().join("alice-ExampleMod");
        fs::create_dir_all(&dest).unwrap();
        fs::write(dest.join("stale.dll"), b"old").unwrap();

        ZipExtractor::new().extract(&archive, &dest).unwrap();

        assert!(!dest.join("stale.dll").exists());
        assert!(dest.join("plugin.dll").exists());
    }

    #[test]
    fn test_extract_invalid_archive() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("broken.zip");
        fs::write(&archive, b"not a zip").unwrap();

        let result = ZipExtractor::new().extract(&archive, &temp.path().join("out"));
        assert!(matches!(result, Err(ExtractError::InvalidArchive { .. })));
    }

    #[test]
    fn test_extract_missing_archive() {
        let temp = TempDir::new().unwrap();
        let result =
            ZipExtractor::new().extract(&temp.path().join("nope.zip"), &temp.path().join("out"));
        assert!(matches!(result, Err(ExtractError::OpenFailed { .. })));
    }
}
