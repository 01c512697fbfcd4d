//! Installed-package ledger.
//!
//! The ledger is the single source of truth for "what is installed": a
//! persistent mapping of installed package name to installed version,
//! stored as JSON (`{"dependencies": {name: version}}`). Entries are
//! created on first successful install, overwritten on update, and deleted
//! on removal. Every mutation is persisted immediately with an atomic file
//! replacement; a write failure aborts the surrounding operation since
//! downstream state would otherwise be inconsistent.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::fsutil::write_atomic;

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Errors that can occur while reading or persisting the ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The ledger file exists but could not be read.
    #[error("failed to read ledger {path}: {source}")]
    ReadFailed { path: PathBuf, source: io::Error },

    /// The ledger file could not be written.
    #[error("failed to write ledger {path}: {source}")]
    WriteFailed { path: PathBuf, source: io::Error },

    /// The ledger file holds invalid JSON.
    #[error("failed to parse ledger {path}: {source}")]
    ParseFailed {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// On-disk shape of the ledger.
#[derive(Debug, Default, Serialize, Deserialize)]
struct LedgerFile {
    /// Installed package name -> installed version.
    #[serde(default)]
    dependencies: BTreeMap<String, String>,

    /// Content digest of the tracked config folder, if tracking is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    config_digest: Option<String>,
}

/// Persistent record of installed packages.
#[derive(Debug)]
pub struct Ledger {
    path: PathBuf,
    file: LedgerFile,
}

impl Ledger {
    /// Open the ledger at `path`, creating an empty one if it is missing.
    pub fn open(path: impl Into<PathBuf>) -> LedgerResult<Self> {
        let path = path.into();

        let file = if path.exists() {
            let content =
                std::fs::read_to_string(&path).map_err(|e| LedgerError::ReadFailed {
                    path: path.clone(),
                    source: e,
                })?;
            serde_json::from_str(&content).map_err(|e| LedgerError::ParseFailed {
                path: path.clone(),
                source: e,
            })?
        } else {
            debug!(path = %path.display(), "ledger missing, creating");
            LedgerFile::default()
        };

        let ledger = Self { path, file };
        if !ledger.path.exists() {
            ledger.save()?;
        }
        Ok(ledger)
    }

    /// Installed package name -> version map, in name order.
    pub fn dependencies(&self) -> &BTreeMap<String, String> {
        &self.file.dependencies
    }

    /// Installed version of a package, if present.
    pub fn installed_version(&self, name: &str) -> Option<&str> {
        self.file.dependencies.get(name).map(String::as_str)
    }

    /// Number of installed packages.
    pub fn len(&self) -> usize {
        self.file.dependencies.len()
    }

    /// Whether the ledger holds no packages.
    pub fn is_empty(&self) -> bool {
        self.file.dependencies.is_empty()
    }

    /// Upsert a package entry and persist.
    ///
    /// Returns `true` when an existing entry was updated, `false` on first
    /// install.
    pub fn record(&mut self, name: &str, version: &str) -> LedgerResult<bool> {
        let updated = self
            .file
            .dependencies
            .insert(name.to_string(), version.to_string())
            .is_some();
        self.save()?;

        info!(
            package = name,
            version,
            "{} package in ledger",
            if updated { "updated" } else { "recorded" }
        );
        Ok(updated)
    }

    /// Remove a package entry and persist.
    ///
    /// Returns `false` (without writing) when the name was not present.
    pub fn remove(&mut self, name: &str) -> LedgerResult<bool> {
        if self.file.dependencies.remove(name).is_none() {
            return Ok(false);
        }
        self.save()?;
        info!(package = name, "removed package from ledger");
        Ok(true)
    }

    /// Stored config-folder digest, if any.
    pub fn config_digest(&self) -> Option<&str> {
        self.file.config_digest.as_deref()
    }

    /// Replace the stored config-folder digest and persist.
    pub fn set_config_digest(&mut self, digest: impl Into<String>) -> LedgerResult<()> {
        self.file.config_digest = Some(digest.into());
        self.save()
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> LedgerResult<()> {
        // Serializing a plain map cannot fail; unwrap would hide the one
        // interesting failure mode (I/O), which is mapped below.
        let serialized = serde_json::to_string_pretty(&self.file).map_err(|e| {
            LedgerError::ParseFailed {
                path: self.path.clone(),
                source: e,
            }
        })?;
        write_atomic(&self.path, &serialized).map_err(|e| LedgerError::WriteFailed {
            path: self.path.clone(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_creates_missing_ledger() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("thunderpack.json");

        let ledger = Ledger::open(&path).unwrap();

        assert!(ledger.is_empty());
        assert!(path.exists());
    }

    #[test]
    fn test_record_and_reload() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("thunderpack.json");

        let mut ledger = Ledger::open(&path).unwrap();
        let updated = ledger.record("ExampleMod", "1.0.0").unwrap();
        assert!(!updated);

        let reloaded = Ledger::open(&path).unwrap();
        assert_eq!(reloaded.installed_version("ExampleMod"), Some("1.0.0"));
        assert_eq!(reloaded.len(), 1);
    }

    #[test]
    fn test_record_overwrites_on_update() {
        let temp = TempDir::new().unwrap();
        let mut ledger = Ledger::open(temp.path().join("l.json")).unwrap();

        ledger.record("ExampleMod", "1.0.0").unwrap();
        let updated = ledger.record("ExampleMod", "1.1.0").unwrap();

        assert!(updated);
        assert_eq!(ledger.installed_version("ExampleMod"), Some("1.1.0"));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_remove() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("l.json");
        let mut ledger = Ledger::open(&path).unwrap();

        ledger.record("ExampleMod", "1.0.0").unwrap();
        assert!(ledger.remove("ExampleMod").unwrap());
        assert!(!ledger.remove("ExampleMod").unwrap());

        let reloaded = Ledger::open(&path).unwrap();
        assert!(reloaded.is_empty());
    }

    #[test]
    fn test_config_digest_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("l.json");

        let mut ledger = Ledger::open(&path).unwrap();
        assert!(ledger.config_digest().is_none());
        ledger.set_config_digest("abc123").unwrap();

        let reloaded = Ledger::open(&path).unwrap();
        assert_eq!(reloaded.config_digest(), Some("abc123"));
    }

    #[test]
    fn test_parse_failure_on_corrupt_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("l.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(
            Ledger::open(&path),
            Err(LedgerError::ParseFailed { .. })
        ));
    }

    #[test]
    fn test_on_disk_shape() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("l.json");
        let mut ledger = Ledger::open(&path).unwrap();
        ledger.record("ExampleMod", "1.0.0").unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["dependencies"]["ExampleMod"], "1.0.0");
    }
}
