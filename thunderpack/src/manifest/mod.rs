//! Deployable manifest and reconciliation.
//!
//! The manifest is the declarative dependency list plus semantic version
//! shipped with a mod or modpack (`manifest.json`). It is mutated only by
//! [`reconcile`], which diffs the ledger's current dependency set against
//! the previous manifest, classifies each difference as an addition, update,
//! or removal, and bumps the manifest version accordingly.

mod changeset;
mod digest;
mod error;
mod reconciler;

pub use changeset::ChangeSet;
pub use digest::directory_digest;
pub use error::{ManifestError, ManifestResult};
pub use reconciler::{reconcile, ManifestTemplate, Reconciliation};

use std::path::Path;

use semver::Version;
use serde::{Deserialize, Serialize};

use crate::fsutil::write_atomic;

/// The version a first-time manifest seeds at.
///
/// No changelog section is ever generated for this version.
pub fn seed_version() -> Version {
    Version::new(1, 0, 0)
}

/// The deployable manifest of a mod or modpack project.
///
/// `dependencies` is an ordered set of `<fullName>-<version>` strings;
/// uniqueness is by full name, not by the whole string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Project name.
    pub name: String,

    /// Semantic version of the manifest.
    pub version_number: Version,

    /// Project website URL.
    #[serde(default)]
    pub website_url: String,

    /// Project description.
    #[serde(default)]
    pub description: String,

    /// Ordered dependency reference strings.
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl Manifest {
    /// Load the manifest at `path`, returning `None` when the file does not
    /// exist (a first-time project).
    pub fn load(path: &Path) -> ManifestResult<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path).map_err(|e| ManifestError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
        let manifest =
            serde_json::from_str(&content).map_err(|e| ManifestError::ParseFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
        Ok(Some(manifest))
    }

    /// Persist the manifest to `path` with an atomic replacement.
    pub fn save(&self, path: &Path) -> ManifestResult<()> {
        let serialized =
            serde_json::to_string_pretty(self).map_err(|e| ManifestError::ParseFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
        write_atomic(path, &serialized).map_err(|e| ManifestError::WriteFailed {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn manifest() -> Manifest {
        Manifest {
            name: "ExamplePack".to_string(),
            version_number: Version::new(1, 2, 3),
            website_url: "https://example.com".to_string(),
            description: "A pack".to_string(),
            dependencies: vec!["alice-ExampleMod-1.0.0".to_string()],
        }
    }

    #[test]
    fn test_load_missing_manifest() {
        let temp = TempDir::new().unwrap();
        let loaded = Manifest::load(&temp.path().join("manifest.json")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("manifest.json");

        let original = manifest();
        original.save(&path).unwrap();
        let loaded = Manifest::load(&path).unwrap().unwrap();

        assert_eq!(loaded, original);
    }

    #[test]
    fn test_version_serialized_as_string() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("manifest.json");
        manifest().save(&path).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["version_number"], "1.2.3");
    }

    #[test]
    fn test_load_corrupt_manifest() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("manifest.json");
        std::fs::write(&path, "{broken").unwrap();

        assert!(matches!(
            Manifest::load(&path),
            Err(ManifestError::ParseFailed { .. })
        ));
    }
}
