//! Catalog data model.
//!
//! These types mirror the registry's `/api/v1/package/` JSON: an array of
//! package entries, each with a nested array of versions ordered newest
//! first. Records are immutable for the duration of a run once fetched.

use serde::{Deserialize, Serialize};

/// A package entry in the registry catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageRecord {
    /// Bare package name (e.g. `ExampleMod`).
    pub name: String,

    /// Author-qualified name (e.g. `alice-ExampleMod`).
    pub full_name: String,

    /// Package owner (author).
    pub owner: String,

    /// URL of the package page on the registry.
    #[serde(default)]
    pub package_url: String,

    /// Whether the registry has marked this package as deprecated.
    #[serde(default)]
    pub is_deprecated: bool,

    /// Known versions, newest first.
    #[serde(default)]
    pub versions: Vec<VersionRecord>,
}

impl PackageRecord {
    /// The latest known version (the first entry), if any.
    pub fn latest(&self) -> Option<&VersionRecord> {
        self.versions.first()
    }

    /// Find an exact version by its version number.
    pub fn find_version(&self, version_number: &str) -> Option<&VersionRecord> {
        self.versions
            .iter()
            .find(|v| v.version_number == version_number)
    }
}

/// A single version of a package.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionRecord {
    /// Semantic version triple, e.g. `1.4.2`.
    pub version_number: String,

    /// URL of the version's archive.
    pub download_url: String,

    /// Dependency reference strings (`<author>-<name>-<version>`).
    #[serde(default)]
    pub dependencies: Vec<String>,

    /// Whether the registry still serves this version.
    #[serde(default = "default_is_active")]
    pub is_active: bool,

    /// Version description.
    #[serde(default)]
    pub description: String,

    /// Project website, if any.
    #[serde(default)]
    pub website_url: String,
}

fn default_is_active() -> bool {
    true
}
