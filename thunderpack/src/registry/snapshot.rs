//! In-memory registry snapshot with a disk-backed cache.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::fsutil::write_atomic;

use super::client::RegistryClient;
use super::error::{RegistryError, RegistryResult};
use super::model::PackageRecord;

/// A fully resolved package: one catalog entry bound to one version.
///
/// Produced by [`RegistrySnapshot::locate`]; owns its data so it can outlive
/// the snapshot borrow during recursive installation.
#[derive(Debug, Clone)]
pub struct ResolvedPackage {
    /// Bare package name.
    pub name: String,
    /// Author-qualified name.
    pub full_name: String,
    /// Package owner.
    pub owner: String,
    /// The bound version number.
    pub version: String,
    /// Archive URL for the bound version.
    pub download_url: String,
    /// Dependency reference strings of the bound version.
    pub dependencies: Vec<String>,
    /// Project website of the bound version, if any.
    pub website_url: String,
    /// Description of the bound version.
    pub description: String,
}

/// An in-memory catalog of all known packages.
///
/// The snapshot is refreshed at most once per process invocation: if the
/// cache file on disk is younger than the staleness window it is reused,
/// otherwise the catalog is re-fetched and the cache atomically replaced.
/// The refresh completes before any resolution occurs, so consumers never
/// observe a partial snapshot. The snapshot is read-only afterwards.
#[derive(Debug)]
pub struct RegistrySnapshot {
    packages: Vec<PackageRecord>,
    index: HashMap<String, usize>,
}

impl RegistrySnapshot {
    /// Build a snapshot directly from catalog records.
    ///
    /// When two records share a name the first one wins, matching the
    /// lookup behavior of the catalog feed.
    pub fn from_packages(packages: Vec<PackageRecord>) -> Self {
        let mut index = HashMap::with_capacity(packages.len());
        for (i, record) in packages.iter().enumerate() {
            index.entry(record.name.clone()).or_insert(i);
        }
        Self { packages, index }
    }

    /// Load the snapshot from the cache file, refreshing it when stale.
    ///
    /// The cache is considered stale when it is missing, unreadable, or its
    /// modification time is older than `max_age`. A stale cache triggers a
    /// catalog fetch through `client` and an atomic rewrite of the file.
    ///
    /// # Errors
    ///
    /// Fails when a needed refresh cannot be fetched or the cache cannot be
    /// written. A fresh cache that fails to parse also triggers a refresh
    /// rather than an error.
    pub fn load_or_refresh(
        client: &dyn RegistryClient,
        cache_path: &Path,
        max_age: Duration,
    ) -> RegistryResult<Self> {
        if cache_is_fresh(cache_path, max_age) {
            match load_cache(cache_path) {
                Ok(packages) => {
                    debug!(
                        path = %cache_path.display(),
                        packages = packages.len(),
                        "registry snapshot cache is fresh"
                    );
                    return Ok(Self::from_packages(packages));
                }
                Err(e) => {
                    warn!(
                        path = %cache_path.display(),
                        error = %e,
                        "snapshot cache unreadable, refreshing"
                    );
                }
            }
        }

        info!("refreshing registry snapshot");
        let packages = client.fetch_catalog()?;

        let serialized =
            serde_json::to_string(&packages).map_err(|e| RegistryError::ParseFailed {
                url: cache_path.display().to_string(),
                reason: e.to_string(),
            })?;
        write_atomic(cache_path, &serialized).map_err(|e| RegistryError::CacheWriteFailed {
            path: cache_path.to_path_buf(),
            source: e,
        })?;

        info!(packages = packages.len(), "registry snapshot refreshed");
        Ok(Self::from_packages(packages))
    }

    /// Number of packages in the snapshot.
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Whether the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Look up a raw catalog record by name.
    pub fn get(&self, name: &str) -> Option<&PackageRecord> {
        self.index.get(name).map(|&i| &self.packages[i])
    }

    /// Resolve a package name, optionally pinned to a version.
    ///
    /// When `version` is omitted the latest (first) version entry is bound.
    /// When the pinned version is not known the resolution falls back to the
    /// latest with a logged warning - a stale pin never fails an install.
    ///
    /// Returns `None` when the name has no catalog entry or the entry has no
    /// versions; callers must treat that as "skip and report", never as
    /// fatal to a batch operation.
    pub fn locate(&self, name: &str, version: Option<&str>) -> Option<ResolvedPackage> {
        let record = self.get(name)?;

        let bound = match version {
            Some(number) => match record.find_version(number) {
                Some(v) => v,
                None => {
                    warn!(
                        package = name,
                        version = number,
                        "pinned version not in registry, falling back to latest"
                    );
                    record.latest()?
                }
            },
            None => record.latest()?,
        };

        Some(ResolvedPackage {
            name: record.name.clone(),
            full_name: record.full_name.clone(),
            owner: record.owner.clone(),
            version: bound.version_number.clone(),
            download_url: bound.download_url.clone(),
            dependencies: bound.dependencies.clone(),
            website_url: bound.website_url.clone(),
            description: bound.description.clone(),
        })
    }
}

/// Check whether the cache file exists and is younger than `max_age`.
fn cache_is_fresh(path: &Path, max_age: Duration) -> bool {
    let Ok(metadata) = fs::metadata(path) else {
        return false;
    };
    let Ok(modified) = metadata.modified() else {
        return false;
    };
    match modified.elapsed() {
        Ok(age) => age <= max_age,
        // Clock skew puts the mtime in the future; treat as fresh.
        Err(_) => true,
    }
}

/// Read and parse the cache file.
fn load_cache(path: &Path) -> RegistryResult<Vec<PackageRecord>> {
    let content = fs::read_to_string(path).map_err(|e| RegistryError::CacheReadFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    serde_json::from_str(&content).map_err(|e| RegistryError::ParseFailed {
        url: path.display().to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::model::VersionRecord;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    fn version(number: &str, dependencies: &[&str]) -> VersionRecord {
        VersionRecord {
            version_number: number.to_string(),
            download_url: format!("https://example.com/{}.zip", number),
            dependencies: dependencies.iter().map(|d| d.to_string()).collect(),
            is_active: true,
            description: String::new(),
            website_url: String::new(),
        }
    }

    fn record(owner: &str, name: &str, versions: Vec<VersionRecord>) -> PackageRecord {
        PackageRecord {
            name: name.to_string(),
            full_name: format!("{}-{}", owner, name),
            owner: owner.to_string(),
            package_url: String::new(),
            is_deprecated: false,
            versions,
        }
    }

    struct CountingClient {
        catalog: Vec<PackageRecord>,
        fetches: AtomicUsize,
    }

    impl CountingClient {
        fn new(catalog: Vec<PackageRecord>) -> Self {
            Self {
                catalog,
                fetches: AtomicUsize::new(0),
            }
        }
    }

    impl RegistryClient for CountingClient {
        fn fetch_catalog(&self) -> RegistryResult<Vec<PackageRecord>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(self.catalog.clone())
        }
    }

    #[test]
    fn test_locate_latest() {
        let snapshot = RegistrySnapshot::from_packages(vec![record(
            "alice",
            "ExampleMod",
            vec![version("2.0.0", &[]), version("1.0.0", &[])],
        )]);

        let resolved = snapshot.locate("ExampleMod", None).unwrap();
        assert_eq!(resolved.version, "2.0.0");
        assert_eq!(resolved.full_name, "alice-ExampleMod");
    }

    #[test]
    fn test_locate_pinned() {
        let snapshot = RegistrySnapshot::from_packages(vec![record(
            "alice",
            "ExampleMod",
            vec![version("2.0.0", &[]), version("1.0.0", &[])],
        )]);

        let resolved = snapshot.locate("ExampleMod", Some("1.0.0")).unwrap();
        assert_eq!(resolved.version, "1.0.0");
    }

    #[test]
    fn test_locate_missing_pin_falls_back_to_latest() {
        let snapshot = RegistrySnapshot::from_packages(vec![record(
            "alice",
            "ExampleMod",
            vec![version("2.0.0", &[])],
        )]);

        let resolved = snapshot.locate("ExampleMod", Some("9.9.9")).unwrap();
        assert_eq!(resolved.version, "2.0.0");
    }

    #[test]
    fn test_locate_unknown_name() {
        let snapshot = RegistrySnapshot::from_packages(Vec::new());
        assert!(snapshot.locate("Nope", None).is_none());
    }

    #[test]
    fn test_locate_entry_without_versions() {
        let snapshot = RegistrySnapshot::from_packages(vec![record("alice", "Empty", vec![])]);
        assert!(snapshot.locate("Empty", None).is_none());
    }

    #[test]
    fn test_refresh_writes_cache() {
        let temp = TempDir::new().unwrap();
        let cache_path = temp.path().join("cache/current_packages.json");
        let client = CountingClient::new(vec![record(
            "alice",
            "ExampleMod",
            vec![version("1.0.0", &[])],
        )]);

        let snapshot =
            RegistrySnapshot::load_or_refresh(&client, &cache_path, Duration::from_secs(3600))
                .unwrap();

        assert_eq!(snapshot.len(), 1);
        assert_eq!(client.fetches.load(Ordering::SeqCst), 1);
        assert!(cache_path.exists());
    }

    #[test]
    fn test_fresh_cache_skips_fetch() {
        let temp = TempDir::new().unwrap();
        let cache_path = temp.path().join("current_packages.json");
        let client = CountingClient::new(vec![record(
            "alice",
            "ExampleMod",
            vec![version("1.0.0", &[])],
        )]);

        RegistrySnapshot::load_or_refresh(&client, &cache_path, Duration::from_secs(3600)).unwrap();
        let snapshot =
            RegistrySnapshot::load_or_refresh(&client, &cache_path, Duration::from_secs(3600))
                .unwrap();

        assert_eq!(snapshot.len(), 1);
        assert_eq!(client.fetches.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_zero_max_age_always_refreshes() {
        let temp = TempDir::new().unwrap();
        let cache_path = temp.path().join("current_packages.json");
        let client = CountingClient::new(Vec::new());

        RegistrySnapshot::load_or_refresh(&client, &cache_path, Duration::ZERO).unwrap();
        RegistrySnapshot::load_or_refresh(&client, &cache_path, Duration::ZERO).unwrap();

        assert_eq!(client.fetches.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_corrupt_cache_triggers_refresh() {
        let temp = TempDir::new().unwrap();
        let cache_path = temp.path().join("current_packages.json");
        fs::write(&cache_path, "not json").unwrap();

        let client = CountingClient::new(vec![record(
            "alice",
            "ExampleMod",
            vec![version("1.0.0", &[])],
        )]);

        let snapshot =
            RegistrySnapshot::load_or_refresh(&client, &cache_path, Duration::from_secs(3600))
                .unwrap();

        assert_eq!(snapshot.len(), 1);
        assert_eq!(client.fetches.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_duplicate_names_first_wins() {
        let snapshot = RegistrySnapshot::from_packages(vec![
            record("alice", "Dup", vec![version("1.0.0", &[])]),
            record("bob", "Dup", vec![version("2.0.0", &[])]),
        ]);

        let resolved = snapshot.locate("Dup", None).unwrap();
        assert_eq!(resolved.owner, "alice");
    }
}
