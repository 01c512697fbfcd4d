//! Recursive dependency installer.
//!
//! Given a root package name, [`PackageInstaller`] resolves and installs its
//! full dependency closure:
//!
//! 1. An explicit visited-set breaks cycles and deduplicates shared
//!    transitive dependencies - each package is processed at most once per
//!    run.
//! 2. A package missing from the registry snapshot is logged and skipped;
//!    one missing dependency never aborts the whole closure.
//! 3. Dependency reference strings are parsed with the
//!    [`PackageRef`](crate::registry::PackageRef) grammar; parse failures
//!    are logged and skipped.
//! 4. In pin-only mode (`download = false`) the version is recorded in the
//!    ledger without fetching the archive.
//! 5. Otherwise the archive is fetched (reusing a completed prior download)
//!    and extracted into the install directory, replacing any existing
//!    package directory.
//!
//! Failures are isolated per branch: only ledger persistence failures abort
//! the surrounding batch.

mod download;
mod error;
mod extractor;

pub use download::{ArchiveDownloader, DownloadError, DownloadResult, HttpArchiveDownloader};
pub use error::{InstallError, InstallResult};
pub use extractor::{ArchiveExtractor, ExtractError, ExtractResult, ZipExtractor};

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use tracing::{error, info, warn};

use crate::ledger::Ledger;
use crate::registry::{PackageRef, RegistrySnapshot, ResolvedPackage};

/// A package that was skipped rather than installed.
#[derive(Debug, Clone)]
pub struct SkippedPackage {
    /// The package name or raw dependency reference that was skipped.
    pub reference: String,
    /// Why it was skipped.
    pub reason: String,
}

/// Outcome of an install or update run.
#[derive(Debug, Clone, Default)]
pub struct InstallReport {
    /// Names of packages that reached a persisted state this run.
    pub installed: Vec<String>,
    /// Packages or references that were skipped, with reasons.
    pub skipped: Vec<SkippedPackage>,
}

impl InstallReport {
    fn skip(&mut self, reference: impl Into<String>, reason: impl Into<String>) {
        self.skipped.push(SkippedPackage {
            reference: reference.into(),
            reason: reason.into(),
        });
    }
}

/// Installs packages and their dependency closures.
///
/// The installer is deliberately single-threaded: the closure is processed
/// depth-first and sequentially, so a dependency shared by two branches is
/// deduplicated by the visited-set without locking.
pub struct PackageInstaller<D: ArchiveDownloader, E: ArchiveExtractor> {
    downloader: D,
    extractor: E,
    /// Directory where downloaded archives are kept.
    archive_dir: PathBuf,
    /// Directory packages are extracted into.
    install_dir: PathBuf,
}

impl PackageInstaller<HttpArchiveDownloader, ZipExtractor> {
    /// Create an installer with the production HTTP downloader and zip
    /// extractor.
    pub fn new(
        max_download_retries: u32,
        archive_dir: impl Into<PathBuf>,
        install_dir: impl Into<PathBuf>,
    ) -> Self {
        Self::with_components(
            HttpArchiveDownloader::new(max_download_retries),
            ZipExtractor::new(),
            archive_dir,
            install_dir,
        )
    }
}

impl<D: ArchiveDownloader, E: ArchiveExtractor> PackageInstaller<D, E> {
    /// Create an installer from explicit components.
    pub fn with_components(
        downloader: D,
        extractor: E,
        archive_dir: impl Into<PathBuf>,
        install_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            downloader,
            extractor,
            archive_dir: archive_dir.into(),
            install_dir: install_dir.into(),
        }
    }

    /// Install a package and its dependency closure.
    ///
    /// When `version` is `None` the latest version is installed. With
    /// `download = false` versions are only pinned in the ledger (used for
    /// manifest-only regeneration).
    pub fn install(
        &self,
        snapshot: &RegistrySnapshot,
        ledger: &mut Ledger,
        name: &str,
        version: Option<&str>,
        download: bool,
    ) -> InstallResult<InstallReport> {
        let mut visited = HashSet::new();
        let mut report = InstallReport::default();
        self.install_closure(
            snapshot,
            ledger,
            name,
            version,
            download,
            &mut visited,
            &mut report,
        )?;
        Ok(report)
    }

    /// Re-install every ledger entry at its latest version.
    ///
    /// A failed branch is logged and recorded in the report; remaining
    /// entries continue. Only ledger persistence failures abort.
    pub fn update_all(
        &self,
        snapshot: &RegistrySnapshot,
        ledger: &mut Ledger,
        download: bool,
    ) -> InstallResult<InstallReport> {
        let names: Vec<String> = ledger.dependencies().keys().cloned().collect();

        let mut visited = HashSet::new();
        let mut report = InstallReport::default();
        for name in names {
            let result = self.install_closure(
                snapshot,
                ledger,
                &name,
                None,
                download,
                &mut visited,
                &mut report,
            );
            if let Err(e) = result {
                if e.is_fatal() {
                    return Err(e);
                }
                error!(package = %name, error = %e, "failed to update package");
                report.skip(name, e.to_string());
            }
        }
        Ok(report)
    }

    /// Remove a package: delete its extracted directory and ledger entry.
    ///
    /// Returns `true` when a ledger entry was removed.
    pub fn remove(
        &self,
        snapshot: &RegistrySnapshot,
        ledger: &mut Ledger,
        name: &str,
    ) -> InstallResult<bool> {
        match snapshot.locate(name, None) {
            Some(package) => {
                let dir = self.install_dir.join(&package.full_name);
                if dir.exists() {
                    fs::remove_dir_all(&dir).map_err(|e| InstallError::RemoveFailed {
                        path: dir.clone(),
                        source: e,
                    })?;
                    info!(package = %package.full_name, "removed install directory");
                } else {
                    warn!(package = %package.full_name, "install directory not found");
                }
            }
            None => warn!(package = name, "package not in registry snapshot"),
        }

        let removed = ledger.remove(name)?;
        if !removed {
            warn!(package = name, "package not in ledger");
        }
        Ok(removed)
    }

    /// Depth-first closure installation with an explicit visited-set.
    #[allow(clippy::too_many_arguments)]
    fn install_closure(
        &self,
        snapshot: &RegistrySnapshot,
        ledger: &mut Ledger,
        name: &str,
        version: Option<&str>,
        download: bool,
        visited: &mut HashSet<String>,
        report: &mut InstallReport,
    ) -> InstallResult<()> {
        // Idempotence guard: breaks cycles and deduplicates shared
        // transitive dependencies within one run.
        if !visited.insert(name.to_string()) {
            return Ok(());
        }

        let Some(package) = snapshot.locate(name, version) else {
            warn!(package = name, "package not found in registry, skipping");
            report.skip(name, "not found in registry");
            return Ok(());
        };

        // Dependencies first, so a package never lands without its closure.
        for reference in &package.dependencies {
            match PackageRef::parse(reference) {
                Ok(dep) => {
                    self.install_closure(
                        snapshot,
                        ledger,
                        &dep.name,
                        Some(&dep.version.to_string()),
                        download,
                        visited,
                        report,
                    )?;
                }
                Err(e) => {
                    warn!(
                        package = name,
                        dependency = %reference,
                        error = %e,
                        "unparseable dependency reference, skipping"
                    );
                    report.skip(reference.clone(), e.to_string());
                }
            }
        }

        if download {
            self.fetch_and_extract(&package)?;
        }

        ledger.record(&package.name, &package.version)?;
        report.installed.push(package.name.clone());
        Ok(())
    }

    /// Download the archive (reusing a completed one) and extract it over
    /// any existing install directory.
    fn fetch_and_extract(&self, package: &ResolvedPackage) -> InstallResult<()> {
        let archive = self
            .archive_dir
            .join(format!("{}-{}.zip", package.full_name, package.version));

        self.downloader
            .download(&package.download_url, &archive)
            .map_err(|e| InstallError::DownloadFailed {
                package: package.full_name.clone(),
                url: package.download_url.clone(),
                reason: e.to_string(),
            })?;

        let target = self.install_dir.join(&package.full_name);
        self.extractor
            .extract(&archive, &target)
            .map_err(|e| InstallError::ExtractionFailed {
                package: package.full_name.clone(),
                reason: e.to_string(),
            })?;

        Ok(())
    }
}
