//! High-level service facade.
//!
//! [`ModpackService`] wires the registry snapshot, installer, ledger, and
//! manifest machinery together behind the operations the CLI exposes. It
//! owns the per-process lifecycle: the snapshot is loaded (or refreshed)
//! once at construction and reused for every subsequent resolution.

use std::path::PathBuf;

use thiserror::Error;
use tracing::info;

use crate::changelog::{Changelog, ChangelogError};
use crate::config::{ConfigError, Settings};
use crate::installer::{
    ArchiveDownloader, ArchiveExtractor, HttpArchiveDownloader, InstallError, InstallReport,
    PackageInstaller, ZipExtractor,
};
use crate::ledger::{Ledger, LedgerError};
use crate::manifest::{
    directory_digest, reconcile, Manifest, ManifestError, ManifestTemplate, Reconciliation,
};
use crate::modpack::{self, ModpackError};
use crate::registry::{HttpRegistryClient, RegistryError, RegistrySnapshot};

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced by the service facade.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Install(#[from] InstallError),

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Changelog(#[from] ChangelogError),

    #[error(transparent)]
    Modpack(#[from] ModpackError),
}

/// The package-management operations exposed to the CLI.
pub struct ModpackService<D: ArchiveDownloader, E: ArchiveExtractor> {
    settings: Settings,
    snapshot: RegistrySnapshot,
    installer: PackageInstaller<D, E>,
    ledger: Ledger,
}

impl ModpackService<HttpArchiveDownloader, ZipExtractor> {
    /// Open the service with production components: an HTTP registry client
    /// behind the snapshot cache, an HTTP archive downloader, and the zip
    /// extractor.
    pub fn open(settings: Settings) -> ServiceResult<Self> {
        let client = HttpRegistryClient::new(settings.registry_url.clone());
        let snapshot = RegistrySnapshot::load_or_refresh(
            &client,
            &settings.snapshot_cache_path(),
            settings.snapshot_max_age,
        )?;

        let installer = PackageInstaller::new(
            settings.max_download_retries,
            settings.archive_dir.clone(),
            settings.mod_install_path.clone(),
        );
        let ledger = Ledger::open(settings.ledger_path.clone())?;

        Ok(Self {
            settings,
            snapshot,
            installer,
            ledger,
        })
    }
}

impl<D: ArchiveDownloader, E: ArchiveExtractor> ModpackService<D, E> {
    /// Assemble the service from explicit parts. Used by tests to inject
    /// mock downloaders and extractors and a pre-built snapshot.
    pub fn from_parts(
        settings: Settings,
        snapshot: RegistrySnapshot,
        installer: PackageInstaller<D, E>,
        ledger: Ledger,
    ) -> Self {
        Self {
            settings,
            snapshot,
            installer,
            ledger,
        }
    }

    /// Install a package and its dependency closure.
    pub fn install_by_name(
        &mut self,
        name: &str,
        version: Option<&str>,
        download: bool,
    ) -> ServiceResult<InstallReport> {
        let report = self
            .installer
            .install(&self.snapshot, &mut self.ledger, name, version, download)?;
        info!(installed = self.ledger.len(), "packages installed");
        Ok(report)
    }

    /// Re-install every ledger entry at its latest version.
    pub fn update_all(&mut self, download: bool) -> ServiceResult<InstallReport> {
        let report = self
            .installer
            .update_all(&self.snapshot, &mut self.ledger, download)?;
        info!(installed = self.ledger.len(), "packages installed");
        Ok(report)
    }

    /// Remove a package's extracted directory and ledger entry.
    ///
    /// Returns `true` when a ledger entry was removed.
    pub fn remove_by_name(&mut self, name: &str) -> ServiceResult<bool> {
        Ok(self
            .installer
            .remove(&self.snapshot, &mut self.ledger, name)?)
    }

    /// Reconcile the manifest against the ledger and record the changes in
    /// the changelog.
    ///
    /// When a config folder is configured, its content hash is compared
    /// against the one stored in the ledger and a difference counts as a
    /// change. The modpack project directory is scaffolded if missing so a
    /// first run produces a complete project skeleton.
    pub fn create_or_update_manifest(&mut self) -> ServiceResult<Reconciliation> {
        modpack::scaffold(
            &self.settings.modpack_dir,
            &self.settings.project_name,
            &self.settings.project_description,
        )?;

        let previous = Manifest::load(&self.settings.manifest_path())?;
        let config_digest = self.current_config_digest()?;
        let config_changed = match &config_digest {
            Some(digest) => self.ledger.config_digest() != Some(digest.as_str()),
            None => false,
        };

        let template = ManifestTemplate {
            name: self.settings.project_name.clone(),
            website_url: self.settings.project_website_url.clone(),
            description: self.settings.project_description.clone(),
        };
        let reconciliation = reconcile(
            &self.snapshot,
            &self.ledger,
            previous.as_ref(),
            &template,
            config_changed,
        );

        reconciliation
            .manifest
            .save(&self.settings.manifest_path())?;

        let mut changelog = Changelog::open(self.settings.changelog_path())?;
        changelog.append(
            &reconciliation.manifest.version_number,
            &reconciliation.changes,
            &self.settings.registry_page_url,
        )?;

        if config_changed {
            // Persist the digest only after the manifest and changelog
            // reflect the change, so a failed run re-detects it.
            if let Some(digest) = config_digest {
                self.ledger.set_config_digest(digest)?;
            }
        }

        Ok(reconciliation)
    }

    /// Zip the modpack project into the dist directory.
    ///
    /// Returns the path of the written archive.
    pub fn pack(&self) -> ServiceResult<PathBuf> {
        Ok(modpack::pack(
            &self.settings.modpack_dir,
            &self.settings.dist_dir,
        )?)
    }

    /// Number of packages currently recorded as installed.
    pub fn installed_count(&self) -> usize {
        self.ledger.len()
    }

    /// Digest of the tracked config folder, if tracking is configured and
    /// the folder exists.
    fn current_config_digest(&self) -> ServiceResult<Option<String>> {
        let Some(dir) = &self.settings.config_dir else {
            return Ok(None);
        };
        if !dir.exists() {
            return Ok(None);
        }
        Ok(Some(directory_digest(dir)?))
    }
}
