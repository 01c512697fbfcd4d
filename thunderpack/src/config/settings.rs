//! Runtime settings resolved from the environment.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use super::error::{ConfigError, ConfigResult};

/// Default registry catalog endpoint.
const DEFAULT_REGISTRY_URL: &str = "https://valheim.thunderstore.io/api/v1/package/";

/// Default base URL for package pages, used for changelog hyperlinks.
const DEFAULT_REGISTRY_PAGE_URL: &str = "https://valheim.thunderstore.io/package";

/// Default number of retries for a failed archive download.
const DEFAULT_DOWNLOAD_RETRIES: u32 = 3;

/// Default maximum age of the registry snapshot cache before a re-fetch.
const DEFAULT_SNAPSHOT_MAX_AGE_SECS: u64 = 60 * 60;

/// Runtime configuration for all Thunderpack components.
///
/// Constructed once per process via [`Settings::from_env`] and passed to the
/// service facade. Every field has a working default so a bare environment
/// produces a usable configuration rooted in the current directory.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Registry catalog endpoint (JSON array of packages).
    pub registry_url: String,

    /// Base URL for package pages, used when rendering changelog links.
    pub registry_page_url: String,

    /// Directory holding the cached registry snapshot.
    pub cache_dir: PathBuf,

    /// Directory where downloaded package archives are kept.
    pub archive_dir: PathBuf,

    /// Directory packages are extracted into (one subdirectory per package).
    pub mod_install_path: PathBuf,

    /// Modpack project directory holding `manifest.json` and `CHANGELOG.md`.
    pub modpack_dir: PathBuf,

    /// Output directory for distributable modpack archives.
    pub dist_dir: PathBuf,

    /// Path of the installed-package ledger file.
    pub ledger_path: PathBuf,

    /// Optional server config folder whose content hash is tracked as a
    /// synthetic dependency change.
    pub config_dir: Option<PathBuf>,

    /// Project name used when seeding a first-time manifest.
    pub project_name: String,

    /// Project description used when seeding a first-time manifest.
    pub project_description: String,

    /// Project website URL used when seeding a first-time manifest.
    pub project_website_url: String,

    /// Number of full-request retries after a failed archive download.
    pub max_download_retries: u32,

    /// Maximum age of the snapshot cache before a re-fetch is triggered.
    pub snapshot_max_age: Duration,
}

impl Settings {
    /// Load settings from the environment, falling back to defaults.
    ///
    /// # Environment variables
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `THUNDERPACK_REGISTRY_URL` | Valheim Thunderstore catalog |
    /// | `THUNDERPACK_REGISTRY_PAGE_URL` | Valheim Thunderstore package pages |
    /// | `THUNDERPACK_CACHE_DIR` | `./cache` |
    /// | `THUNDERPACK_ARCHIVE_DIR` | `./zipped-packages` |
    /// | `MOD_INSTALL_PATH` | `./config/plugins` |
    /// | `MODPACK_FOLDER` | `./modpack` |
    /// | `MODPACK_DIST_FOLDER` | `./dist` |
    /// | `THUNDERPACK_LEDGER_PATH` | `./thunderpack.json` |
    /// | `THUNDERPACK_CONFIG_DIR` | unset (config tracking disabled) |
    /// | `THUNDERPACK_PROJECT_NAME` | `Modpack` |
    /// | `THUNDERPACK_PROJECT_DESCRIPTION` | empty |
    /// | `THUNDERPACK_PROJECT_WEBSITE` | empty |
    /// | `MAX_DOWNLOAD_RETRY_COUNT` | `3` |
    /// | `THUNDERPACK_SNAPSHOT_MAX_AGE_SECS` | `3600` |
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a numeric variable cannot be parsed or
    /// a required value is set but empty.
    pub fn from_env() -> ConfigResult<Self> {
        let registry_url = string_var("THUNDERPACK_REGISTRY_URL", DEFAULT_REGISTRY_URL)?;
        let registry_page_url =
            string_var("THUNDERPACK_REGISTRY_PAGE_URL", DEFAULT_REGISTRY_PAGE_URL)?;

        let max_download_retries =
            parsed_var("MAX_DOWNLOAD_RETRY_COUNT", DEFAULT_DOWNLOAD_RETRIES)?;
        let snapshot_max_age_secs = parsed_var(
            "THUNDERPACK_SNAPSHOT_MAX_AGE_SECS",
            DEFAULT_SNAPSHOT_MAX_AGE_SECS,
        )?;

        Ok(Self {
            registry_url,
            registry_page_url,
            cache_dir: path_var("THUNDERPACK_CACHE_DIR", "cache"),
            archive_dir: path_var("THUNDERPACK_ARCHIVE_DIR", "zipped-packages"),
            mod_install_path: path_var("MOD_INSTALL_PATH", "config/plugins"),
            modpack_dir: path_var("MODPACK_FOLDER", "modpack"),
            dist_dir: path_var("MODPACK_DIST_FOLDER", "dist"),
            ledger_path: path_var("THUNDERPACK_LEDGER_PATH", "thunderpack.json"),
            config_dir: env::var("THUNDERPACK_CONFIG_DIR")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            project_name: string_var("THUNDERPACK_PROJECT_NAME", "Modpack")?,
            project_description: env::var("THUNDERPACK_PROJECT_DESCRIPTION").unwrap_or_default(),
            project_website_url: env::var("THUNDERPACK_PROJECT_WEBSITE").unwrap_or_default(),
            max_download_retries,
            snapshot_max_age: Duration::from_secs(snapshot_max_age_secs),
        })
    }

    /// Path of the cached registry snapshot file.
    pub fn snapshot_cache_path(&self) -> PathBuf {
        self.cache_dir.join("current_packages.json")
    }

    /// Path of the modpack manifest file.
    pub fn manifest_path(&self) -> PathBuf {
        self.modpack_dir.join("manifest.json")
    }

    /// Path of the modpack changelog file.
    pub fn changelog_path(&self) -> PathBuf {
        self.modpack_dir.join("CHANGELOG.md")
    }
}

/// Read a string variable, rejecting explicit empty values.
fn string_var(key: &str, default: &str) -> ConfigResult<String> {
    match env::var(key) {
        Ok(value) if value.is_empty() => Err(ConfigError::EmptyValue {
            key: key.to_string(),
        }),
        Ok(value) => Ok(value),
        Err(_) => Ok(default.to_string()),
    }
}

/// Read a path variable with a default.
fn path_var(key: &str, default: &str) -> PathBuf {
    env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}

/// Read and parse a numeric variable with a default.
fn parsed_var<T: std::str::FromStr>(key: &str, default: T) -> ConfigResult<T> {
    match env::var(key) {
        Ok(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value,
            reason: "expected an integer".to_string(),
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Environment-variable tests mutate process state, so each test uses a
    // distinct key that no other test touches.

    #[test]
    fn test_defaults() {
        let settings = Settings::from_env().unwrap();
        assert_eq!(settings.mod_install_path, PathBuf::from("config/plugins"));
        assert_eq!(settings.max_download_retries, DEFAULT_DOWNLOAD_RETRIES);
        assert_eq!(settings.snapshot_max_age, Duration::from_secs(3600));
        assert!(settings.registry_url.contains("/api/v1/package/"));
    }

    #[test]
    fn test_derived_paths() {
        let settings = Settings::from_env().unwrap();
        assert_eq!(
            settings.snapshot_cache_path(),
            settings.cache_dir.join("current_packages.json")
        );
        assert_eq!(
            settings.manifest_path(),
            settings.modpack_dir.join("manifest.json")
        );
        assert_eq!(
            settings.changelog_path(),
            settings.modpack_dir.join("CHANGELOG.md")
        );
    }

    #[test]
    fn test_parsed_var_rejects_garbage() {
        env::set_var("TEST_THUNDERPACK_RETRIES", "lots");
        let result: ConfigResult<u32> = parsed_var("TEST_THUNDERPACK_RETRIES", 3);
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
        env::remove_var("TEST_THUNDERPACK_RETRIES");
    }

    #[test]
    fn test_string_var_rejects_empty() {
        env::set_var("TEST_THUNDERPACK_EMPTY", "");
        let result = string_var("TEST_THUNDERPACK_EMPTY", "default");
        assert!(matches!(result, Err(ConfigError::EmptyValue { .. })));
        env::remove_var("TEST_THUNDERPACK_EMPTY");
    }
}
