//! Markdown changelog composer.
//!
//! The changelog is an append-only, human-readable record of what each
//! manifest version changed. New sections are prepended so the file reads
//! newest-first, and composing a section for a version that already has one
//! is a no-op, which makes repeated runs of the same reconciliation safe.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::fsutil::write_atomic;
use crate::manifest::{seed_version, ChangeSet};
use crate::registry::PackageRef;
use semver::Version;

/// Result type for changelog operations.
pub type ChangelogResult<T> = Result<T, ChangelogError>;

/// Errors that can occur while reading or persisting the changelog.
#[derive(Debug, Error)]
pub enum ChangelogError {
    /// The changelog file exists but could not be read.
    #[error("failed to read changelog {path}: {source}")]
    ReadFailed { path: PathBuf, source: io::Error },

    /// The changelog file could not be written.
    #[error("failed to write changelog {path}: {source}")]
    WriteFailed { path: PathBuf, source: io::Error },
}

/// Body a brand-new changelog starts from.
const SEED_BODY: &str = "## 1.0.0\n\n- Initial release\n";

/// The project changelog (`CHANGELOG.md`).
#[derive(Debug)]
pub struct Changelog {
    path: PathBuf,
    body: String,
}

impl Changelog {
    /// Open the changelog at `path`, starting from the seed body when the
    /// file does not exist yet. The seed is only persisted by the first
    /// [`Changelog::append`] that writes.
    pub fn open(path: impl Into<PathBuf>) -> ChangelogResult<Self> {
        let path = path.into();

        let body = if path.exists() {
            std::fs::read_to_string(&path).map_err(|e| ChangelogError::ReadFailed {
                path: path.clone(),
                source: e,
            })?
        } else {
            debug!(path = %path.display(), "changelog missing, seeding");
            SEED_BODY.to_string()
        };

        Ok(Self { path, body })
    }

    /// Whether a section for `version` already exists.
    pub fn version_exists(&self, version: &Version) -> bool {
        self.body.contains(&format!("## {}", version))
    }

    /// Current changelog text.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Prepend a section for `version` describing `changes` and persist.
    ///
    /// No section is written for the seed version, for a version that
    /// already has one, or for an empty change set; the call is then a
    /// no-op and the file is left untouched. Returns whether a section was
    /// written.
    ///
    /// `page_url` is the registry's package-page base, used to link each
    /// listed package.
    pub fn append(
        &mut self,
        version: &Version,
        changes: &ChangeSet,
        page_url: &str,
    ) -> ChangelogResult<bool> {
        if *version == seed_version() {
            debug!("skipping changelog section for seed version");
            return Ok(false);
        }
        if self.version_exists(version) {
            debug!(version = %version, "changelog section already present");
            return Ok(false);
        }
        if changes.is_empty() {
            return Ok(false);
        }

        let section = render_section(version, changes, page_url);
        self.body = format!("{}{}", section, self.body);
        self.save()?;

        info!(version = %version, "changelog section written");
        Ok(true)
    }

    fn save(&self) -> ChangelogResult<()> {
        write_atomic(&self.path, &self.body).map_err(|e| ChangelogError::WriteFailed {
            path: self.path.clone(),
            source: e,
        })
    }
}

/// Render one version section.
fn render_section(version: &Version, changes: &ChangeSet, page_url: &str) -> String {
    let mut section = format!("## {}\n\n", version);

    push_group(&mut section, "Added", &changes.additions, page_url, |r| {
        r.version.to_string()
    });
    if !changes.updates.is_empty() || changes.config_updated {
        section.push_str("- Updated:\n");
        for reference in &changes.updates {
            section.push_str(&package_line(reference, page_url, &format!(
                "to version {}",
                reference.version
            )));
        }
        if changes.config_updated {
            section.push_str("  - Config files\n");
        }
    }
    push_group(&mut section, "Removed", &changes.removals, page_url, |r| {
        r.version.to_string()
    });

    section.push('\n');
    section
}

fn push_group(
    section: &mut String,
    label: &str,
    references: &[PackageRef],
    page_url: &str,
    detail: impl Fn(&PackageRef) -> String,
) {
    if references.is_empty() {
        return;
    }
    section.push_str(&format!("- {}:\n", label));
    for reference in references {
        section.push_str(&package_line(reference, page_url, &detail(reference)));
    }
}

/// One linked package bullet, e.g.
/// `  - [alice-ExampleMod](https://.../alice/ExampleMod/) 1.0.0`.
fn package_line(reference: &PackageRef, page_url: &str, detail: &str) -> String {
    format!(
        "  - [{}]({}/{}/{}/) {}\n",
        reference.full_name(),
        page_url.trim_end_matches('/'),
        reference.author,
        reference.name,
        detail
    )
}
