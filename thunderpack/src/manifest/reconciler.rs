//! Manifest reconciliation against the installed-package ledger.

use semver::Version;
use tracing::{debug, info, warn};

use crate::ledger::Ledger;
use crate::registry::{PackageRef, RegistrySnapshot};

use super::changeset::ChangeSet;
use super::{seed_version, Manifest};

/// Identity used when seeding a first-time manifest.
///
/// An existing manifest keeps its own name, website, and description; the
/// template only applies when no previous manifest exists.
#[derive(Debug, Clone)]
pub struct ManifestTemplate {
    pub name: String,
    pub website_url: String,
    pub description: String,
}

/// Result of a reconciliation run: the new manifest plus the classified
/// diff that produced it.
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub manifest: Manifest,
    pub changes: ChangeSet,
}

/// Compute the deployable manifest from the ledger's current state.
///
/// The current dependency list is built by resolving every ledger entry to
/// `<fullName>-<installedVersion>` through the registry snapshot, skipping
/// an entry that matches the project's own name (a project must not depend
/// on itself) and entries no longer present in the snapshot.
///
/// With no previous manifest the version seeds at `1.0.0` and the change
/// set is empty - no changelog entry is ever generated for the seed.
/// Otherwise the two lists are diffed; an addition and a removal sharing
/// the same package name are folded into a single update, so upgrading a
/// dependency never reads as "uninstalled X, installed X".
///
/// Version bump policy, applied to the previous manifest's version:
/// any additions, updates, removals, or a config change bump the patch;
/// a change in the dependency *count* bumps the minor and resets the patch.
/// Both triggers are independent and may fire together. With no changes the
/// version is untouched and the dependency list is simply rewritten.
pub fn reconcile(
    snapshot: &RegistrySnapshot,
    ledger: &Ledger,
    previous: Option<&Manifest>,
    template: &ManifestTemplate,
    config_changed: bool,
) -> Reconciliation {
    let project_name = previous.map_or(template.name.as_str(), |m| m.name.as_str());

    let current = current_dependencies(snapshot, ledger, project_name);

    let Some(previous) = previous else {
        info!(version = %seed_version(), "seeding first-time manifest");
        return Reconciliation {
            manifest: Manifest {
                name: template.name.clone(),
                version_number: seed_version(),
                website_url: template.website_url.clone(),
                description: template.description.clone(),
                dependencies: current,
            },
            changes: ChangeSet::default(),
        };
    };

    let (additions, updates, removals) = classify(&current, &previous.dependencies);

    let changes = ChangeSet {
        additions,
        updates,
        removals,
        config_updated: config_changed,
    };

    let version = bump_version(
        &previous.version_number,
        !changes.is_empty(),
        current.len() != previous.dependencies.len(),
    );

    if changes.is_empty() {
        debug!("no dependency changes, manifest version unchanged");
    } else {
        info!(
            additions = changes.additions.len(),
            updates = changes.updates.len(),
            removals = changes.removals.len(),
            version = %version,
            "reconciled manifest"
        );
    }

    Reconciliation {
        manifest: Manifest {
            name: previous.name.clone(),
            version_number: version,
            website_url: previous.website_url.clone(),
            description: previous.description.clone(),
            dependencies: current,
        },
        changes,
    }
}

/// Build the current `<fullName>-<version>` list from the ledger.
fn current_dependencies(
    snapshot: &RegistrySnapshot,
    ledger: &Ledger,
    project_name: &str,
) -> Vec<String> {
    let mut current = Vec::with_capacity(ledger.len());
    for (name, version) in ledger.dependencies() {
        if name == project_name {
            debug!(package = %name, "skipping project's own entry");
            continue;
        }
        match snapshot.locate(name, Some(version)) {
            Some(package) => current.push(format!("{}-{}", package.full_name, version)),
            None => warn!(
                package = %name,
                "installed package not in registry snapshot, omitting from manifest"
            ),
        }
    }
    current
}

/// Diff two dependency lists and fold same-name add+remove pairs into
/// updates.
fn classify(
    current: &[String],
    previous: &[String],
) -> (Vec<PackageRef>, Vec<PackageRef>, Vec<PackageRef>) {
    let added: Vec<&String> = current.iter().filter(|d| !previous.contains(d)).collect();
    let removed: Vec<&String> = previous.iter().filter(|d| !current.contains(d)).collect();

    let mut additions = parse_refs(&added);
    let mut removals = parse_refs(&removed);
    let mut updates = Vec::new();

    // An addition and a removal sharing a name is a version update of the
    // same logical package; the update carries the new version.
    let mut i = 0;
    while i < additions.len() {
        if let Some(pos) = removals.iter().position(|r| r.name == additions[i].name) {
            removals.remove(pos);
            updates.push(additions.remove(i));
        } else {
            i += 1;
        }
    }

    (additions, updates, removals)
}

fn parse_refs(references: &[&String]) -> Vec<PackageRef> {
    references
        .iter()
        .filter_map(|reference| match PackageRef::parse(reference) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                // Manifest entries are written by the reconciler itself, so
                // this only fires on hand-edited files.
                warn!(reference = %reference, error = %e, "unparseable manifest dependency");
                None
            }
        })
        .collect()
}

/// Apply the version bump policy.
fn bump_version(previous: &Version, has_changes: bool, count_changed: bool) -> Version {
    let mut version = previous.clone();
    if has_changes {
        version.patch += 1;
    }
    if count_changed {
        version.minor += 1;
        version.patch = 0;
    }
    version
}
