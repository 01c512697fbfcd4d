//! Manifest command - regenerate the modpack manifest and changelog.

use console::style;

use crate::commands::common::open_service;
use crate::error::CliError;

/// Run the manifest command.
pub fn run() -> Result<(), CliError> {
    let mut service = open_service()?;

    let reconciliation = service.create_or_update_manifest()?;
    let changes = &reconciliation.changes;

    println!(
        "Manifest version {}",
        style(&reconciliation.manifest.version_number).cyan()
    );
    if changes.is_empty() {
        println!("No changes since the previous manifest.");
    } else {
        println!(
            "{} added, {} updated, {} removed{}",
            style(changes.additions.len()).green(),
            style(changes.updates.len()).yellow(),
            style(changes.removals.len()).red(),
            if changes.config_updated {
                ", config files changed"
            } else {
                ""
            }
        );
    }
    Ok(())
}
