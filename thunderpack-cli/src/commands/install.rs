//! Install command - install a package and its dependency closure.

use clap::Args;

use crate::commands::common::{open_service, print_report};
use crate::error::CliError;

#[derive(Debug, Args)]
pub struct InstallArgs {
    /// Package name as listed in the registry
    pub name: String,

    /// Exact version to install (defaults to latest)
    #[arg(long)]
    pub version: Option<String>,

    /// Record versions in the ledger without downloading archives
    #[arg(long)]
    pub no_download: bool,
}

/// Run the install command.
pub fn run(args: InstallArgs) -> Result<(), CliError> {
    let mut service = open_service()?;

    let report = service.install_by_name(&args.name, args.version.as_deref(), !args.no_download)?;
    print_report(&report, service.installed_count());

    // Keep the manifest in lockstep with the ledger.
    service.create_or_update_manifest()?;
    Ok(())
}
