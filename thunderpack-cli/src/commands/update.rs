//! Update command - re-install every ledger entry at its latest version.

use clap::Args;

use crate::commands::common::{open_service, print_report};
use crate::error::CliError;

#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// Record versions in the ledger without downloading archives
    #[arg(long)]
    pub no_download: bool,
}

/// Run the update command.
pub fn run(args: UpdateArgs) -> Result<(), CliError> {
    let mut service = open_service()?;

    let report = service.update_all(!args.no_download)?;
    print_report(&report, service.installed_count());

    service.create_or_update_manifest()?;
    Ok(())
}
