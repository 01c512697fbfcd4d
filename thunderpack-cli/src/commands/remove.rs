//! Remove command - delete an installed package.

use clap::Args;
use console::style;

use crate::commands::common::open_service;
use crate::error::CliError;

#[derive(Debug, Args)]
pub struct RemoveArgs {
    /// Package name to remove
    pub name: String,
}

/// Run the remove command.
pub fn run(args: RemoveArgs) -> Result<(), CliError> {
    let mut service = open_service()?;

    if service.remove_by_name(&args.name)? {
        println!("{} removed {}", style("✓").green().bold(), args.name);
    } else {
        println!("{} is not installed", args.name);
    }
    println!("{} package(s) remain in ledger", service.installed_count());

    service.create_or_update_manifest()?;
    Ok(())
}
