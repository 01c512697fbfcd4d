//! Pack command - build the distributable modpack archive.

use console::style;

use crate::commands::common::open_service;
use crate::error::CliError;

/// Run the pack command.
pub fn run() -> Result<(), CliError> {
    let service = open_service()?;

    let archive = service.pack()?;
    println!(
        "{} wrote {}",
        style("✓").green().bold(),
        archive.display()
    );
    Ok(())
}
