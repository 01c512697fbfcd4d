//! Helpers shared by the subcommands.

use console::style;
use thunderpack::config::Settings;
use thunderpack::installer::{HttpArchiveDownloader, InstallReport, ZipExtractor};
use thunderpack::service::ModpackService;

use crate::error::CliError;

/// Production service handle used by every subcommand.
pub type Service = ModpackService<HttpArchiveDownloader, ZipExtractor>;

/// Load settings from the environment and open the service.
pub fn open_service() -> Result<Service, CliError> {
    let settings = Settings::from_env()?;
    Ok(ModpackService::open(settings)?)
}

/// Print the outcome of an install or update run.
pub fn print_report(report: &InstallReport, total_installed: usize) {
    for name in &report.installed {
        println!("  {} {}", style("+").green().bold(), name);
    }
    for skipped in &report.skipped {
        println!(
            "  {} {} ({})",
            style("-").yellow().bold(),
            skipped.reference,
            skipped.reason
        );
    }

    println!();
    println!(
        "{} package(s) installed, {} skipped, {} total in ledger",
        style(report.installed.len()).green(),
        style(report.skipped.len()).yellow(),
        total_installed
    );
}
