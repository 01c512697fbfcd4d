//! Thunderpack CLI.
//!
//! Command-line interface to the thunderpack library: install, update, and
//! remove packages, regenerate the modpack manifest, and build the
//! distributable archive.

mod commands;
mod error;

use clap::{Parser, Subcommand};

use error::CliError;

#[derive(Parser)]
#[command(name = "thunderpack")]
#[command(version = thunderpack::VERSION)]
#[command(about = "Mod package management for Thunderstore-style registries", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Install a package and its dependencies
    Install(commands::install::InstallArgs),
    /// Update every installed package to its latest version
    Update(commands::update::UpdateArgs),
    /// Remove an installed package
    Remove(commands::remove::RemoveArgs),
    /// Regenerate the modpack manifest and changelog
    Manifest,
    /// Build the distributable modpack archive
    Pack,
}

fn main() {
    thunderpack::logging::init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Install(args) => commands::install::run(args),
        Command::Update(args) => commands::update::run(args),
        Command::Remove(args) => commands::remove::run(args),
        Command::Manifest => commands::manifest::run(),
        Command::Pack => commands::pack::run(),
    };

    if let Err(e) = result {
        e.exit();
    }
}
