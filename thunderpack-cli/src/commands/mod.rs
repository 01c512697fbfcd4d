//! CLI subcommands, one module per command.

pub mod install;
pub mod manifest;
pub mod pack;
pub mod remove;
pub mod update;

mod common;
