//! Thunderpack - mod package management for Thunderstore-style registries.
//!
//! This library resolves and installs mod packages with their transitive
//! dependencies, tracks installed versions in a persistent ledger, regenerates
//! a deployable manifest from the current dependency set, and derives a
//! human-readable changelog from manifest deltas.
//!
//! # High-Level API
//!
//! For most use cases, the [`service`] module provides a simplified facade:
//!
//! ```ignore
//! use thunderpack::config::Settings;
//! use thunderpack::service::ModpackService;
//!
//! let settings = Settings::from_env()?;
//! let mut service = ModpackService::open(settings)?;
//!
//! service.install_by_name("ExampleMod", None, true)?;
//! service.create_or_update_manifest()?;
//! ```

pub mod changelog;
pub mod config;
pub mod installer;
pub mod ledger;
pub mod logging;
pub mod manifest;
pub mod modpack;
pub mod registry;
pub mod service;

mod fsutil;

/// Version of the Thunderpack library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
