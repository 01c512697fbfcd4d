//! Registry snapshot and package resolution.
//!
//! The registry is a remote catalog of packages and their versions. This
//! module caches it as an in-memory, periodically refreshed snapshot
//! ([`RegistrySnapshot`]) and resolves package names against it:
//!
//! - [`RegistryClient`] abstracts the HTTP fetch of the catalog so tests run
//!   without network access; [`HttpRegistryClient`] is the production
//!   implementation.
//! - [`RegistrySnapshot::locate`] resolves a name (optionally pinned to a
//!   version) into a [`ResolvedPackage`]. A missing name yields `None`, never
//!   an error - callers treat it as "skip and report".
//! - [`PackageRef`] is the parsed form of the `<author>-<name>-<version>`
//!   dependency reference strings used throughout registry and manifest data.

mod client;
mod error;
mod model;
mod reference;
mod snapshot;

pub use client::{HttpRegistryClient, RegistryClient};
pub use error::{RegistryError, RegistryResult};
pub use model::{PackageRecord, VersionRecord};
pub use reference::{PackageRef, RefParseError};
pub use snapshot::{RegistrySnapshot, ResolvedPackage};
