//! Typed configuration for Thunderpack components.
//!
//! All runtime configuration flows through [`Settings`], constructed once at
//! process start and threaded through to each component. Values come from
//! environment variables with documented defaults; anything malformed fails
//! fast with a [`ConfigError`] instead of propagating bad values downstream.

mod error;
mod settings;

pub use error::{ConfigError, ConfigResult};
pub use settings::Settings;
