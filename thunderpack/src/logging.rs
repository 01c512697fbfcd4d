//! Logging initialization.
//!
//! Installs a `tracing` subscriber writing compact output to stderr so
//! command summaries on stdout stay clean. Verbosity is controlled with the
//! `RUST_LOG` environment variable and defaults to `info`.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber. Call once at process startup.
///
/// A second call is a no-op rather than a panic, which keeps tests that
/// initialize logging independent of each other.
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init();
        init();
    }
}
