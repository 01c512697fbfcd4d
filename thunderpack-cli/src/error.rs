//! CLI error handling with user-friendly messages.

use std::fmt;
use std::process;

use thunderpack::config::ConfigError;
use thunderpack::service::ServiceError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Configuration could not be loaded from the environment.
    Config(ConfigError),
    /// A library operation failed.
    Service(ServiceError),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        if let CliError::Service(ServiceError::Registry(_)) = self {
            eprintln!();
            eprintln!("The registry could not be reached. Check your network");
            eprintln!("connection, or point THUNDERPACK_REGISTRY_URL at a mirror.");
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(e) => write!(f, "invalid configuration: {}", e),
            CliError::Service(e) => write!(f, "{}", e),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e)
    }
}

impl From<ServiceError> for CliError {
    fn from(e: ServiceError) -> Self {
        CliError::Service(e)
    }
}
