//! Error types for configuration loading.

use thiserror::Error;

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable held a value that could not be parsed.
    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    /// A required setting resolved to an empty value.
    #[error("setting {key} must not be empty")]
    EmptyValue { key: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_value_display() {
        let err = ConfigError::InvalidValue {
            key: "MAX_DOWNLOAD_RETRY_COUNT".to_string(),
            value: "lots".to_string(),
            reason: "expected an integer".to_string(),
        };
        assert!(err.to_string().contains("MAX_DOWNLOAD_RETRY_COUNT"));
        assert!(err.to_string().contains("lots"));
    }
}
