//! HTTP client for fetching the registry catalog.

use std::time::Duration;

use reqwest::blocking::Client;

use super::error::{RegistryError, RegistryResult};
use super::model::PackageRecord;

/// Default HTTP request timeout for catalog fetches (30 seconds).
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client for fetching the registry package catalog.
///
/// This trait abstracts HTTP fetching to enable testing without network
/// access.
pub trait RegistryClient: Send + Sync {
    /// Fetch the full package catalog.
    ///
    /// # Returns
    ///
    /// All known packages with their version metadata, in registry order.
    fn fetch_catalog(&self) -> RegistryResult<Vec<PackageRecord>>;
}

/// HTTP-based implementation of [`RegistryClient`].
///
/// Fetches the catalog JSON from the configured endpoint.
#[derive(Clone)]
pub struct HttpRegistryClient {
    client: Client,
    url: String,
    timeout: Duration,
}

impl std::fmt::Debug for HttpRegistryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRegistryClient")
            .field("url", &self.url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl HttpRegistryClient {
    /// Create a new registry client for the given catalog URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_timeout(url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a new registry client with a custom timeout.
    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("thunderpack/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("failed to create HTTP client");

        Self {
            client,
            url: url.into(),
            timeout,
        }
    }

    /// The catalog URL this client fetches from.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl RegistryClient for HttpRegistryClient {
    fn fetch_catalog(&self) -> RegistryResult<Vec<PackageRecord>> {
        let response = self.client.get(&self.url).send().map_err(|e| {
            if e.is_timeout() {
                RegistryError::Timeout {
                    url: self.url.clone(),
                    timeout_secs: self.timeout.as_secs(),
                }
            } else {
                RegistryError::FetchFailed {
                    url: self.url.clone(),
                    reason: e.to_string(),
                }
            }
        })?;

        if !response.status().is_success() {
            return Err(RegistryError::FetchFailed {
                url: self.url.clone(),
                reason: format!("HTTP {}", response.status()),
            });
        }

        response
            .json::<Vec<PackageRecord>>()
            .map_err(|e| RegistryError::ParseFailed {
                url: self.url.clone(),
                reason: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_stores_url() {
        let client = HttpRegistryClient::new("https://example.com/api/v1/package/");
        assert_eq!(client.url(), "https://example.com/api/v1/package/");
    }

    #[test]
    fn test_client_custom_timeout() {
        let client =
            HttpRegistryClient::with_timeout("https://example.com/", Duration::from_secs(5));
        assert_eq!(client.timeout, Duration::from_secs(5));
    }
}
