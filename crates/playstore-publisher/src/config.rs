//! Client configuration.

use serde::{Deserialize, Serialize};

/// Configuration for [`PublisherClient`](crate::PublisherClient).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublisherConfig {
    /// Base URL of the Android Publisher API.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Overrides the token endpoint from the service-account key.
    #[serde(default)]
    pub token_url: Option<String>,

    /// Timeout for each HTTP round trip, in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries for transient failures of read requests.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial retry backoff in milliseconds, doubled on every attempt.
    #[serde(default = "default_retry_backoff")]
    pub retry_backoff_ms: u64,
}

fn default_api_url() -> String {
    "https://androidpublisher.googleapis.com".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_backoff() -> u64 {
    500
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            token_url: None,
            timeout_secs: default_timeout(),
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff(),
        }
    }
}

impl PublisherConfig {
    /// Create config from environment variables.
    ///
    /// | Variable | Description |
    /// |----------|-------------|
    /// | `PLAYSTORE_API_URL` | Android Publisher base URL |
    /// | `PLAYSTORE_TOKEN_URL` | OAuth2 token endpoint override |
    /// | `PLAYSTORE_TIMEOUT_SECS` | Per-request timeout |
    /// | `PLAYSTORE_MAX_RETRIES` | Retries for transient read failures |
    pub fn from_env() -> Self {
        Self {
            api_url: std::env::var("PLAYSTORE_API_URL").unwrap_or_else(|_| default_api_url()),
            token_url: std::env::var("PLAYSTORE_TOKEN_URL").ok(),
            timeout_secs: std::env::var("PLAYSTORE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_timeout),
            max_retries: std::env::var("PLAYSTORE_MAX_RETRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_max_retries),
            retry_backoff_ms: default_retry_backoff(),
        }
    }

    /// Set the API base URL.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Set the token endpoint.
    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = Some(url.into());
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set retry count and initial backoff.
    pub fn with_retries(mut self, max_retries: u32, backoff_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.retry_backoff_ms = backoff_ms;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_google_endpoints() {
        let config = PublisherConfig::default();
        assert_eq!(config.api_url, "https://androidpublisher.googleapis.com");
        assert_eq!(config.timeout_secs, 10);
        assert!(config.token_url.is_none());
    }

    #[test]
    fn missing_fields_use_defaults() {
        let config: PublisherConfig =
            serde_json::from_str(r#"{"api_url":"http://localhost:1234"}"#).unwrap();
        assert_eq!(config.api_url, "http://localhost:1234");
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.retry_backoff_ms, 500);
    }

    #[test]
    fn builders() {
        let config = PublisherConfig::default()
            .with_api_url("http://api")
            .with_token_url("http://token")
            .with_timeout_secs(3)
            .with_retries(0, 1);
        assert_eq!(config.api_url, "http://api");
        assert_eq!(config.token_url.as_deref(), Some("http://token"));
        assert_eq!(config.timeout_secs, 3);
        assert_eq!(config.max_retries, 0);
        assert_eq!(config.retry_backoff_ms, 1);
    }
}
