//! Error types for the publisher client.

use std::time::Duration;

use crate::validation::ValidationError;

/// Publisher client errors.
#[derive(Debug, thiserror::Error)]
pub enum PublisherError {
    /// An identifier failed validation before any request was made.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(#[from] ValidationError),

    /// The service-account key could not be read or used.
    #[error("invalid service account credentials: {message}")]
    Credentials {
        /// What was wrong with the key.
        message: String,
    },

    /// The OAuth2 token exchange failed.
    #[error("token exchange failed: {message}")]
    Token {
        /// Failure reported by the token endpoint or the JWT encoder.
        message: String,
    },

    /// Credentials were rejected (401/403).
    #[error("unauthorized: {message}")]
    Unauthorized {
        /// Message from the API error body.
        message: String,
    },

    /// Purchase, product or package does not exist (404).
    #[error("not found: {message}")]
    NotFound {
        /// Message from the API error body.
        message: String,
    },

    /// Purchase is no longer available (410), e.g. long-expired subscriptions.
    #[error("gone: {message}")]
    Gone {
        /// Message from the API error body.
        message: String,
    },

    /// Quota exceeded (429).
    #[error("rate limited: retry after {retry_after:?}")]
    RateLimited {
        /// Delay requested by the `Retry-After` header, if any.
        retry_after: Option<Duration>,
    },

    /// Any other non-success response.
    #[error("API error (HTTP {status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message from the API error body.
        message: String,
    },

    /// Transport failure, including timeouts.
    #[error("network error: {message}")]
    Network {
        /// Underlying transport error.
        message: String,
    },

    /// Response body did not have the expected shape.
    #[error("invalid response: {message}")]
    InvalidResponse {
        /// Decoding failure.
        message: String,
    },

    /// Client configuration error.
    #[error("configuration error: {message}")]
    Config {
        /// What was misconfigured.
        message: String,
    },
}

impl PublisherError {
    /// Whether retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited { .. } | Self::Network { .. } => true,
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for PublisherError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network {
            message: err.to_string(),
        }
    }
}

/// Result type for publisher operations.
pub type PublisherResult<T> = Result<T, PublisherError>;
