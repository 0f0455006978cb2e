//! OAuth2 access tokens for the Android Publisher API.
//!
//! Supports two methods:
//! - Static bearer token (tests, tokens minted elsewhere)
//! - Service-account JWT-bearer exchange (RFC 7523), cached until shortly
//!   before expiry

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

use crate::credentials::ServiceAccountKey;
use crate::error::{PublisherError, PublisherResult};

/// OAuth2 scope granting access to the Android Publisher API.
pub const ANDROID_PUBLISHER_SCOPE: &str = "https://www.googleapis.com/auth/androidpublisher";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime requested for the signed assertion.
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Tokens are refreshed this long before they expire.
const REFRESH_MARGIN_SECS: i64 = 60;

/// Token provider for publisher authentication.
#[derive(Debug, Clone)]
pub enum TokenProvider {
    /// Static bearer token.
    Static(String),

    /// Service-account token exchange.
    ServiceAccount(ServiceAccountProvider),
}

impl TokenProvider {
    /// Create a static token provider.
    pub fn static_token(token: impl Into<String>) -> Self {
        Self::Static(token.into())
    }

    /// Create a service-account provider.
    ///
    /// `token_url` overrides the endpoint named in the key file.
    pub fn service_account(
        key: &ServiceAccountKey,
        http: reqwest::Client,
        token_url: Option<String>,
    ) -> PublisherResult<Self> {
        Ok(Self::ServiceAccount(ServiceAccountProvider::new(
            key, http, token_url,
        )?))
    }

    /// Get a bearer token, exchanging credentials if needed.
    pub async fn get_token(&self) -> PublisherResult<String> {
        match self {
            Self::Static(token) => Ok(token.clone()),
            Self::ServiceAccount(provider) => provider.get_token().await,
        }
    }
}

/// Exchanges a signed service-account assertion for access tokens.
///
/// Clones share the token cache.
#[derive(Clone)]
pub struct ServiceAccountProvider {
    client_email: String,
    key_id: Option<String>,
    encoding_key: EncodingKey,
    token_url: String,
    http: reqwest::Client,
    cached_token: Arc<RwLock<Option<CachedToken>>>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(REFRESH_MARGIN_SECS) < self.expires_at
    }
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

/// Token endpoint response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

impl ServiceAccountProvider {
    /// Builds a provider from a parsed key.
    pub fn new(
        key: &ServiceAccountKey,
        http: reqwest::Client,
        token_url: Option<String>,
    ) -> PublisherResult<Self> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes()).map_err(|e| {
            PublisherError::Credentials {
                message: format!("unusable private key: {}", e),
            }
        })?;

        Ok(Self {
            client_email: key.client_email.clone(),
            key_id: key.private_key_id.clone(),
            encoding_key,
            token_url: token_url.unwrap_or_else(|| key.token_uri.clone()),
            http,
            cached_token: Arc::new(RwLock::new(None)),
        })
    }

    /// Service account identity.
    pub fn client_email(&self) -> &str {
        &self.client_email
    }

    /// Returns the cached token or exchanges a new one.
    pub async fn get_token(&self) -> PublisherResult<String> {
        {
            let cached = self.cached_token.read().await;
            if let Some(token) = cached.as_ref().filter(|t| t.is_fresh(Utc::now())) {
                return Ok(token.access_token.clone());
            }
        }

        let mut cached = self.cached_token.write().await;
        // Another task may have refreshed while we waited for the lock.
        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh(Utc::now())) {
            return Ok(token.access_token.clone());
        }

        let token = self.exchange().await?;
        let access_token = token.access_token.clone();
        *cached = Some(token);
        Ok(access_token)
    }

    async fn exchange(&self) -> PublisherResult<CachedToken> {
        let now = Utc::now();
        let assertion = self.sign_assertion(now)?;
        debug!(
            client_email = %self.client_email,
            token_url = %self.token_url,
            "exchanging service account assertion"
        );

        let response = self
            .http
            .post(&self.token_url)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PublisherError::Token {
                message: format!("HTTP {}: {}", status.as_u16(), body),
            });
        }

        let body: TokenResponse = response.json().await.map_err(|e| PublisherError::Token {
            message: format!("failed to parse token response: {}", e),
        })?;
        debug!(expires_in = body.expires_in, "obtained access token");

        Ok(CachedToken {
            access_token: body.access_token,
            expires_at: now + Duration::seconds(body.expires_in),
        })
    }

    fn sign_assertion(&self, now: DateTime<Utc>) -> PublisherResult<String> {
        let claims = AssertionClaims {
            iss: &self.client_email,
            scope: ANDROID_PUBLISHER_SCOPE,
            aud: &self.token_url,
            iat: now.timestamp(),
            exp: now.timestamp() + ASSERTION_LIFETIME_SECS,
        };
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key_id.clone();

        jsonwebtoken::encode(&header, &claims, &self.encoding_key).map_err(|e| {
            PublisherError::Credentials {
                message: format!("failed to sign assertion: {}", e),
            }
        })
    }
}

impl fmt::Debug for ServiceAccountProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountProvider")
            .field("client_email", &self.client_email)
            .field("token_url", &self.token_url)
            .finish_non_exhaustive()
    }
}
