//! HTTP client for the Android Publisher API.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, RETRY_AFTER, USER_AGENT};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::auth::TokenProvider;
use crate::config::PublisherConfig;
use crate::credentials::ServiceAccountKey;
use crate::error::{PublisherError, PublisherResult};
use crate::identifiers::{PackageName, ProductId, PurchaseToken, SubscriptionId};
use crate::service::{ProductService, SubscriptionService};
use crate::types::{AcknowledgeRequest, ProductPurchase, SubscriptionPurchase};

/// User agent for publisher requests.
pub const PUBLISHER_USER_AGENT: &str = concat!("playstore-publisher/", env!("CARGO_PKG_VERSION"));

const MAX_BACKOFF: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy)]
enum PurchaseKind {
    Product,
    Subscription,
}

impl PurchaseKind {
    fn segment(self) -> &'static str {
        match self {
            Self::Product => "products",
            Self::Subscription => "subscriptions",
        }
    }
}

/// Authenticated Android Publisher client.
///
/// Implements [`ProductService`] and [`SubscriptionService`]. Clones share
/// the connection pool and the token cache.
#[derive(Debug, Clone)]
pub struct PublisherClient {
    /// HTTP client.
    http: reqwest::Client,

    /// API base URL without trailing slash.
    api_url: String,

    /// Token provider for authentication.
    token_provider: TokenProvider,

    /// Configuration.
    config: PublisherConfig,
}

impl PublisherClient {
    /// Create a client with its own HTTP transport.
    pub fn new(config: PublisherConfig, token_provider: TokenProvider) -> PublisherResult<Self> {
        let http = build_http_client(&config)?;
        Ok(Self::with_http_client(http, config, token_provider))
    }

    /// Create a client over a caller-supplied HTTP transport.
    ///
    /// The transport's own timeout applies; `config.timeout_secs` is ignored.
    pub fn with_http_client(
        http: reqwest::Client,
        config: PublisherConfig,
        token_provider: TokenProvider,
    ) -> Self {
        let api_url = config.api_url.trim_end_matches('/').to_string();
        Self {
            http,
            api_url,
            token_provider,
            config,
        }
    }

    /// Create a client authenticated by a service-account JSON key.
    pub fn from_service_account_json(
        json: &[u8],
        config: PublisherConfig,
    ) -> PublisherResult<Self> {
        let key = ServiceAccountKey::from_json(json)?;
        Self::from_service_account_key(&key, config)
    }

    /// Create a client authenticated by a service-account key file.
    pub fn from_service_account_file(
        path: impl AsRef<Path>,
        config: PublisherConfig,
    ) -> PublisherResult<Self> {
        let key = ServiceAccountKey::from_file(path)?;
        Self::from_service_account_key(&key, config)
    }

    /// Create a client authenticated by a parsed service-account key.
    pub fn from_service_account_key(
        key: &ServiceAccountKey,
        config: PublisherConfig,
    ) -> PublisherResult<Self> {
        let http = build_http_client(&config)?;
        let token_provider =
            TokenProvider::service_account(key, http.clone(), config.token_url.clone())?;
        Ok(Self::with_http_client(http, config, token_provider))
    }

    /// Get the API base URL.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn purchase_url(
        &self,
        kind: PurchaseKind,
        package: &PackageName,
        id: &str,
        token: &PurchaseToken,
        action: Option<&str>,
    ) -> String {
        let mut url = format!(
            "{}/androidpublisher/v3/applications/{}/purchases/{}/{}/tokens/{}",
            self.api_url,
            package,
            kind.segment(),
            id,
            token
        );
        if let Some(action) = action {
            url.push(':');
            url.push_str(action);
        }
        url
    }

    /// GET and decode, retrying transient failures.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> PublisherResult<T> {
        let response = self.request_with_retry(url).await?;
        response
            .json()
            .await
            .map_err(|e| PublisherError::InvalidResponse {
                message: format!("failed to parse purchase: {}", e),
            })
    }

    /// POST a lifecycle action. Sent once: mutations are never retried.
    async fn post_action(
        &self,
        url: &str,
        body: Option<&AcknowledgeRequest>,
    ) -> PublisherResult<()> {
        self.request_once(Method::POST, url, body).await.map(|_| ())
    }

    async fn subscription_action(
        &self,
        package: &PackageName,
        subscription_id: &SubscriptionId,
        token: &PurchaseToken,
        action: &'static str,
    ) -> PublisherResult<()> {
        let url = self.purchase_url(
            PurchaseKind::Subscription,
            package,
            subscription_id.as_ref(),
            token,
            Some(action),
        );
        debug!(package = %package, subscription_id = %subscription_id, action, "subscription action");
        self.post_action(&url, None).await
    }

    async fn request_with_retry(&self, url: &str) -> PublisherResult<reqwest::Response> {
        let mut retries = 0;
        let max_retries = self.config.max_retries;

        loop {
            match self.request_once(Method::GET, url, None).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_retryable() && retries < max_retries => {
                    retries += 1;
                    let backoff = self.backoff(&e, retries);

                    warn!(
                        error = %e,
                        retry = retries,
                        max_retries = max_retries,
                        backoff_ms = backoff.as_millis() as u64,
                        "retrying request"
                    );

                    tokio::time::sleep(backoff).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn backoff(&self, error: &PublisherError, retries: u32) -> Duration {
        let backoff = match error {
            PublisherError::RateLimited {
                retry_after: Some(retry_after),
            } => *retry_after,
            _ => {
                let factor = 1u64 << retries.saturating_sub(1).min(16);
                Duration::from_millis(self.config.retry_backoff_ms.saturating_mul(factor))
            }
        };
        backoff.min(MAX_BACKOFF)
    }

    /// Make a single authenticated request.
    async fn request_once(
        &self,
        method: Method,
        url: &str,
        body: Option<&AcknowledgeRequest>,
    ) -> PublisherResult<reqwest::Response> {
        let token = self.token_provider.get_token().await?;
        let mut request = self
            .http
            .request(method, url)
            .header(AUTHORIZATION, format!("Bearer {}", token));
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs);
            return Err(PublisherError::RateLimited { retry_after });
        }

        let body = response.text().await.unwrap_or_default();
        let message = extract_error_message(&body)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string());

        Err(match status.as_u16() {
            401 | 403 => PublisherError::Unauthorized { message },
            404 => PublisherError::NotFound { message },
            410 => PublisherError::Gone { message },
            status => PublisherError::Api { status, message },
        })
    }
}

#[async_trait]
impl ProductService for PublisherClient {
    async fn verify_product(
        &self,
        package: &PackageName,
        product_id: &ProductId,
        token: &PurchaseToken,
    ) -> PublisherResult<ProductPurchase> {
        let url = self.purchase_url(PurchaseKind::Product, package, product_id.as_ref(), token, None);
        debug!(package = %package, product_id = %product_id, "fetching product purchase");
        self.get_json(&url).await
    }

    async fn acknowledge_product(
        &self,
        package: &PackageName,
        product_id: &ProductId,
        token: &PurchaseToken,
        request: &AcknowledgeRequest,
    ) -> PublisherResult<()> {
        let url = self.purchase_url(
            PurchaseKind::Product,
            package,
            product_id.as_ref(),
            token,
            Some("acknowledge"),
        );
        debug!(package = %package, product_id = %product_id, "acknowledging product purchase");
        self.post_action(&url, Some(request)).await
    }
}

#[async_trait]
impl SubscriptionService for PublisherClient {
    async fn verify_subscription(
        &self,
        package: &PackageName,
        subscription_id: &SubscriptionId,
        token: &PurchaseToken,
    ) -> PublisherResult<SubscriptionPurchase> {
        let url = self.purchase_url(
            PurchaseKind::Subscription,
            package,
            subscription_id.as_ref(),
            token,
            None,
        );
        debug!(package = %package, subscription_id = %subscription_id, "fetching subscription purchase");
        self.get_json(&url).await
    }

    async fn acknowledge_subscription(
        &self,
        package: &PackageName,
        subscription_id: &SubscriptionId,
        token: &PurchaseToken,
        request: &AcknowledgeRequest,
    ) -> PublisherResult<()> {
        let url = self.purchase_url(
            PurchaseKind::Subscription,
            package,
            subscription_id.as_ref(),
            token,
            Some("acknowledge"),
        );
        debug!(package = %package, subscription_id = %subscription_id, "acknowledging subscription");
        self.post_action(&url, Some(request)).await
    }

    async fn cancel_subscription(
        &self,
        package: &PackageName,
        subscription_id: &SubscriptionId,
        token: &PurchaseToken,
    ) -> PublisherResult<()> {
        self.subscription_action(package, subscription_id, token, "cancel")
            .await
    }

    async fn refund_subscription(
        &self,
        package: &PackageName,
        subscription_id: &SubscriptionId,
        token: &PurchaseToken,
    ) -> PublisherResult<()> {
        self.subscription_action(package, subscription_id, token, "refund")
            .await
    }

    async fn revoke_subscription(
        &self,
        package: &PackageName,
        subscription_id: &SubscriptionId,
        token: &PurchaseToken,
    ) -> PublisherResult<()> {
        self.subscription_action(package, subscription_id, token, "revoke")
            .await
    }
}

fn build_http_client(config: &PublisherConfig) -> PublisherResult<reqwest::Client> {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(USER_AGENT, HeaderValue::from_static(PUBLISHER_USER_AGENT));

    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .default_headers(default_headers)
        .build()
        .map_err(|e| PublisherError::Config {
            message: format!("failed to create HTTP client: {}", e),
        })
}

/// Google API error envelope: `{"error": {"code": 404, "message": "..."}}`.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

fn extract_error_message(body: &str) -> Option<String> {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        return Some(envelope.error.message);
    }
    let trimmed = body.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
