//! Android Publisher API client for Google Play purchases.
//!
//! This crate provides:
//! - Service-account authentication (JWT-bearer exchange, cached tokens)
//! - Product purchase queries and acknowledgement
//! - Subscription queries and lifecycle actions (acknowledge, cancel, refund, revoke)
//! - Validated identifiers for package names, product ids and purchase tokens
//!
//! The server-side state returned here is authoritative. For offline checks of
//! the receipt signature produced on the device, see `playstore-signature`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use playstore_publisher::{
//!     PackageName, PublisherClient, PublisherConfig, PurchaseToken, SubscriptionId,
//!     SubscriptionService,
//! };
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = PublisherClient::from_service_account_file(
//!     "service-account.json",
//!     PublisherConfig::from_env(),
//! )?;
//!
//! let subscription = client
//!     .verify_subscription(
//!         &PackageName::parse("com.example.app")?,
//!         &SubscriptionId::parse("premium_monthly")?,
//!         &PurchaseToken::parse("token-from-device")?,
//!     )
//!     .await?;
//! println!("expires at {:?}", subscription.expiry_time());
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

/// OAuth2 token providers.
pub mod auth;
/// Publisher HTTP client.
pub mod client;
/// Client configuration.
pub mod config;
/// Service-account key files.
pub mod credentials;
/// Error types for publisher operations.
pub mod error;
/// Validated identifier newtypes.
pub mod identifiers;
/// Capability traits for product and subscription operations.
pub mod service;
/// Purchase records and request bodies.
pub mod types;
/// Validation errors for identifiers.
pub mod validation;

pub use auth::{ServiceAccountProvider, TokenProvider, ANDROID_PUBLISHER_SCOPE};
pub use client::{PublisherClient, PUBLISHER_USER_AGENT};
pub use config::PublisherConfig;
pub use credentials::ServiceAccountKey;
pub use error::{PublisherError, PublisherResult};
pub use identifiers::{PackageName, ProductId, PurchaseToken, SubscriptionId};
pub use service::{ProductService, SubscriptionService};
pub use types::{AcknowledgeRequest, ProductPurchase, SubscriptionPurchase};
pub use validation::ValidationError;
