//! Capability traits for purchase operations.
//!
//! Backends that only need one capability can depend on the narrower trait
//! and substitute a fake in tests.

use async_trait::async_trait;

use crate::error::PublisherResult;
use crate::identifiers::{PackageName, ProductId, PurchaseToken, SubscriptionId};
use crate::types::{AcknowledgeRequest, ProductPurchase, SubscriptionPurchase};

/// One-time product purchases.
#[async_trait]
pub trait ProductService: Send + Sync {
    /// Fetches the purchase state for a product token.
    async fn verify_product(
        &self,
        package: &PackageName,
        product_id: &ProductId,
        token: &PurchaseToken,
    ) -> PublisherResult<ProductPurchase>;

    /// Acknowledges a product purchase.
    async fn acknowledge_product(
        &self,
        package: &PackageName,
        product_id: &ProductId,
        token: &PurchaseToken,
        request: &AcknowledgeRequest,
    ) -> PublisherResult<()>;
}

/// Subscription purchases.
#[async_trait]
pub trait SubscriptionService: Send + Sync {
    /// Fetches the purchase state for a subscription token.
    async fn verify_subscription(
        &self,
        package: &PackageName,
        subscription_id: &SubscriptionId,
        token: &PurchaseToken,
    ) -> PublisherResult<SubscriptionPurchase>;

    /// Acknowledges a subscription purchase.
    async fn acknowledge_subscription(
        &self,
        package: &PackageName,
        subscription_id: &SubscriptionId,
        token: &PurchaseToken,
        request: &AcknowledgeRequest,
    ) -> PublisherResult<()>;

    /// Cancels a subscription. The user keeps access until the paid period ends.
    async fn cancel_subscription(
        &self,
        package: &PackageName,
        subscription_id: &SubscriptionId,
        token: &PurchaseToken,
    ) -> PublisherResult<()>;

    /// Refunds the current period. The subscription stays valid until its
    /// expiry time and keeps recurring.
    async fn refund_subscription(
        &self,
        package: &PackageName,
        subscription_id: &SubscriptionId,
        token: &PurchaseToken,
    ) -> PublisherResult<()>;

    /// Refunds and immediately revokes a subscription. Access ends now and
    /// the subscription stops recurring.
    async fn revoke_subscription(
        &self,
        package: &PackageName,
        subscription_id: &SubscriptionId,
        token: &PurchaseToken,
    ) -> PublisherResult<()>;
}
