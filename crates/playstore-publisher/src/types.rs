//! Purchase records exchanged with the Android Publisher API.
//!
//! Field names follow the API's camelCase JSON. Timestamps arrive as epoch
//! milliseconds encoded as decimal strings; accessor methods convert them.
//! Fields this crate does not model are preserved in `other`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `acknowledgementState` value for acknowledged purchases.
const ACKNOWLEDGED: i32 = 1;

/// State of a one-time product purchase.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPurchase {
    /// Resource kind, e.g. `androidpublisher#productPurchase`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Google order id (`GPA.xxxx`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    /// Purchased SKU.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    /// Token identifying the purchase.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_token: Option<String>,
    /// Purchase time, epoch millis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_time_millis: Option<String>,
    /// 0 purchased, 1 canceled, 2 pending.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_state: Option<i32>,
    /// 0 yet to be consumed, 1 consumed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumption_state: Option<i32>,
    /// 0 yet to be acknowledged, 1 acknowledged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acknowledgement_state: Option<i32>,
    /// 0 test, 1 promo, 2 rewarded; absent for regular purchases.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_type: Option<i32>,
    /// Purchased quantity; absent means 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i32>,
    /// Payload set at acknowledgement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub developer_payload: Option<String>,
    /// Obfuscated account id passed to the billing flow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obfuscated_external_account_id: Option<String>,
    /// Obfuscated profile id passed to the billing flow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obfuscated_external_profile_id: Option<String>,
    /// ISO 3166-1 alpha-2 billing region.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_code: Option<String>,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl ProductPurchase {
    /// When the product was purchased.
    pub fn purchase_time(&self) -> Option<DateTime<Utc>> {
        millis_to_datetime(self.purchase_time_millis.as_deref())
    }

    /// Whether the purchase is completed (neither canceled nor pending).
    pub fn is_purchased(&self) -> bool {
        self.purchase_state == Some(0)
    }

    /// Whether the purchase has been acknowledged.
    pub fn is_acknowledged(&self) -> bool {
        self.acknowledgement_state == Some(ACKNOWLEDGED)
    }

    /// Whether the purchase was made with a license test account.
    pub fn is_test_purchase(&self) -> bool {
        self.purchase_type == Some(0)
    }
}

/// State of a subscription purchase.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPurchase {
    /// Resource kind, e.g. `androidpublisher#subscriptionPurchase`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Google order id (`GPA.xxxx`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    /// Grant time, epoch millis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time_millis: Option<String>,
    /// Expiry time, epoch millis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_time_millis: Option<String>,
    /// Resume time of a paused subscription, epoch millis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_resume_time_millis: Option<String>,
    /// Whether the subscription renews at expiry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_renewing: Option<bool>,
    /// ISO 4217 currency code of the price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_currency_code: Option<String>,
    /// Price in micro-units of the currency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_amount_micros: Option<String>,
    /// ISO 3166-1 alpha-2 billing country.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    /// 0 pending, 1 received, 2 free trial, 3 pending deferred upgrade/downgrade.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_state: Option<i32>,
    /// 0 user, 1 system (e.g. billing problem), 2 replaced, 3 developer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancel_reason: Option<i32>,
    /// When the user canceled, epoch millis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_cancellation_time_millis: Option<String>,
    /// Token of the purchase this one replaced (upgrade/downgrade).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_purchase_token: Option<String>,
    /// 0 test, 1 promo; absent for regular purchases.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_type: Option<i32>,
    /// 0 yet to be acknowledged, 1 acknowledged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acknowledgement_state: Option<i32>,
    /// Payload set at acknowledgement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub developer_payload: Option<String>,
    /// Obfuscated account id passed to the billing flow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obfuscated_external_account_id: Option<String>,
    /// Obfuscated profile id passed to the billing flow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obfuscated_external_profile_id: Option<String>,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl SubscriptionPurchase {
    /// When the subscription was granted.
    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        millis_to_datetime(self.start_time_millis.as_deref())
    }

    /// When the subscription expires unless renewed.
    pub fn expiry_time(&self) -> Option<DateTime<Utc>> {
        millis_to_datetime(self.expiry_time_millis.as_deref())
    }

    /// Whether the subscription grants access at `now`.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry_time().is_some_and(|expiry| expiry > now)
    }

    /// Whether the subscription has been acknowledged.
    pub fn is_acknowledged(&self) -> bool {
        self.acknowledgement_state == Some(ACKNOWLEDGED)
    }
}

/// Body of the `:acknowledge` calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcknowledgeRequest {
    /// Payload attached to the purchase.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub developer_payload: Option<String>,
}

impl AcknowledgeRequest {
    /// Request carrying a developer payload.
    pub fn with_payload(payload: impl Into<String>) -> Self {
        Self {
            developer_payload: Some(payload.into()),
        }
    }
}

fn millis_to_datetime(millis: Option<&str>) -> Option<DateTime<Utc>> {
    millis
        .and_then(|m| m.parse::<i64>().ok())
        .and_then(DateTime::from_timestamp_millis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn product_purchase_from_api_json() {
        let purchase: ProductPurchase = serde_json::from_value(json!({
            "kind": "androidpublisher#productPurchase",
            "purchaseTimeMillis": "1700000000000",
            "purchaseState": 0,
            "consumptionState": 0,
            "orderId": "GPA.3372-1193-2811-40532",
            "acknowledgementState": 1,
            "regionCode": "US",
            "refundableQuantity": 1
        }))
        .unwrap();

        assert!(purchase.is_purchased());
        assert!(purchase.is_acknowledged());
        assert!(!purchase.is_test_purchase());
        assert_eq!(
            purchase.purchase_time(),
            DateTime::from_timestamp_millis(1_700_000_000_000)
        );
        assert_eq!(purchase.other.get("refundableQuantity"), Some(&json!(1)));
    }

    #[test]
    fn subscription_activity_depends_on_expiry() {
        let subscription: SubscriptionPurchase = serde_json::from_value(json!({
            "startTimeMillis": "1700000000000",
            "expiryTimeMillis": "1700086400000",
            "autoRenewing": true,
            "paymentState": 1
        }))
        .unwrap();

        let before = DateTime::from_timestamp_millis(1_700_000_000_001).unwrap();
        let after = DateTime::from_timestamp_millis(1_700_086_400_001).unwrap();
        assert!(subscription.is_active_at(before));
        assert!(!subscription.is_active_at(after));
        assert!(!subscription.is_acknowledged());
    }

    #[test]
    fn malformed_millis_are_ignored() {
        let subscription = SubscriptionPurchase {
            expiry_time_millis: Some("soon".to_string()),
            ..Default::default()
        };
        assert_eq!(subscription.expiry_time(), None);
        assert!(!subscription.is_active_at(Utc::now()));
    }

    #[test]
    fn acknowledge_request_omits_empty_payload() {
        assert_eq!(
            serde_json::to_value(AcknowledgeRequest::default()).unwrap(),
            json!({})
        );
        assert_eq!(
            serde_json::to_value(AcknowledgeRequest::with_payload("p")).unwrap(),
            json!({ "developerPayload": "p" })
        );
    }
}
