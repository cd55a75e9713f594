//! Wire types for the billing API (camelCase JSON, matching the backend).

use serde::{Deserialize, Serialize};

/// Input for creating a provider-hosted checkout session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub price_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_url: Option<String>,
}

impl CheckoutRequest {
    pub fn new(price_id: impl Into<String>) -> Self {
        Self {
            price_id: price_id.into(),
            success_url: None,
            cancel_url: None,
        }
    }
}

/// Checkout session handle; the session itself lives with the provider.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSession {
    pub checkout_url: String,
}

/// Billing portal session handle.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PortalSession {
    pub portal_url: String,
}

/// The user's subscription as recorded by the payment provider. Read-only.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionInfo {
    pub customer_id: String,
    pub subscription_id: String,
    pub plan_id: String,
    pub status: String,
}

/// A purchasable plan.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: String,
    pub name: String,
    pub price_id: String,
    pub amount_cents: i64,
    pub currency: String,
    pub interval: String,
}

/// One settled payment in the history listing.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub amount_cents: i64,
    pub currency: String,
    pub status: String,
    pub created_at: String,
}

/// Pagination parameters for the payment history read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentHistoryParams {
    pub limit: u32,
    pub offset: u32,
}

impl Default for PaymentHistoryParams {
    fn default() -> Self {
        Self {
            limit: 10,
            offset: 0,
        }
    }
}

/// One page of payment history.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentHistoryPage {
    pub payments: Vec<Payment>,
    pub total: u64,
}
