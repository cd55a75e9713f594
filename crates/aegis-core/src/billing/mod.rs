//! Billing request flow: checkout, portal, payment history, subscription and
//! plan reads against the backend billing API.
//!
//! Reads go through the query cache with the query retry policy; writes are
//! single-shot mutations. All subscription state is owned by the payment
//! provider and consumed read-only here — mutations only ever open
//! provider-hosted sessions (checkout, portal).

mod client;
mod types;

pub use client::{BillingClient, Navigator};
pub use types::{
    CheckoutRequest, CheckoutSession, Payment, PaymentHistoryPage, PaymentHistoryParams, Plan,
    PortalSession, SubscriptionInfo,
};
