//! Billing client: composes the transport, the query cache and the retry
//! policies into the five billing operations.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::cache::{QueryCache, QueryKey};
use crate::retry::{run_with_retry, RetryPolicy};
use crate::session::AuthSession;
use crate::transport::{unwrap_envelope, ApiRequest, RequestError, Transport};

use super::types::{
    CheckoutRequest, CheckoutSession, PaymentHistoryPage, PaymentHistoryParams, Plan,
    PortalSession, SubscriptionInfo,
};

const CHECKOUT_PATH: &str = "/api/v1/billing/checkout";
const PORTAL_PATH: &str = "/api/v1/billing/portal";
const PAYMENT_HISTORY_PATH: &str = "/api/v1/billing/payment-history";
const SUBSCRIPTION_PATH: &str = "/api/v1/billing/subscription";
const PLANS_PATH: &str = "/api/v1/billing/plans";

/// Portal-less users get this instead of a round trip to the provider.
const NO_SUBSCRIPTION_MESSAGE: &str = "Assinatura não encontrada";

/// Post-success redirect hook for checkout.
///
/// The checkout session lives with the payment provider, so completing it
/// means leaving the application entirely; this trait makes that side effect
/// explicit and stubbable.
pub trait Navigator: Send + Sync {
    fn redirect(&self, url: &str);
}

/// Client for the backend billing API.
pub struct BillingClient<T: Transport> {
    transport: Arc<T>,
    cache: QueryCache,
    query_retry: RetryPolicy,
    mutation_retry: RetryPolicy,
}

impl<T: Transport> BillingClient<T> {
    pub fn new(transport: Arc<T>, cache: QueryCache) -> Self {
        Self::with_policies(transport, cache, RetryPolicy::query(), RetryPolicy::mutation())
    }

    pub fn with_policies(
        transport: Arc<T>,
        cache: QueryCache,
        query_retry: RetryPolicy,
        mutation_retry: RetryPolicy,
    ) -> Self {
        Self {
            transport,
            cache,
            query_retry,
            mutation_retry,
        }
    }

    /// Creates a provider-hosted checkout session and hands the returned URL
    /// to `navigator` for the full-page redirect.
    pub async fn create_checkout_session(
        &self,
        req: CheckoutRequest,
        navigator: &dyn Navigator,
    ) -> Result<CheckoutSession, RequestError> {
        let body = serde_json::to_value(&req)
            .map_err(|e| RequestError::message(format!("invalid checkout request: {e}")))?;
        let data = self.post(CHECKOUT_PATH, body).await?;
        let session: CheckoutSession = parse_payload(data)?;
        tracing::info!(url = %session.checkout_url, "checkout session created");
        navigator.redirect(&session.checkout_url);
        Ok(session)
    }

    /// Opens a billing portal session for the signed-in user.
    ///
    /// Fails locally with a 400-class error when the session carries no
    /// provider customer id; no request is issued in that case.
    pub async fn create_portal_session(
        &self,
        session: &AuthSession,
    ) -> Result<PortalSession, RequestError> {
        let Some(customer_id) = &session.customer_id else {
            tracing::debug!(user = %session.user_id, "portal requested without customer id");
            return Err(RequestError::with_status(400, NO_SUBSCRIPTION_MESSAGE));
        };
        let data = self
            .post(PORTAL_PATH, json!({ "customerId": customer_id }))
            .await?;
        parse_payload(data)
    }

    /// Paginated payment history. Cached per `(limit, offset)` pair.
    pub async fn payment_history(
        &self,
        params: PaymentHistoryParams,
    ) -> Result<PaymentHistoryPage, RequestError> {
        let key = QueryKey::new("billing")
            .push("payment-history")
            .push(params.limit)
            .push(params.offset);
        let data = self
            .cached_get(&key, move |path| {
                ApiRequest::get(path)
                    .with_query("limit", params.limit)
                    .with_query("offset", params.offset)
            }, PAYMENT_HISTORY_PATH)
            .await?;
        parse_payload(data)
    }

    /// The user's current subscription, if any. Plain cached read.
    pub async fn subscription(&self) -> Result<Option<SubscriptionInfo>, RequestError> {
        let key = QueryKey::new("billing").push("subscription");
        let data = self.cached_get(&key, ApiRequest::get, SUBSCRIPTION_PATH).await?;
        if data.is_null() {
            return Ok(None);
        }
        parse_payload(data).map(Some)
    }

    /// Available plans. Plain cached read.
    pub async fn plans(&self) -> Result<Vec<Plan>, RequestError> {
        let key = QueryKey::new("billing").push("plans");
        let data = self.cached_get(&key, ApiRequest::get, PLANS_PATH).await?;
        parse_payload(data)
    }

    /// Drops all cached billing reads (e.g. after returning from checkout).
    pub fn invalidate_reads(&self) {
        self.cache.invalidate(&QueryKey::new("billing").push("subscription"));
        self.cache.invalidate(&QueryKey::new("billing").push("plans"));
    }

    async fn post(&self, path: &'static str, body: Value) -> Result<Value, RequestError> {
        let transport = &self.transport;
        run_with_retry(&self.mutation_retry, || {
            let request = ApiRequest::post(path, body.clone());
            async move { unwrap_envelope(transport.send(request).await?) }
        })
        .await
    }

    async fn cached_get<B>(
        &self,
        key: &QueryKey,
        build: B,
        path: &'static str,
    ) -> Result<Value, RequestError>
    where
        B: Fn(&'static str) -> ApiRequest,
    {
        let transport = &self.transport;
        self.cache
            .get_or_fetch(key, &self.query_retry, || {
                let request = build(path);
                async move { unwrap_envelope(transport.send(request).await?) }
            })
            .await
    }
}

fn parse_payload<P: DeserializeOwned>(data: Value) -> Result<P, RequestError> {
    serde_json::from_value(data)
        .map_err(|e| RequestError::message(format!("invalid response payload: {e}")))
}
