//! Integration tests: real `HttpTransport` against a local stub of the
//! backend billing API, exercising envelope parsing, caching, retry after a
//! server error, and client-error propagation.

mod common;

use std::sync::{Arc, Mutex};

use aegis_core::billing::{BillingClient, CheckoutRequest, Navigator, PaymentHistoryParams};
use aegis_core::cache::{CachePolicy, QueryCache};
use aegis_core::transport::{unwrap_envelope, ApiRequest, HttpTransport, Transport};

use common::api_server;

#[derive(Default)]
struct RecordingNavigator(Mutex<Vec<String>>);

impl Navigator for RecordingNavigator {
    fn redirect(&self, url: &str) {
        self.0.lock().unwrap().push(url.to_string());
    }
}

fn client_for(server: &api_server::ApiServer) -> BillingClient<HttpTransport> {
    let transport =
        HttpTransport::new(&server.base_url, Some("test-token".to_string())).unwrap();
    BillingClient::new(Arc::new(transport), QueryCache::new(CachePolicy::default()))
}

#[tokio::test]
async fn subscription_fetch_parses_envelope() {
    let server = api_server::start();
    let client = client_for(&server);

    let sub = client.subscription().await.unwrap().expect("subscribed");
    assert_eq!(sub.customer_id, "cus_123");
    assert_eq!(sub.plan_id, "pro");
    assert_eq!(sub.status, "active");
    assert_eq!(server.hits(), 1);
}

#[tokio::test]
async fn payment_history_is_served_from_cache_on_second_call() {
    let server = api_server::start();
    let client = client_for(&server);

    let first = client
        .payment_history(PaymentHistoryParams::default())
        .await
        .unwrap();
    let second = client
        .payment_history(PaymentHistoryParams::default())
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(first.payments.len(), 1);
    assert_eq!(server.hits(), 1, "second call must not hit the network");
}

#[tokio::test]
async fn read_retries_once_after_server_error() {
    let server = api_server::start_failing_first(1);
    let client = client_for(&server);

    let plans = client.plans().await.unwrap();
    assert_eq!(plans.len(), 1);
    assert_eq!(plans[0].price_id, "price_pro");
    assert_eq!(server.hits(), 2, "one failed attempt plus one retry");
}

#[tokio::test]
async fn read_gives_up_when_failures_exceed_ceiling() {
    let server = api_server::start_failing_first(2);
    let client = client_for(&server);

    let err = client.plans().await.unwrap_err();
    assert_eq!(err.status, Some(500));
    assert_eq!(server.hits(), 2, "two attempts, then a terminal failure");
}

#[tokio::test]
async fn checkout_navigates_to_provider_url() {
    let server = api_server::start();
    let client = client_for(&server);
    let navigator = RecordingNavigator::default();

    let session = client
        .create_checkout_session(CheckoutRequest::new("price_pro"), &navigator)
        .await
        .unwrap();

    assert_eq!(session.checkout_url, "https://pay.example/session/abc");
    assert_eq!(
        navigator.0.lock().unwrap().as_slice(),
        ["https://pay.example/session/abc"]
    );
}

#[tokio::test]
async fn unknown_route_surfaces_client_error_without_retry() {
    let server = api_server::start();
    let transport =
        HttpTransport::new(&server.base_url, None).unwrap();

    let resp = transport
        .send(ApiRequest::get("/api/v1/billing/unknown"))
        .await
        .unwrap();
    let err = unwrap_envelope(resp).unwrap_err();
    assert_eq!(err.status, Some(404));
    assert_eq!(err.message, "not found");
    assert_eq!(server.hits(), 1);
}
