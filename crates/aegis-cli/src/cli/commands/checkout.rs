//! `aegis checkout` – create a provider-hosted checkout session.

use anyhow::Result;
use aegis_core::billing::{BillingClient, CheckoutRequest, Navigator};
use aegis_core::transport::HttpTransport;

/// In a browser this would be a full-page redirect; the CLI prints the URL
/// for the user to open.
struct PrintNavigator;

impl Navigator for PrintNavigator {
    fn redirect(&self, url: &str) {
        println!("Open this URL to complete checkout:");
        println!("  {url}");
    }
}

pub async fn run_checkout(
    client: &BillingClient<HttpTransport>,
    price_id: String,
    success_url: Option<String>,
    cancel_url: Option<String>,
) -> Result<()> {
    let mut request = CheckoutRequest::new(price_id);
    request.success_url = success_url;
    request.cancel_url = cancel_url;
    client.create_checkout_session(request, &PrintNavigator).await?;
    // Subscription state changes once the provider session completes.
    client.invalidate_reads();
    Ok(())
}
