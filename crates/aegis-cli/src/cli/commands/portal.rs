//! `aegis portal` – open a billing portal session.

use anyhow::Result;
use aegis_core::billing::BillingClient;
use aegis_core::session::AuthSession;
use aegis_core::transport::HttpTransport;

pub async fn run_portal(
    client: &BillingClient<HttpTransport>,
    session: &AuthSession,
) -> Result<()> {
    let portal = client.create_portal_session(session).await?;
    println!("Open this URL to manage your subscription:");
    println!("  {}", portal.portal_url);
    Ok(())
}
