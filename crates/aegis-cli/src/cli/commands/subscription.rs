//! `aegis subscription` – show the current subscription.

use anyhow::Result;
use aegis_core::billing::BillingClient;
use aegis_core::transport::HttpTransport;

pub async fn run_subscription(client: &BillingClient<HttpTransport>) -> Result<()> {
    match client.subscription().await? {
        None => println!("No active subscription."),
        Some(sub) => {
            println!("Plan:         {}", sub.plan_id);
            println!("Status:       {}", sub.status);
            println!("Subscription: {}", sub.subscription_id);
            println!("Customer:     {}", sub.customer_id);
        }
    }
    Ok(())
}
