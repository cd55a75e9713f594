//! `aegis plans` – list available plans.

use anyhow::Result;
use aegis_core::billing::BillingClient;
use aegis_core::transport::HttpTransport;

pub async fn run_plans(client: &BillingClient<HttpTransport>) -> Result<()> {
    let plans = client.plans().await?;
    if plans.is_empty() {
        println!("No plans available.");
        return Ok(());
    }
    println!("{:<12} {:<16} {:<10} {:<8} {}", "ID", "NAME", "PRICE", "PER", "PRICE ID");
    for plan in plans {
        println!(
            "{:<12} {:<16} {:<10} {:<8} {}",
            plan.id,
            plan.name,
            format_amount(plan.amount_cents, &plan.currency),
            plan.interval,
            plan.price_id
        );
    }
    Ok(())
}

fn format_amount(cents: i64, currency: &str) -> String {
    format!("{} {}.{:02}", currency, cents / 100, (cents % 100).abs())
}
