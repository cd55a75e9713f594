//! `aegis history` – show payment history.

use anyhow::Result;
use aegis_core::billing::{BillingClient, PaymentHistoryParams};
use aegis_core::transport::HttpTransport;

pub async fn run_history(
    client: &BillingClient<HttpTransport>,
    limit: u32,
    offset: u32,
) -> Result<()> {
    let page = client
        .payment_history(PaymentHistoryParams { limit, offset })
        .await?;
    if page.payments.is_empty() {
        println!("No payments found.");
        return Ok(());
    }
    println!("{:<16} {:<12} {:<12} {}", "ID", "AMOUNT", "STATUS", "DATE");
    for payment in &page.payments {
        println!(
            "{:<16} {:<12} {:<12} {}",
            payment.id,
            format!("{} {}", payment.currency, payment.amount_cents as f64 / 100.0),
            payment.status,
            payment.created_at
        );
    }
    println!(
        "Showing {} of {} payments (offset {}).",
        page.payments.len(),
        page.total,
        offset
    );
    Ok(())
}
