//! CLI for the AegisWallet billing client.

mod commands;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use aegis_core::billing::BillingClient;
use aegis_core::cache::QueryCache;
use aegis_core::config::{self, AegisConfig};
use aegis_core::session::AuthSession;
use aegis_core::transport::HttpTransport;

use commands::{run_checkout, run_history, run_plans, run_portal, run_subscription};

/// Top-level CLI for the AegisWallet billing client.
#[derive(Debug, Parser)]
#[command(name = "aegis")]
#[command(about = "AegisWallet billing client", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Show the current subscription.
    Subscription,

    /// List available plans.
    Plans,

    /// Show payment history.
    History {
        /// Page size.
        #[arg(long, default_value = "10")]
        limit: u32,
        /// Number of payments to skip.
        #[arg(long, default_value = "0")]
        offset: u32,
    },

    /// Create a checkout session for a plan price and print the provider URL.
    Checkout {
        /// Price identifier of the plan to subscribe to.
        price_id: String,

        /// URL the provider redirects to after a completed checkout.
        #[arg(long)]
        success_url: Option<String>,

        /// URL the provider redirects to after an abandoned checkout.
        #[arg(long)]
        cancel_url: Option<String>,
    },

    /// Open a billing portal session for the configured account.
    Portal,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);
        let client = billing_client(&cfg)?;

        match cli.command {
            CliCommand::Subscription => run_subscription(&client).await?,
            CliCommand::Plans => run_plans(&client).await?,
            CliCommand::History { limit, offset } => run_history(&client, limit, offset).await?,
            CliCommand::Checkout {
                price_id,
                success_url,
                cancel_url,
            } => run_checkout(&client, price_id, success_url, cancel_url).await?,
            CliCommand::Portal => {
                let session = session_from(&cfg)?;
                run_portal(&client, &session).await?;
            }
        }

        Ok(())
    }
}

fn billing_client(cfg: &AegisConfig) -> Result<BillingClient<HttpTransport>> {
    let token = std::env::var("AEGIS_API_TOKEN").ok();
    let transport = HttpTransport::new(&cfg.backend_url, token)
        .with_context(|| format!("cannot reach backend at {}", cfg.backend_url))?;
    let cache = QueryCache::new(cfg.cache_policy());
    Ok(BillingClient::with_policies(
        Arc::new(transport),
        cache,
        cfg.query_policy(),
        cfg.mutation_policy(),
    ))
}

fn session_from(cfg: &AegisConfig) -> Result<AuthSession> {
    let account = cfg
        .account
        .as_ref()
        .context("no account configured; add an [account] section to config.toml")?;
    Ok(AuthSession::new(
        account.user_id.clone(),
        account.customer_id.clone(),
    ))
}
