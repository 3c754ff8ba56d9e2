//! Leads reporting API
//!
//! Read-only HTTP API over per-tenant lead databases: lead listings,
//! aggregate statistics and filter values, consumed by the campaign
//! dashboard. One connection pool per tenant, created lazily and reused.

mod config;
mod models;
mod server;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("leads_api=info".parse()?),
        )
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    // Missing credentials abort here, not on the first request.
    let config = config::Config::from_env()?;

    server::run_server(config).await
}
