use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use reachplan::config::{CredentialConfig, EndpointConfig, ServerConfig};
use reachplan::{server, services};

/// reachplan - YouTube reach planning service
///
/// Serves plannable products, accessible customer accounts and reach
/// forecasts from the Google Ads Reach Planning API over HTTP.
///
/// Every option can also be set through the environment variable shown
/// next to it. A `.env` file in the working directory is loaded first.
#[derive(Parser, Debug)]
#[command(author, version = env!("REACHPLAN_VERSION"), about)]
struct Cli {
    #[command(flatten)]
    server: ServerConfig,

    #[command(flatten)]
    credentials: CredentialConfig,

    #[command(flatten)]
    endpoints: EndpointConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.server.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!(
        "Starting reachplan {} ({})",
        env!("REACHPLAN_VERSION"),
        cli.server.environment
    );

    let executor = services::build_executor(cli.credentials, &cli.endpoints)?;

    let addr = cli.server.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    server::serve(listener, server::router(Arc::new(executor))).await
}
