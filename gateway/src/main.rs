//! Task gateway server

use std::net::SocketAddr;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use task_gateway::{AppState, Config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("task_gateway=info".parse()?))
        .with_target(true)
        .init();

    let config = Config::parse();
    let addr: SocketAddr = config.bind_addr.parse()?;
    let state = AppState::from_config(&config)?;

    info!(
        addr = %addr,
        upstream = %config.base_url,
        timeout_secs = config.upstream_timeout_secs,
        policy = ?config.upstream_policy(),
        "Starting task gateway"
    );

    let listener = TcpListener::bind(addr).await?;
    task_gateway::run(listener, state).await?;
    Ok(())
}
