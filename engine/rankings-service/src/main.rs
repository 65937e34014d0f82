//! Power rankings HTTP server

use anyhow::{Context, Result};
use clap::Parser;
use rankings_service::{create_routes, initialize_logging, RefreshService, ServiceConfig};
use rankings_store::{MemoryRankingStore, PgRankingStore, RankingStore};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};
use yahoo_fetcher::YahooClient;

/// Fantasy league power rankings API
#[derive(Parser)]
#[command(name = "power-rankings-server")]
#[command(about = "Serves and refreshes fantasy league power rankings")]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on, overriding the configuration
    #[arg(short, long)]
    port: Option<u16>,

    /// Keep rankings in memory instead of Postgres
    #[arg(long)]
    memory_store: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    let mut config =
        ServiceConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(port) = args.port {
        config.server.port = port;
    }

    initialize_logging(&config.logging)?;

    info!("Starting Power Rankings Service v{}", env!("CARGO_PKG_VERSION"));

    let store: Arc<dyn RankingStore> = if args.memory_store {
        warn!("Using in-memory store; rankings are lost on shutdown");
        Arc::new(MemoryRankingStore::new())
    } else {
        let store =
            PgRankingStore::connect(&config.database.url, config.database.max_connections)
                .await
                .context("Failed to connect to database")?;
        Arc::new(store)
    };

    let client = YahooClient::new(config.yahoo.clone()).context("Failed to create Yahoo client")?;
    info!("Yahoo client ready for league {}", client.league_key());

    let refresher = Arc::new(RefreshService::new(Arc::new(client), store.clone(), config.scoring.clone()));
    let routes = create_routes(refresher, store);

    let addr = config.bind_address()?;
    let (bound, server) = warp::serve(routes)
        .try_bind_with_graceful_shutdown(addr, shutdown_signal())
        .context("Failed to bind HTTP listener")?;

    info!("Power Rankings Service listening on {}. Press Ctrl+C to shutdown gracefully.", bound);
    server.await;

    info!("Power Rankings Service shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
