//! StockKing API Server
//!
//! HTTP API with technical analysis, market data, tracking and stored signal
//! endpoints. Tracking endpoints and the price refresher need `DATABASE_URL`.

use dotenvy::dotenv;
use stockking::config::Config;
use stockking::core::http::{build_state, start_server};
use stockking::logging;
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    logging::init_logging();

    let config = Config::from_env();
    info!("Starting StockKing API Server");
    info!(environment = %config.environment, "Environment");
    info!(port = config.port, "HTTP Server: http://0.0.0.0:{}", config.port);

    let state = build_state(&config).await?;

    match &state.refresher {
        Some(refresher) if config.price_refresh_interval_seconds > 0 => {
            refresher.start(config.price_refresh_interval_seconds).await?;
        }
        Some(_) => info!("PRICE_REFRESH_INTERVAL_SECONDS not set - scheduled price refresh disabled"),
        None => warn!("Price refresher unavailable without a database"),
    }
    let refresher = state.refresher.clone();

    let port = config.port;
    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(state, port).await {
            error!(error = %e, "HTTP server error");
        }
    });

    info!("API server started, waiting for shutdown signal...");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down API server...");
            if let Some(refresher) = refresher {
                refresher.stop().await;
            }
            info!("API server stopped");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
        }
    }

    Ok(())
}
