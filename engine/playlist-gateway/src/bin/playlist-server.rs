//! REST API server for playlist history, stats, and capture health

use health_monitor::AlertThresholds;
use playlist_gateway::rest_api;
use playlist_gateway::GatewayConfig;
use playlist_store::{PlaylistStore, StoreConfig};
use std::sync::Arc;
use tracing::{info, Level};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    info!("Starting playlist API server...");

    // Load gateway configuration, falling back to defaults
    let config = match std::env::var("PLAYLIST_GATEWAY_CONFIG") {
        Ok(path) => {
            info!("Loading configuration from {}", path);
            GatewayConfig::load_from_file(&path)?
        }
        Err(_) => GatewayConfig::default(),
    };

    // Connect to the playlist store and verify connectivity
    let store_config = StoreConfig::from_env();
    let store = PlaylistStore::connect(&store_config).await?;
    store.ping().await?;

    info!("Connected to database");

    let thresholds: Arc<AlertThresholds> = Arc::new(config.thresholds.clone());
    let routes = rest_api::create_routes(Arc::new(store), thresholds);

    // Start server
    let addr = config.server_addr()?;
    info!("Starting REST API server on {}", addr);

    warp::serve(routes).run(addr).await;

    Ok(())
}
