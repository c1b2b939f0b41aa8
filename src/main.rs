//! Restaurants API
//!
//! JSON CRUD service over a single `restaurants` table.

use restaurants_api::{api, core, db};

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration (handles CLI args, env vars, and config file)
    let config = match core::config::Config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            // Logging isn't initialized yet
            eprintln!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let _logger = match core::Logger::init(&config.logging) {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            return Err(e);
        }
    };

    info!("Configuration loaded successfully");
    info!("Starting restaurants API v{}", restaurants_api::VERSION);
    info!(
        host = %config.server.host,
        port = config.server.port,
        "Server configuration"
    );
    info!(
        path = ?config.database.path,
        pool_size = config.database.connection_pool_size,
        "Database configuration"
    );
    info!(
        enabled = config.security.rate_limit_enabled,
        requests = config.security.rate_limit_requests,
        window_secs = config.security.rate_limit_window,
        "Rate limit configuration"
    );

    info!("Initializing database...");
    let db = db::DatabaseManager::new(
        &config.database.path,
        config.database.connection_pool_size,
        Duration::from_millis(config.database.busy_timeout),
    )?;
    info!("Database ready");

    let server = api::ApiServer::new(config, Arc::new(db));
    server.serve().await?;

    info!("Restaurants API stopped");
    Ok(())
}
