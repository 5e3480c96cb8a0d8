use std::process;
use std::sync::Arc;

use tracing::{error, info};

use smplbin::web::WebServer;
use smplbin::{Config, Database};

#[tokio::main]
async fn main() {
    // Load configuration
    let mut config = match Config::load("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            Config::default()
        }
    };
    config.apply_env_overrides();

    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {e}");
        process::exit(1);
    }

    // Initialize logging
    if let Err(e) = smplbin::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        smplbin::logging::init_console_only(&config.logging.level);
    }

    info!("smplbin - Simple temporary file bins");
    info!(
        "Bins hold up to {} bytes and expire after {} day(s)",
        config.storage.max_bin_size_bytes, config.storage.retention_days
    );

    let db = match Database::open(&config.database.path).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to open database {}: {}", config.database.path, e);
            process::exit(1);
        }
    };

    let server = match WebServer::new(&config, Arc::new(db)) {
        Ok(server) => server,
        Err(e) => {
            error!("Failed to start web server: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = server.run().await {
        error!("Web server error: {}", e);
        process::exit(1);
    }
}
