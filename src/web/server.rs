//! Web server for smplbin.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;

use crate::bins::{BinService, BinSettings, BinStorage};
use crate::config::Config;
use crate::{Result, SmplbinError};

use super::handlers::{AppState, SharedDatabase};
use super::router::{create_health_router, create_router, create_swagger_router};

/// Web server for the API.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// CORS allowed origins.
    cors_origins: Vec<String>,
    /// Background sweep interval in seconds (0 disables it).
    sweep_interval_secs: u64,
}

impl WebServer {
    /// Create a new web server.
    ///
    /// The upload root is created if missing.
    pub fn new(config: &Config, db: SharedDatabase) -> Result<Self> {
        let addr = format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .map_err(|e| SmplbinError::Config(format!("invalid server address: {e}")))?;

        let storage = BinStorage::new(&config.storage.upload_path)?;
        tracing::info!("Bin storage initialized at: {}", config.storage.upload_path);

        let app_state = AppState::new(db, storage, BinSettings::from_config(&config.storage))
            .with_sweep_on_landing(config.sweep.on_landing);

        Ok(Self {
            addr,
            app_state: Arc::new(app_state),
            cors_origins: config.server.cors_origins.clone(),
            sweep_interval_secs: config.sweep.interval_secs,
        })
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Start the expiry sweep background task.
    fn start_sweep_task(state: Arc<AppState>, interval_secs: u64) {
        if interval_secs == 0 {
            tracing::info!("Background expiry sweep disabled");
            return;
        }

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

            // Skip the first immediate tick
            interval.tick().await;

            loop {
                interval.tick().await;

                let service = BinService::new(&state.db, &state.storage, &state.settings);
                match service.sweep_expired(Utc::now()).await {
                    Ok(count) => {
                        tracing::debug!(purged_count = count, "Background expiry sweep finished");
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to sweep expired bins");
                    }
                }
            }
        });

        tracing::info!("Expiry sweep task started (every {}s)", interval_secs);
    }

    fn build_router(&self) -> axum::Router {
        create_router(self.app_state.clone(), &self.cors_origins)
            .merge(create_health_router())
            .merge(create_swagger_router())
            .layer(CompressionLayer::new())
    }

    /// Run the web server.
    pub async fn run(self) -> std::result::Result<(), std::io::Error> {
        let router = self.build_router();

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        Self::start_sweep_task(self.app_state.clone(), self.sweep_interval_secs);

        tracing::info!("Web server listening on http://{}", local_addr);

        axum::serve(listener, router).await
    }

    /// Run the server and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> std::result::Result<SocketAddr, std::io::Error> {
        let router = self.build_router();

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        Self::start_sweep_task(self.app_state.clone(), self.sweep_interval_secs);

        tracing::info!("Web server listening on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}
