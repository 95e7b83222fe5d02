pub mod handlers;
pub mod router;

use crate::adapters::http::UpstreamClient;
use crate::core::price_service::PriceService;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub prices: Arc<PriceService>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(prices: PriceService) -> Self {
        Self {
            prices: Arc::new(prices),
            started_at: Utc::now(),
        }
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        let upstream = UpstreamClient::from_config(config)?;
        debug!("Upstream endpoint: {}", upstream.redacted_endpoint());

        let service = PriceService::new(Arc::new(upstream), config.field_mapping());
        Ok(Self::new(service))
    }
}

pub async fn serve<C: ConfigProvider + ?Sized>(config: &C) -> anyhow::Result<()> {
    let state = AppState::from_config(config)?;
    let app = router::create_router(state);

    let bind_address = config.bind_address();
    info!("Starting server on {}", bind_address);
    let listener = match TcpListener::bind(bind_address).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to address {}: {}", bind_address, e);
            return Err(e.into());
        }
    };

    info!("🌾 Crop price API running on http://{}/api/prices", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
