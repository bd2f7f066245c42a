//! Startup orchestration.
//!
//! # Responsibilities
//! - Bind the listening socket
//! - Start the optional metrics exporter
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Configuration is validated before anything binds
//! - Listener binds last (traffic only when ready)

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::GatewayConfig;
use crate::observability::metrics;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },

    #[error("Invalid metrics address `{0}`")]
    MetricsAddress(String),

    #[error("Failed to start metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),
}

/// Bind the gateway listener.
pub async fn bind(config: &GatewayConfig) -> Result<TcpListener, StartupError> {
    let address = config.listener.bind_address();
    TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind { address, source })
}

/// Start the Prometheus exporter when enabled.
pub fn start_metrics(config: &GatewayConfig) -> Result<(), StartupError> {
    if !config.observability.metrics_enabled {
        return Ok(());
    }
    let addr: SocketAddr = config
        .observability
        .metrics_address
        .parse()
        .map_err(|_| StartupError::MetricsAddress(config.observability.metrics_address.clone()))?;
    metrics::init_metrics(addr)?;
    Ok(())
}
