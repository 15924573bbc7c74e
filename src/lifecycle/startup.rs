//! Startup orchestration.
//!
//! # Responsibilities
//! - Log the effective configuration (never the token itself)
//! - Start the optional metrics exporter
//! - Bind the listener once everything else is ready

use std::net::SocketAddr;

use tokio::net::TcpListener;

use crate::config::ProxyConfig;
use crate::observability::metrics;

/// Log what the process is about to do.
pub fn log_startup(config: &ProxyConfig) {
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "ingress-proxy starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        static_root = %config.static_files.root.display(),
        upstream = %config.upstream.base_url,
        upstream_timeout_secs = config.timeouts.upstream_secs,
        "Configuration loaded"
    );
    tracing::info!(
        token_present = !config.upstream.token.is_empty(),
        token_length = config.upstream.token.len(),
        "Upstream credential"
    );

    if !config.static_files.root.is_dir() {
        tracing::warn!(
            static_root = %config.static_files.root.display(),
            "Static root is not a directory; static requests will 404"
        );
    }
}

/// Start the Prometheus exporter if configured. Failure is logged, not fatal.
pub fn start_metrics(config: &ProxyConfig) {
    let Some(address) = &config.observability.metrics_address else {
        return;
    };
    match address.parse::<SocketAddr>() {
        Ok(addr) => {
            if let Err(e) = metrics::init_metrics(addr) {
                tracing::error!(metrics_address = %address, error = %e, "Failed to start metrics exporter");
            }
        }
        Err(e) => {
            tracing::error!(metrics_address = %address, error = %e, "Failed to parse metrics address");
        }
    }
}

/// Bind the proxy listener.
pub async fn bind_listener(config: &ProxyConfig) -> std::io::Result<TcpListener> {
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");
    Ok(listener)
}
