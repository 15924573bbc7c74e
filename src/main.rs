//! Ingress proxy
//!
//! Serves a single-page application from local static files and forwards its
//! `/api/` calls to a token-protected upstream, adding the bearer token the
//! browser never sees.
//!
//! # Architecture Overview
//!
//! ```text
//!   Browser request
//!        │
//!        ▼
//!   http::server ──▶ OPTIONS? ──▶ pre-flight 200
//!        │
//!        ▼
//!   routing::classify
//!        ├── Static   ──▶ ServeDir (static root on disk)
//!        ├── Api      ──▶ upstream::UpstreamClient ──▶ Upstream API (Bearer token)
//!        └── Rejected ──▶ 405
//!
//!   Every response leaves with Access-Control-Allow-Origin: *
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use ingress_proxy::config::{finalize, load_config, ConfigError, LogFormat, Overrides, ProxyConfig};
use ingress_proxy::http::HttpServer;
use ingress_proxy::lifecycle::{signals, startup, Shutdown};
use ingress_proxy::observability::init_logging;

/// The upstream token is read from the environment only, never from argv.
const TOKEN_ENV: &str = "SUPERVISOR_TOKEN";

#[derive(Parser)]
#[command(name = "ingress-proxy", version)]
#[command(about = "Static file server with a token-injecting /api/ reverse proxy", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long, env = "INGRESS_PROXY_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address.
    #[arg(long, env = "INGRESS_PROXY_BIND")]
    bind: Option<String>,

    /// Directory served for non-API requests.
    #[arg(long, env = "INGRESS_PROXY_STATIC_ROOT")]
    static_root: Option<PathBuf>,

    /// Upstream base URL that `/api/...` paths are appended to.
    #[arg(long, env = "INGRESS_PROXY_UPSTREAM_URL")]
    upstream_url: Option<String>,

    /// Log level for this crate (overridden by RUST_LOG).
    #[arg(long, env = "INGRESS_PROXY_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log output format.
    #[arg(long, env = "INGRESS_PROXY_LOG_FORMAT", value_enum)]
    log_format: Option<LogFormat>,

    /// Prometheus metrics listen address.
    #[arg(long, env = "INGRESS_PROXY_METRICS_ADDRESS")]
    metrics_address: Option<String>,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            bind_address: self.bind.clone(),
            static_root: self.static_root.clone(),
            upstream_url: self.upstream_url.clone(),
            token: std::env::var(TOKEN_ENV).ok(),
            log_level: self.log_level.clone(),
            log_format: self.log_format,
            metrics_address: self.metrics_address.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.config.as_deref().map(load_config).transpose() {
        Ok(file) => file.unwrap_or_default().apply_overrides(cli.overrides()),
        Err(e) => {
            eprintln!("ERROR: failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_logging(&config.observability);

    let config = match finalize(config) {
        Ok(config) => config,
        Err(e) => {
            report_config_error(&e);
            return ExitCode::FAILURE;
        }
    };

    match run(config).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Proxy terminated with error");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: ProxyConfig) -> Result<(), Box<dyn std::error::Error>> {
    startup::log_startup(&config);
    startup::start_metrics(&config);

    let server = HttpServer::new(config)?;
    let listener = startup::bind_listener(server.config()).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    signals::spawn_signal_handler(shutdown);

    server.run(listener, server_shutdown).await?;
    Ok(())
}

fn report_config_error(err: &ConfigError) {
    if err.is_missing_token() {
        tracing::error!("SUPERVISOR_TOKEN not set, refusing to start");
    }
    match err {
        ConfigError::Validation(errors) => {
            for error in errors {
                tracing::error!(error = %error, "Invalid configuration");
            }
        }
        other => tracing::error!(error = %other, "Invalid configuration"),
    }
}
