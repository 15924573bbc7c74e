//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_requests_total` (counter): requests by route, status
//! - `proxy_request_duration_seconds` (histogram): handling latency by route
//! - `proxy_upstream_failures_total` (counter): transport/local failures
//!
//! Route labels are `static`, `api`, `preflight`, `rejected`.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one finished request.
pub fn record_request(route: &'static str, status: u16, start: Instant) {
    metrics::counter!(
        "proxy_requests_total",
        "route" => route,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("proxy_request_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}

/// Record an upstream call that produced no upstream response.
pub fn record_upstream_failure(kind: &'static str) {
    metrics::counter!("proxy_upstream_failures_total", "kind" => kind).increment(1);
}
