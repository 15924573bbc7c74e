//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Refuse to start without the upstream bearer token
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before the listener is bound

use std::net::SocketAddr;

use crate::config::schema::ProxyConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("upstream bearer token is not set (SUPERVISOR_TOKEN)")]
    MissingToken,

    #[error("invalid bind address '{0}'")]
    BindAddress(String),

    #[error("invalid upstream base url '{url}': {reason}")]
    UpstreamUrl { url: String, reason: String },

    #[error("invalid metrics address '{0}'")]
    MetricsAddress(String),

    #[error("timeout '{0}' must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("request timeout ({request}s) is shorter than upstream timeout ({upstream}s)")]
    RequestShorterThanUpstream { request: u64, upstream: u64 },

    #[error("max_body_size must be greater than zero")]
    ZeroBodyLimit,
}

/// Check a config for semantic errors.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.upstream.token.is_empty() {
        errors.push(ValidationError::MissingToken);
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if let Err(reason) = check_upstream_url(&config.upstream.base_url) {
        errors.push(ValidationError::UpstreamUrl {
            url: config.upstream.base_url.clone(),
            reason,
        });
    }

    if let Some(addr) = &config.observability.metrics_address {
        if addr.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::MetricsAddress(addr.clone()));
        }
    }

    let timeouts = &config.timeouts;
    if timeouts.upstream_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("upstream_secs"));
    }
    if timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("request_secs"));
    } else if timeouts.request_secs < timeouts.upstream_secs {
        errors.push(ValidationError::RequestShorterThanUpstream {
            request: timeouts.request_secs,
            upstream: timeouts.upstream_secs,
        });
    }

    if config.limits.max_body_size == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_upstream_url(raw: &str) -> Result<(), String> {
    let url = url::Url::parse(raw).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(format!("unsupported scheme '{other}'")),
    }
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err("must not carry a query or fragment".to_string());
    }
    Ok(())
}
