//! Upstream HTTP client.
//!
//! # Responsibilities
//! - Build the upstream URL from base URL + API path
//! - Attach `Authorization: Bearer <token>` and `Content-Type: application/json`
//! - Enforce the fixed upstream timeout
//! - Turn every result into an [`UpstreamOutcome`]
//!
//! # Design Decisions
//! - No retries: the browser application owns retry policy
//! - Caller headers are not forwarded; the outbound header set is fixed
//! - The authorization header is built once and marked sensitive

use std::error::Error as StdError;
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::http::header::{InvalidHeaderValue, AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderValue, Method};

use crate::config::UpstreamConfig;
use crate::upstream::outcome::{UpstreamOutcome, JSON_CONTENT_TYPE};

/// Error building the upstream client at startup.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamSetupError {
    #[error("bearer token contains characters not allowed in an HTTP header")]
    InvalidToken(#[from] InvalidHeaderValue),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Client for the token-protected upstream API.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: String,
    authorization: HeaderValue,
    timeout: Duration,
}

impl std::fmt::Debug for UpstreamClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl UpstreamClient {
    /// Create a client for `config.base_url` with the given per-call timeout.
    pub fn new(config: &UpstreamConfig, timeout: Duration) -> Result<Self, UpstreamSetupError> {
        let mut authorization =
            HeaderValue::from_str(&format!("Bearer {}", config.token.expose()))?;
        authorization.set_sensitive(true);

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .no_proxy()
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            authorization,
            timeout,
        })
    }

    /// Full upstream URL for an API path. The path is appended verbatim.
    pub fn target_url(&self, api_path: &str) -> String {
        format!("{}{}", self.base_url, api_path)
    }

    /// Perform one upstream call.
    ///
    /// `body` is `None` when the caller sent no body; in that case the
    /// upstream request carries none either.
    pub async fn send(&self, method: Method, api_path: &str, body: Option<Bytes>) -> UpstreamOutcome {
        let url = self.target_url(api_path);

        tracing::debug!(
            method = %method,
            upstream_url = %url,
            body_bytes = body.as_ref().map_or(0, Bytes::len),
            "Forwarding to upstream"
        );

        let mut request = self
            .http
            .request(method, url.as_str())
            .header(AUTHORIZATION, self.authorization.clone())
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE);
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return self.classify_error(&e),
        };

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => return self.classify_error(&e),
        };

        if status.is_success() {
            UpstreamOutcome::Success {
                status,
                content_type: content_type.unwrap_or_else(|| JSON_CONTENT_TYPE.to_string()),
                body,
            }
        } else {
            UpstreamOutcome::UpstreamError { status, body }
        }
    }

    fn classify_error(&self, err: &reqwest::Error) -> UpstreamOutcome {
        if err.is_builder() {
            return UpstreamOutcome::LocalFailure(describe(err));
        }
        if err.is_timeout() {
            return UpstreamOutcome::TransportFailure(format!(
                "upstream timed out after {}s",
                self.timeout.as_secs()
            ));
        }
        UpstreamOutcome::TransportFailure(describe(err))
    }
}

/// Read the incoming request body according to its `Content-Length`.
///
/// Returns `Ok(None)` when the header is absent or zero, so the upstream
/// call carries no body at all. A malformed header or an oversized body
/// is an error.
pub async fn read_request_body(
    headers: &HeaderMap,
    body: Body,
    limit: usize,
) -> Result<Option<Bytes>, String> {
    let Some(raw) = headers.get(CONTENT_LENGTH) else {
        return Ok(None);
    };

    let length: u64 = raw
        .to_str()
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .ok_or_else(|| format!("invalid Content-Length header: {raw:?}"))?;

    if length == 0 {
        return Ok(None);
    }
    if length > limit as u64 {
        return Err(format!(
            "request body of {length} bytes exceeds the {limit} byte limit"
        ));
    }

    axum::body::to_bytes(body, limit)
        .await
        .map(Some)
        .map_err(|e| format!("failed to read request body: {e}"))
}

/// Flatten an error and its sources into one line.
fn describe(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
