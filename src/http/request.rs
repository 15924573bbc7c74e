//! Request inspection helpers.
//!
//! # Responsibilities
//! - Recover the raw request target (path + query) used for classification
//! - Read the request ID stamped by the request-id layer
//! - Find the peer address when the server recorded one
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Nothing here mutates the request

use std::net::SocketAddr;

use axum::extract::ConnectInfo;
use axum::http::{HeaderMap, HeaderName, Request};

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Path and query exactly as the client sent them.
pub fn raw_target<B>(request: &Request<B>) -> &str {
    let uri = request.uri();
    uri.path_and_query()
        .map_or_else(|| uri.path(), |pq| pq.as_str())
}

/// Request ID, or `"unknown"` if the layer has not run.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Peer address, present when served with connect info.
pub fn peer_addr<B>(request: &Request<B>) -> Option<SocketAddr> {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr)
}
