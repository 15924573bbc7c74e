//! Request handlers.
//!
//! Every request enters through [`dispatch`], which answers pre-flight,
//! classifies, and hands off to exactly one of the static, proxy or
//! rejection paths. Each path returns a response; none of them fail.

use std::time::Instant;

use axum::body::Body;
use axum::extract::State;
use axum::http::{Method, Request};
use axum::response::Response;
use tower::ServiceExt;

use crate::http::request::{peer_addr, raw_target, request_id};
use crate::http::response::{outcome_response, preflight_response, rejected_response};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::routing::{classify, extract_api_path, RouteDecision};
use crate::upstream::{read_request_body, UpstreamOutcome};

/// Entry point for every request.
pub async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let raw_path = raw_target(&request).to_owned();

    tracing::info!(
        request_id = %request_id(request.headers()),
        method = %method,
        path = %raw_path,
        peer_addr = ?peer_addr(&request),
        "Request received"
    );

    if method == Method::OPTIONS {
        let response = preflight_response();
        metrics::record_request("preflight", response.status().as_u16(), start);
        return response;
    }

    let decision = classify(&method, &raw_path);
    let route = decision.label();

    let response = match decision {
        RouteDecision::Static => serve_static(&state, request).await,
        RouteDecision::Api(api_path) => {
            tracing::info!(method = %method, api_path = %api_path, "Proxying API request");
            proxy(&state, request, &api_path).await
        }
        RouteDecision::Rejected => {
            tracing::warn!(method = %method, path = %raw_path, "Method not allowed");
            rejected_response(extract_api_path(&raw_path).is_some())
        }
    };

    metrics::record_request(route, response.status().as_u16(), start);
    response
}

/// Hand the request to the static file service.
async fn serve_static(state: &AppState, request: Request<Body>) -> Response {
    let path = request.uri().path().to_owned();

    let response = match state.static_files.clone().oneshot(request).await {
        Ok(response) => response.map(Body::new),
        Err(never) => match never {},
    };

    tracing::debug!(path = %path, status = %response.status(), "Static file served");
    response
}

/// Forward an API request upstream and relay the result.
async fn proxy(state: &AppState, request: Request<Body>, api_path: &str) -> Response {
    let (parts, body) = request.into_parts();

    let outcome = match read_request_body(&parts.headers, body, state.max_body_size).await {
        Ok(body) => state.upstream.send(parts.method.clone(), api_path, body).await,
        Err(reason) => UpstreamOutcome::LocalFailure(reason),
    };

    log_outcome(&parts.method, api_path, &outcome);
    if let Some(kind) = outcome.failure_kind() {
        metrics::record_upstream_failure(kind);
    }

    outcome_response(outcome)
}

fn log_outcome(method: &Method, api_path: &str, outcome: &UpstreamOutcome) {
    match outcome {
        UpstreamOutcome::Success { status, body, .. } => {
            tracing::info!(
                method = %method,
                api_path = %api_path,
                status = status.as_u16(),
                body_bytes = body.len(),
                "Upstream responded"
            );
        }
        UpstreamOutcome::UpstreamError { status, body } => {
            tracing::warn!(
                method = %method,
                api_path = %api_path,
                status = status.as_u16(),
                body = %String::from_utf8_lossy(body),
                "Upstream returned error"
            );
        }
        UpstreamOutcome::TransportFailure(reason) => {
            tracing::error!(
                method = %method,
                api_path = %api_path,
                error = %reason,
                "Upstream unreachable"
            );
        }
        UpstreamOutcome::LocalFailure(reason) => {
            tracing::error!(
                method = %method,
                api_path = %api_path,
                error = %reason,
                "Failed to build upstream request"
            );
        }
    }
}
