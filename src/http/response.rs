//! Response construction.
//!
//! # Responsibilities
//! - Map every [`UpstreamOutcome`] to exactly one client response
//! - Build the pre-flight and 405 responses
//! - Synthesize JSON error bodies for local and transport failures
//!
//! # Design Decisions
//! - `Access-Control-Allow-Origin` is not set here; the server stack adds it
//!   to every response on the way out
//! - Upstream error bodies are relayed byte-for-byte

use axum::body::Body;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    ALLOW, CONTENT_TYPE,
};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::upstream::{UpstreamOutcome, JSON_CONTENT_TYPE};

/// Value of `Access-Control-Allow-Origin` on every response.
pub const CORS_ALLOW_ORIGIN: &str = "*";
/// Methods advertised to pre-flight requests.
pub const CORS_ALLOW_METHODS: &str = "GET, POST, OPTIONS";
/// Request headers advertised to pre-flight requests.
pub const CORS_ALLOW_HEADERS: &str = "Content-Type";

/// Pre-flight answer: 200, empty body, CORS negotiation headers.
pub fn preflight_response() -> Response {
    (
        StatusCode::OK,
        [
            (ACCESS_CONTROL_ALLOW_ORIGIN, CORS_ALLOW_ORIGIN),
            (ACCESS_CONTROL_ALLOW_METHODS, CORS_ALLOW_METHODS),
            (ACCESS_CONTROL_ALLOW_HEADERS, CORS_ALLOW_HEADERS),
        ],
    )
        .into_response()
}

/// 405 for a method/path combination the proxy does not serve.
///
/// `api` selects the advertised `Allow` set.
pub fn rejected_response(api: bool) -> Response {
    let allow = if api { CORS_ALLOW_METHODS } else { "GET, OPTIONS" };
    let mut response = json_error(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed");
    response.headers_mut().insert(ALLOW, HeaderValue::from_static(allow));
    response
}

/// JSON error body `{"error": message}`.
pub fn json_error(status: StatusCode, message: &str) -> Response {
    let body = json!({ "error": message }).to_string();
    (status, [(CONTENT_TYPE, JSON_CONTENT_TYPE)], body).into_response()
}

/// Client response for an upstream outcome.
pub fn outcome_response(outcome: UpstreamOutcome) -> Response {
    match outcome {
        UpstreamOutcome::Success {
            status,
            content_type,
            body,
        } => {
            let content_type = HeaderValue::from_str(&content_type)
                .unwrap_or_else(|_| HeaderValue::from_static(JSON_CONTENT_TYPE));
            (status, [(CONTENT_TYPE, content_type)], Body::from(body)).into_response()
        }
        UpstreamOutcome::UpstreamError { status, body } => (
            status,
            [(CONTENT_TYPE, JSON_CONTENT_TYPE)],
            Body::from(body),
        )
            .into_response(),
        UpstreamOutcome::TransportFailure(reason) => json_error(StatusCode::BAD_GATEWAY, &reason),
        UpstreamOutcome::LocalFailure(reason) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, &reason)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;

    async fn body_of(response: Response) -> Bytes {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
    }

    fn content_type(response: &Response) -> &str {
        response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn success_copies_status_type_and_body() {
        let response = outcome_response(UpstreamOutcome::Success {
            status: StatusCode::OK,
            content_type: "text/plain; charset=utf-8".into(),
            body: Bytes::from_static(b"hello"),
        });
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(content_type(&response), "text/plain; charset=utf-8");
        assert_eq!(body_of(response).await, "hello");
    }

    #[tokio::test]
    async fn upstream_error_relayed_as_json() {
        let response = outcome_response(UpstreamOutcome::UpstreamError {
            status: StatusCode::UNAUTHORIZED,
            body: Bytes::from_static(br#"{"error":"unauthorized"}"#),
        });
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(content_type(&response), JSON_CONTENT_TYPE);
        assert_eq!(body_of(response).await, r#"{"error":"unauthorized"}"#);
    }

    #[tokio::test]
    async fn transport_failure_is_bad_gateway() {
        let response =
            outcome_response(UpstreamOutcome::TransportFailure("connection refused".into()));
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body: serde_json::Value = serde_json::from_slice(&body_of(response).await).unwrap();
        assert_eq!(body["error"], "connection refused");
    }

    #[tokio::test]
    async fn local_failure_is_internal_error() {
        let response = outcome_response(UpstreamOutcome::LocalFailure("bad length".into()));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(content_type(&response), JSON_CONTENT_TYPE);
    }

    #[tokio::test]
    async fn preflight_has_cors_and_empty_body() {
        let response = preflight_response();
        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_METHODS], "GET, POST, OPTIONS");
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type");
        assert!(body_of(response).await.is_empty());
    }

    #[test]
    fn rejected_advertises_allowed_methods() {
        let response = rejected_response(false);
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[ALLOW], "GET, OPTIONS");
        assert_eq!(rejected_response(true).headers()[ALLOW], "GET, POST, OPTIONS");
    }
}
