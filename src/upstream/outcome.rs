//! Result of a single upstream call.

use axum::body::Bytes;
use axum::http::StatusCode;

/// Content type assumed when the upstream omits one, and forced on
/// relayed error bodies.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Every way an upstream call can end.
///
/// Each variant maps to exactly one client response; see
/// [`crate::http::response::outcome_response`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamOutcome {
    /// Upstream answered with a 2xx status.
    Success {
        status: StatusCode,
        content_type: String,
        body: Bytes,
    },
    /// Upstream answered with a non-2xx status; relayed unmodified.
    UpstreamError { status: StatusCode, body: Bytes },
    /// Upstream unreachable: DNS, connect, reset, timeout.
    TransportFailure(String),
    /// Failure on our side before the call went out.
    LocalFailure(String),
}

impl UpstreamOutcome {
    /// Status the caller will see.
    pub fn client_status(&self) -> StatusCode {
        match self {
            UpstreamOutcome::Success { status, .. } | UpstreamOutcome::UpstreamError { status, .. } => {
                *status
            }
            UpstreamOutcome::TransportFailure(_) => StatusCode::BAD_GATEWAY,
            UpstreamOutcome::LocalFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Label for metrics on failure variants.
    pub fn failure_kind(&self) -> Option<&'static str> {
        match self {
            UpstreamOutcome::TransportFailure(_) => Some("transport"),
            UpstreamOutcome::LocalFailure(_) => Some("local"),
            _ => None,
        }
    }
}
