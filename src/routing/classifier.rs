//! Request classification.
//!
//! # Responsibilities
//! - Decide whether a request is static, API, or rejected
//! - Locate the API path behind an arbitrary ingress prefix
//!
//! # Design Decisions
//! - Pure function of (method, raw path): no I/O, no config
//! - The *last* `/api/` wins so a gateway mount path that itself contains
//!   `/api/` is skipped over
//! - Pre-flight OPTIONS is answered before classification

use axum::http::Method;

/// Literal segment marking the start of the upstream API path.
pub const API_SEGMENT: &str = "/api/";

/// Outcome of classifying a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Serve from the static file root.
    Static,
    /// Forward to the upstream; holds the path starting at the last `/api/`.
    Api(String),
    /// Unsupported method/path combination (405).
    Rejected,
}

impl RouteDecision {
    /// Short label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            RouteDecision::Static => "static",
            RouteDecision::Api(_) => "api",
            RouteDecision::Rejected => "rejected",
        }
    }
}

/// Classify a request by method and raw request target.
///
/// `raw_path` is the path as received, including any ingress prefix and
/// query string.
pub fn classify(method: &Method, raw_path: &str) -> RouteDecision {
    let api_path = extract_api_path(raw_path);

    match (method, api_path) {
        (&Method::GET | &Method::POST, Some(api_path)) => RouteDecision::Api(api_path.to_string()),
        (&Method::GET, None) => RouteDecision::Static,
        _ => RouteDecision::Rejected,
    }
}

/// Suffix of `raw_path` starting at the last occurrence of `/api/`.
pub fn extract_api_path(raw_path: &str) -> Option<&str> {
    raw_path.rfind(API_SEGMENT).map(|idx| &raw_path[idx..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_without_api_is_static() {
        assert_eq!(classify(&Method::GET, "/"), RouteDecision::Static);
        assert_eq!(classify(&Method::GET, "/index.html"), RouteDecision::Static);
        assert_eq!(classify(&Method::GET, "/apis/x"), RouteDecision::Static);
        assert_eq!(classify(&Method::GET, "/api"), RouteDecision::Static);
    }

    #[test]
    fn post_without_api_is_rejected() {
        assert_eq!(classify(&Method::POST, "/"), RouteDecision::Rejected);
        assert_eq!(classify(&Method::POST, "/index.html"), RouteDecision::Rejected);
    }

    #[test]
    fn direct_api_path_is_kept() {
        assert_eq!(
            classify(&Method::GET, "/api/states"),
            RouteDecision::Api("/api/states".into())
        );
        assert_eq!(
            classify(&Method::POST, "/api/services/todo/add_item"),
            RouteDecision::Api("/api/services/todo/add_item".into())
        );
    }

    #[test]
    fn last_api_segment_wins() {
        assert_eq!(
            classify(&Method::GET, "/x/api/y/api/states"),
            RouteDecision::Api("/api/states".into())
        );
        assert_eq!(
            classify(
                &Method::POST,
                "/api/hassio_ingress/abc123/api/services/todo/add_item"
            ),
            RouteDecision::Api("/api/services/todo/add_item".into())
        );
    }

    #[test]
    fn ingress_prefix_is_stripped() {
        assert_eq!(
            classify(&Method::GET, "/mount/abc123/api/states/todo.shopping_list"),
            RouteDecision::Api("/api/states/todo.shopping_list".into())
        );
    }

    #[test]
    fn query_string_travels_with_api_path() {
        assert_eq!(
            classify(&Method::GET, "/mount/api/history/period?filter_entity_id=todo.x"),
            RouteDecision::Api("/api/history/period?filter_entity_id=todo.x".into())
        );
    }

    #[test]
    fn other_methods_rejected() {
        for method in [Method::PUT, Method::DELETE, Method::PATCH, Method::HEAD] {
            assert_eq!(classify(&method, "/api/states"), RouteDecision::Rejected);
            assert_eq!(classify(&method, "/index.html"), RouteDecision::Rejected);
        }
    }

    #[test]
    fn labels() {
        assert_eq!(RouteDecision::Static.label(), "static");
        assert_eq!(RouteDecision::Api("/api/".into()).label(), "api");
        assert_eq!(RouteDecision::Rejected.label(), "rejected");
    }
}
