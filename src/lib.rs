//! Ingress proxy library.
//!
//! Static files for everything except `/api/` paths, which are forwarded to a
//! token-protected upstream with CORS headers on every response.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod upstream;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{classify, RouteDecision};
