//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID, raw target, peer address)
//!     → handlers.rs (pre-flight | classify → static / proxy / 405)
//!     → response.rs (outcome → status, content type, body)
//!     → CORS origin header added on the way out
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer, ServerError};
