//! Upstream subsystem.
//!
//! # Data Flow
//! ```text
//! Api(api_path) decision
//!     → client.rs read_request_body (Content-Length driven)
//!     → client.rs UpstreamClient::send (auth header, fixed timeout)
//!     → outcome.rs UpstreamOutcome
//!     → http::response maps the outcome to the client response
//! ```

pub mod client;
pub mod outcome;

pub use client::{read_request_body, UpstreamClient, UpstreamSetupError};
pub use outcome::{UpstreamOutcome, JSON_CONTENT_TYPE};
