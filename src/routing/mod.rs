//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path + query)
//!     → OPTIONS? answered as pre-flight, never classified
//!     → classifier.rs (pure classification)
//!     → Return: Static | Api(api_path) | Rejected
//! ```
//!
//! # Design Decisions
//! - No configuration: the `/api/` marker is fixed
//! - Deterministic: same input always yields the same decision

pub mod classifier;

pub use classifier::{classify, extract_api_path, RouteDecision, API_SEGMENT};
