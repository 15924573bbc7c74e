//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured tracing events, pretty or JSON)
//!     → metrics.rs (counters, histograms; Prometheus when enabled)
//!
//! Request correlation:
//!     → tower_http request-id layer stamps x-request-id
//!     → TraceLayer span carries it through every event
//! ```
//!
//! # Design Decisions
//! - The bearer token never appears in any event, only its length
//! - Metrics are recorded unconditionally; without an exporter they are no-ops

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
