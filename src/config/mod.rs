//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults
//!     → loader.rs (optional TOML file)
//!     → loader.rs (command line / environment overrides)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup and never mutated afterwards
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{finalize, load_config, ConfigError, Overrides};
pub use schema::{
    BearerToken, LimitsConfig, ListenerConfig, LogFormat, ObservabilityConfig, ProxyConfig,
    StaticFilesConfig, TimeoutConfig, UpstreamConfig,
};
pub use validation::{validate_config, ValidationError};
