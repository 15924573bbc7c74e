//! Configuration loading from disk and the environment.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::{BearerToken, LogFormat, ProxyConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

impl ConfigError {
    /// True when validation failed because the bearer token is absent.
    pub fn is_missing_token(&self) -> bool {
        matches!(self, ConfigError::Validation(errors) if errors.contains(&ValidationError::MissingToken))
    }
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Values that take precedence over the config file.
///
/// Populated from the command line and environment; `None` leaves the
/// file (or default) value untouched.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub bind_address: Option<String>,
    pub static_root: Option<PathBuf>,
    pub upstream_url: Option<String>,
    pub token: Option<String>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
    pub metrics_address: Option<String>,
}

impl ProxyConfig {
    /// Layer overrides on top of this config.
    pub fn apply_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(addr) = overrides.bind_address {
            self.listener.bind_address = addr;
        }
        if let Some(root) = overrides.static_root {
            self.static_files.root = root;
        }
        if let Some(url) = overrides.upstream_url {
            self.upstream.base_url = url;
        }
        if let Some(token) = overrides.token {
            self.upstream.token = BearerToken::new(token);
        }
        if let Some(level) = overrides.log_level {
            self.observability.log_level = level;
        }
        if let Some(format) = overrides.log_format {
            self.observability.log_format = format;
        }
        if let Some(addr) = overrides.metrics_address {
            self.observability.metrics_address = Some(addr);
        }

        // apiPath always starts with '/', so the base must not end with one.
        let trimmed = self.upstream.base_url.trim_end_matches('/').len();
        self.upstream.base_url.truncate(trimmed);
        self
    }
}

/// Load a TOML file. Validation is left to the caller, after overrides.
pub fn load_config(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: ProxyConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Validate a fully layered config.
pub fn finalize(config: ProxyConfig) -> Result<ProxyConfig, ConfigError> {
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}
