//! Resolution context configuration
//!
//! Contexts can be configured in code with the `with_*` builders or loaded
//! from TOML:
//!
//! ```toml
//! max-update-interval = 5        # seconds
//! unknown-placeholders = "keep"  # or "empty"
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// What to do with a `%span%` no placeholder claims
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnknownPlaceholders {
    /// Leave the span in the output as written
    #[default]
    Keep,
    /// Replace the span with the empty string
    Empty,
}

/// Default refresh interval of resolved items
pub const DEFAULT_MAX_UPDATE_INTERVAL: Duration = Duration::from_secs(5);

/// Configuration for a [`PlaceholderContext`](crate::PlaceholderContext)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextConfig {
    /// How long a resolved item's value stays fresh. Zero recomputes on
    /// every access.
    pub max_update_interval: Duration,
    pub unknown_placeholders: UnknownPlaceholders,
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct TomlContextConfig {
    max_update_interval: Option<u64>,
    unknown_placeholders: Option<UnknownPlaceholders>,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            max_update_interval: DEFAULT_MAX_UPDATE_INTERVAL,
            unknown_placeholders: UnknownPlaceholders::Keep,
        }
    }
}

impl ContextConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string; missing keys take defaults
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlContextConfig = toml::from_str(content)?;
        let defaults = Self::default();

        Ok(ContextConfig {
            max_update_interval: parsed
                .max_update_interval
                .map(Duration::from_secs)
                .unwrap_or(defaults.max_update_interval),
            unknown_placeholders: parsed
                .unknown_placeholders
                .unwrap_or(defaults.unknown_placeholders),
        })
    }

    /// Set the refresh interval
    pub fn with_max_update_interval(mut self, interval: Duration) -> Self {
        self.max_update_interval = interval;
        self
    }

    /// Set the policy for unknown spans
    pub fn with_unknown_placeholders(mut self, policy: UnknownPlaceholders) -> Self {
        self.unknown_placeholders = policy;
        self
    }
}
