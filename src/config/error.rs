//! Configuration errors

use thiserror::Error;

/// Error loading configuration from the environment
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Load(#[from] config::ConfigError),
}

/// Semantic validation failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required configuration: {0}")]
    MissingRequired(&'static str),

    #[error("invalid port: {0}")]
    InvalidPort(u16),

    #[error("unsupported locale '{0}' (expected 'ru' or 'en')")]
    UnsupportedLocale(String),

    #[error("invalid provider base url: {0}")]
    InvalidBaseUrl(String),
}
