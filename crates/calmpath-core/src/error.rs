//! Core error types for calmpath-core.
//!
//! The breathing session has no error conditions of its own; everything here
//! belongs to configuration, price parsing and the site controller.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for calmpath-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A price string that could not be turned into an amount
    #[error("Price error: {0}")]
    Price(#[from] PriceParseError),

    /// Catalog lookup by id failed
    #[error("Unknown offering: {0}")]
    UnknownOffering(String),

    /// A page name that does not map to any view
    #[error("Unknown view: {0}")]
    UnknownView(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// Home/data directory could not be prepared
    #[error("Data directory unavailable at {path}: {source}")]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why a price string was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceParseError {
    /// Nothing numeric left after stripping currency markers
    #[error("price '{0}' has no amount")]
    Empty(String),

    /// Digits present but not a well-formed decimal amount
    #[error("price '{0}' is not a valid amount")]
    Malformed(String),

    /// Amounts below zero are never sold
    #[error("price '{0}' is negative")]
    Negative(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_error_lifts_into_core_error() {
        let err: CoreError = PriceParseError::Malformed("$4.5.0".into()).into();
        assert_eq!(err.to_string(), "Price error: price '$4.5.0' is not a valid amount");
    }

    #[test]
    fn config_error_mentions_key() {
        let err = ConfigError::UnknownKey("pacer.nope".into());
        assert!(err.to_string().contains("pacer.nope"));
    }
}
