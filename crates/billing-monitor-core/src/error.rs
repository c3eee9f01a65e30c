//! Error types for BillingMonitor

use thiserror::Error;

/// Result type alias using BillingMonitor's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for BillingMonitor operations
#[derive(Error, Debug)]
pub enum Error {
    /// A required configuration value was not provided
    #[error("Missing configuration: {key} must be set")]
    MissingConfiguration {
        /// Name of the missing value
        key: &'static str,
    },

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),

    /// A declaration breaks a structural rule of the stack
    #[error("Validation error: {0}")]
    Validation(String),

    /// Internal consistency check failed
    #[error("Invariant violated: {0}")]
    Invariant(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a missing configuration error
    pub fn missing(key: &'static str) -> Self {
        Self::MissingConfiguration { key }
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invariant error
    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::Invariant(msg.into())
    }
}

impl From<::config::ConfigError> for Error {
    fn from(err: ::config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
