//! Domain-level error types.

use thiserror::Error;

/// Construction-time configuration errors.
///
/// Raised when a registry is built, never on the per-request path.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Rate limit for {scope} must be at least 1 request per second")]
    ZeroRate { scope: &'static str },

    #[error("Burst capacity for {scope} must be at least 1")]
    ZeroBurst { scope: &'static str },

    #[error("Sweep interval must be greater than zero")]
    ZeroSweepInterval,

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// Validation failures for values supplied through the admin surface.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("Validation failed: {0}")]
    Validation(String),
}
