//! Configuration error types.

use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Port value is outside valid range (1-65535).
    #[error("invalid port '{value}': must be between 1 and 65535")]
    InvalidPort { value: String },

    /// Port string could not be parsed as a number.
    #[error("failed to parse port '{value}': {source}")]
    PortParseError {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// Bind address string could not be parsed.
    #[error("failed to parse bind address '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    /// Threshold could not be parsed as a float.
    #[error("failed to parse similarity threshold '{value}': {source}")]
    ThresholdParseError {
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    /// Threshold parsed but lies outside `[0, 1]`.
    #[error("invalid similarity threshold {value}: must be within [0, 1]")]
    InvalidThreshold { value: f64 },

    /// A numeric setting (timeout, expiry) could not be parsed or was zero.
    #[error("invalid value '{value}' for {name}: expected a positive integer")]
    InvalidNumber { name: &'static str, value: String },

    /// A required environment variable was not set.
    #[error("missing required environment variable: {name}")]
    MissingEnvVar { name: &'static str },

    /// A default provider name is not in the supported set.
    #[error("unsupported default {capability} provider '{name}'")]
    UnsupportedDefaultProvider {
        capability: &'static str,
        name: String,
    },
}
