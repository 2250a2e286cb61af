//! Error handling for the metering engine
//!
//! This module defines all error types used throughout the engine.

use thiserror::Error;

/// Result type alias for the engine
pub type Result<T> = std::result::Result<T, EngineError>;

/// Main error type for the metering engine
#[derive(Error, Debug)]
pub enum EngineError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Storage errors (counter or subscription store)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Unknown metric / action name
    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Whether the error is a caller mistake (4xx class) rather than an
    /// infrastructure failure.
    pub fn is_client_error(&self) -> bool {
        matches!(self, EngineError::UnknownMetric(_))
    }
}
