//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Worker pool size must be between 1 and {max}, got {actual}")]
    InvalidWorkerPoolSize { actual: usize, max: usize },

    #[error("Queue capacity must be between 1 and {max}, got {actual}")]
    InvalidQueueCapacity { actual: usize, max: usize },

    #[error("Listener timeout must be greater than zero")]
    InvalidListenerTimeout,

    #[error("High value threshold must be a finite number")]
    InvalidHighValueThreshold,
}
