//! Error types for the recommendation strategy selector.
//!
//! Request-shape problems never show up here: they are absorbed by the
//! validation boundary (see [`crate::validation::ValidationError`]) and turned
//! into empty results. Everything in this module is the fatal tier.

use thiserror::Error;

/// Context lookup errors
#[derive(Debug, Error)]
pub enum ContextError {
    #[error("Context key not found: {0}")]
    NotFound(String),

    #[error("Context key '{key}' does not hold a value of type {expected}")]
    TypeMismatch { key: String, expected: &'static str },
}

/// Construction, configuration and strategy errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Context error: {0}")]
    Context(#[from] ContextError),

    #[error("Required context entry missing: {0}")]
    MissingContextEntry(String),

    #[error("Recommender not registered: {0}")]
    UnknownRecommender(String),

    #[error("Model fetch failed: {0}")]
    ModelFetch(String),

    #[error("Model load failed: {0}")]
    ModelLoad(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => ApiError::ModelFetch(format!("HTTP {}: {}", status.as_u16(), err)),
            None => ApiError::ModelFetch(err.to_string()),
        }
    }
}
