//! Configuration System
//!
//! Layered configuration for model locations, profile data, ensemble weights
//! and logging. Sources are merged by [`ConfigLoader`] with environment
//! variables taking precedence over files.

use crate::logging::LoggingConfig;
use crate::recommenders::ensemble::EnsembleWeights;
use crate::recommenders::LINEAR_RECOMMENDER_ORDER;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaarConfig {
    /// Client profile source
    #[serde(default)]
    pub profiles: ProfilesConfig,

    /// Model data locations
    #[serde(default)]
    pub models: ModelsConfig,

    /// Ensemble tuning
    #[serde(default)]
    pub ensemble: EnsembleConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfilesConfig {
    /// JSON array of client profiles
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelsConfig {
    #[serde(default)]
    pub legacy_path: Option<PathBuf>,

    #[serde(default)]
    pub collaborative_path: Option<PathBuf>,

    #[serde(default)]
    pub similarity_path: Option<PathBuf>,

    /// Remote per-locale model (fetched, never cached)
    #[serde(default)]
    pub locale_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnsembleConfig {
    #[serde(default)]
    pub weights: EnsembleWeights,
}

/// Configuration validation problems
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationIssue {
    Ensemble(String, String),
    Models(String),
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationIssue::Ensemble(name, msg) => {
                write!(f, "Ensemble weight '{}': {}", name, msg)
            }
            ValidationIssue::Models(msg) => write!(f, "Models: {}", msg),
        }
    }
}

impl std::error::Error for ValidationIssue {}

impl TaarConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationIssue>> {
        let mut issues = Vec::new();

        for (name, weight) in &self.ensemble.weights {
            if !LINEAR_RECOMMENDER_ORDER.contains(&name.as_str()) {
                issues.push(ValidationIssue::Ensemble(
                    name.clone(),
                    "not a known recommender".to_string(),
                ));
            }
            if !weight.is_finite() || *weight < 0.0 {
                issues.push(ValidationIssue::Ensemble(
                    name.clone(),
                    format!("must be a finite, non-negative number (got {})", weight),
                ));
            }
        }

        if let Some(url) = &self.models.locale_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                issues.push(ValidationIssue::Models(format!(
                    "locale_url must be an http(s) URL (got '{}')",
                    url
                )));
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }
}
