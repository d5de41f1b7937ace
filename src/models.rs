//! Model data shapes and how they are obtained.
//!
//! Local models are JSON files read once at bootstrap. The per-locale model is
//! fetched over HTTP through a [`JsonFetcher`], which the locale strategy looks
//! up from its context so tests can swap in a canned source.

use crate::error::ApiError;
use crate::types::{AddonId, ClientProfile};
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Legacy add-on id → replacement add-on ids
pub type LegacyReplacements = HashMap<AddonId, Vec<AddonId>>;

/// Add-on id → co-installed add-on id → weight
pub type CooccurrenceModel = HashMap<AddonId, HashMap<AddonId, f64>>;

/// Locale → ranked add-on ids
pub type LocaleModel = HashMap<String, Vec<AddonId>>;

/// A reference client whose add-ons are offered to similar clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Donor {
    #[serde(flatten)]
    pub profile: ClientProfile,
    pub addons: Vec<AddonId>,
}

/// Source of JSON documents addressed by URI
pub trait JsonFetcher: Send + Sync {
    fn fetch(&self, uri: &str) -> Result<serde_json::Value, ApiError>;
}

/// Shared handle stored in a context under [`crate::context::keys::JSON_FETCHER`]
pub type SharedJsonFetcher = Arc<dyn JsonFetcher>;

/// Blocking HTTP GET. Any non-success status is an error; nothing is retried
/// or cached.
pub struct HttpJsonFetcher {
    client: Client,
}

impl HttpJsonFetcher {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Default for HttpJsonFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonFetcher for HttpJsonFetcher {
    fn fetch(&self, uri: &str) -> Result<serde_json::Value, ApiError> {
        debug!(uri, "Fetching JSON model");
        let response = self.client.get(uri).send()?.error_for_status()?;
        Ok(response.json()?)
    }
}

/// Fetch and decode a typed document
pub fn fetch_model<T: DeserializeOwned>(
    fetcher: &dyn JsonFetcher,
    uri: &str,
) -> Result<T, ApiError> {
    let value = fetcher.fetch(uri)?;
    serde_json::from_value(value)
        .map_err(|e| ApiError::ModelLoad(format!("Malformed model from {}: {}", uri, e)))
}

/// Read and decode a JSON model file
pub fn load_model_file<T: DeserializeOwned>(path: &Path) -> Result<T, ApiError> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| {
        ApiError::ModelLoad(format!("Failed to parse {}: {}", path.display(), e))
    })
}
