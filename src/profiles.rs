//! Profile fetching: client id → telemetry attributes.

use crate::error::ApiError;
use crate::models::load_model_file;
use crate::types::ClientProfile;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Resolves a client id to its profile. `None` means the client is unknown,
/// which is different from a present profile with no attributes.
pub trait ProfileFetcher: Send + Sync {
    fn get(&self, client_id: &str) -> Option<ClientProfile>;
}

/// Shared handle stored in a context under [`crate::context::keys::PROFILE_FETCHER`]
pub type SharedProfileFetcher = Arc<dyn ProfileFetcher>;

/// Profiles held in memory, keyed by client id
#[derive(Debug, Clone, Default)]
pub struct InMemoryProfileFetcher {
    profiles: HashMap<String, ClientProfile>,
}

impl InMemoryProfileFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_profiles(profiles: impl IntoIterator<Item = ClientProfile>) -> Self {
        let mut fetcher = Self::new();
        for profile in profiles {
            fetcher.insert(profile);
        }
        fetcher
    }

    /// Load a JSON array of profiles
    pub fn load_from_file(path: &Path) -> Result<Self, ApiError> {
        let profiles: Vec<ClientProfile> = load_model_file(path)?;
        info!(path = %path.display(), count = profiles.len(), "Loaded client profiles");
        Ok(Self::from_profiles(profiles))
    }

    pub fn insert(&mut self, profile: ClientProfile) {
        self.profiles.insert(profile.client_id.clone(), profile);
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl ProfileFetcher for InMemoryProfileFetcher {
    fn get(&self, client_id: &str) -> Option<ClientProfile> {
        self.profiles.get(client_id).cloned()
    }
}
