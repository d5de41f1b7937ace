//! Recommender factory: builds named strategies from the constructors
//! registered in a context.

use crate::context::{keys, Context};
use crate::error::ApiError;
use crate::recommenders::SharedRecommender;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Deferred strategy constructor
pub type RecommenderConstructor =
    Arc<dyn Fn() -> Result<SharedRecommender, ApiError> + Send + Sync>;

/// Strategy name → constructor, stored under [`keys::RECOMMENDER_FACTORY_MAP`]
pub type RecommenderFactoryMap = BTreeMap<String, RecommenderConstructor>;

/// Creates strategy instances on demand.
///
/// Every `create` call runs the constructor again; nothing is cached here.
pub struct RecommenderFactory {
    factory_map: Arc<RecommenderFactoryMap>,
}

impl RecommenderFactory {
    pub fn new(ctx: &Context) -> Result<Self, ApiError> {
        let factory_map = ctx.get::<RecommenderFactoryMap>(keys::RECOMMENDER_FACTORY_MAP)?;
        Ok(Self { factory_map })
    }

    /// Registered strategy names, sorted
    pub fn get_names(&self) -> Vec<String> {
        self.factory_map.keys().cloned().collect()
    }

    pub fn create(&self, name: &str) -> Result<SharedRecommender, ApiError> {
        let constructor = self
            .factory_map
            .get(name)
            .ok_or_else(|| ApiError::UnknownRecommender(name.to_string()))?;
        debug!(recommender = name, "Creating recommender");
        constructor()
    }
}
