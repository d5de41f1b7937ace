//! Recommendation manager: chooses which strategy answers a request.
//!
//! Construction happens in two phases. First the linear strategies are built
//! from the factory into a [`LinearChain`], which only exists fully populated.
//! Then the chain's map is published to the context and the ensemble is built
//! from it and registered under `"ensemble"`.

use crate::context::{keys, Context};
use crate::error::ApiError;
use crate::profiles::SharedProfileFetcher;
use crate::recommenders::{
    EnsembleRecommender, RecommenderFactory, RecommenderMap, SharedRecommender,
};
use crate::types::{AddonId, Branch, ClientProfile, ExtraData};
use crate::validation::{RecommendationQuery, ValidationBoundary};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::info;

/// Fallback priority of the linear branch
pub const LINEAR_RECOMMENDER_ORDER: [&str; 4] = ["legacy", "collaborative", "similarity", "locale"];

/// The fully built linear strategies, in priority order
pub struct LinearChain {
    ordered: Vec<SharedRecommender>,
    by_name: RecommenderMap,
}

impl LinearChain {
    /// Create one instance per name in [`LINEAR_RECOMMENDER_ORDER`]
    pub fn build(factory: &RecommenderFactory) -> Result<Self, ApiError> {
        let mut ordered = Vec::with_capacity(LINEAR_RECOMMENDER_ORDER.len());
        let mut by_name = RecommenderMap::new();
        for name in LINEAR_RECOMMENDER_ORDER {
            let recommender = factory.create(name)?;
            ordered.push(Arc::clone(&recommender));
            by_name.insert(name.to_string(), recommender);
        }
        Ok(Self { ordered, by_name })
    }

    pub fn ordered(&self) -> &[SharedRecommender] {
        &self.ordered
    }

    pub fn by_name(&self) -> &RecommenderMap {
        &self.by_name
    }
}

pub struct RecommendationManager {
    ctx: Context,
    profile_fetcher: SharedProfileFetcher,
    linear: LinearChain,
    ensemble: SharedRecommender,
    recommender_map: RecommenderMap,
    boundary: ValidationBoundary<RecommendationQuery>,
}

impl RecommendationManager {
    /// Requires `recommender_factory` and `profile_fetcher` in the context.
    pub fn new(ctx: &Context) -> Result<Self, ApiError> {
        let ctx = ctx.child();

        let recommender_factory = ctx
            .get::<RecommenderFactory>(keys::RECOMMENDER_FACTORY)
            .map_err(|_| ApiError::MissingContextEntry(keys::RECOMMENDER_FACTORY.to_string()))?;
        let profile_fetcher = ctx
            .get::<SharedProfileFetcher>(keys::PROFILE_FETCHER)
            .map_err(|_| ApiError::MissingContextEntry(keys::PROFILE_FETCHER.to_string()))?
            .as_ref()
            .clone();

        info!("Initializing recommenders");
        let linear = LinearChain::build(&recommender_factory)?;

        ctx.set(keys::RECOMMENDER_MAP, linear.by_name().clone());
        let ensemble: SharedRecommender = Arc::new(EnsembleRecommender::new(&ctx)?);

        let mut recommender_map = linear.by_name().clone();
        recommender_map.insert(EnsembleRecommender::NAME.to_string(), Arc::clone(&ensemble));

        Ok(Self {
            ctx,
            profile_fetcher,
            linear,
            ensemble,
            recommender_map,
            boundary: ValidationBoundary::new(),
        })
    }

    /// Recommend up to `limit` add-ons for a client.
    ///
    /// Malformed input yields an empty list without touching the profile
    /// fetcher. Errors are only returned for strategy failures.
    pub fn recommend(
        &self,
        client_id: &str,
        limit: i64,
        extra_data: &ExtraData,
    ) -> Result<Vec<AddonId>, ApiError> {
        self.recommend_with_args(
            vec![
                Value::String(client_id.to_string()),
                Value::from(limit),
                Value::Object(extra_data.clone()),
            ],
            Map::new(),
        )
    }

    /// Same as [`Self::recommend`] for loosely typed callers
    pub fn recommend_with_args(
        &self,
        positional: Vec<Value>,
        keyword: Map<String, Value>,
    ) -> Result<Vec<AddonId>, ApiError> {
        self.boundary
            .guard(positional, keyword, |query| self.recommend_validated(&query))
    }

    fn recommend_validated(&self, query: &RecommendationQuery) -> Result<Vec<AddonId>, ApiError> {
        let Some(client_info) = self.profile_fetcher.get(&query.client_id) else {
            return Ok(Vec::new());
        };

        match query.branch {
            Branch::Control => Ok(Vec::new()),
            Branch::Linear => self.recommend_linear(&client_info, query),
            Branch::Ensemble => {
                self.ensemble
                    .recommend(&client_info, query.limit, &query.extra_data)
            }
        }
    }

    fn recommend_linear(
        &self,
        client_info: &ClientProfile,
        query: &RecommendationQuery,
    ) -> Result<Vec<AddonId>, ApiError> {
        let client_id = query.client_id.as_str();
        let Some(selected) = self
            .linear
            .ordered()
            .iter()
            .find(|r| r.can_recommend(client_info, &query.extra_data))
        else {
            info!(client_id, "No recommender can recommend addons");
            return Ok(Vec::new());
        };

        info!(client_id, recommender = selected.name(), "Recommender selected");
        let recommendations = selected.recommend(client_info, query.limit, &query.extra_data)?;
        if recommendations.is_empty() {
            info!(client_id, recommender = selected.name(), "No recommendations");
        } else {
            info!(
                client_id,
                recommended_addons = ?recommendations,
                "Recommendations served"
            );
        }
        Ok(recommendations)
    }

    /// The manager's own namespace, holding the published `recommender_map`
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Linear fallback order as built
    pub fn linear_order(&self) -> Vec<&str> {
        self.linear.ordered().iter().map(|r| r.name()).collect()
    }

    /// Any registered strategy, the ensemble included
    pub fn recommender(&self, name: &str) -> Option<&SharedRecommender> {
        self.recommender_map.get(name)
    }

    pub fn recommender_names(&self) -> Vec<String> {
        self.recommender_map.keys().cloned().collect()
    }
}
