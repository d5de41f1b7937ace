//! Ensemble strategy: weighted rank fusion over the linear strategies.
//!
//! Each capable member contributes `weight * (limit - rank)` to every add-on
//! it returns; the summed scores are ranked like any other strategy output.

use crate::context::{keys, Context};
use crate::error::ApiError;
use crate::recommenders::{rank_scores, Recommender, RecommenderMap};
use crate::types::{AddonId, ClientProfile, ExtraData};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Strategy name → weight. Missing names weigh 1.0.
pub type EnsembleWeights = HashMap<String, f64>;

pub struct EnsembleRecommender {
    ctx: Context,
    members: Arc<RecommenderMap>,
    weights: Arc<EnsembleWeights>,
}

impl EnsembleRecommender {
    pub const NAME: &'static str = "ensemble";

    /// Requires a completed `recommender_map` in the context.
    pub fn new(ctx: &Context) -> Result<Self, ApiError> {
        let ctx = ctx.child();
        let members = ctx
            .get::<RecommenderMap>(keys::RECOMMENDER_MAP)
            .map_err(|_| ApiError::MissingContextEntry(keys::RECOMMENDER_MAP.to_string()))?;
        let weights = ctx.get_or(keys::ENSEMBLE_WEIGHTS, EnsembleWeights::new());
        Ok(Self {
            ctx,
            members,
            weights,
        })
    }

    fn weight(&self, name: &str) -> f64 {
        self.weights.get(name).copied().unwrap_or(1.0)
    }
}

impl Recommender for EnsembleRecommender {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn context(&self) -> Option<&Context> {
        Some(&self.ctx)
    }

    fn can_recommend(&self, profile: &ClientProfile, extra_data: &ExtraData) -> bool {
        self.members
            .values()
            .any(|member| member.can_recommend(profile, extra_data))
    }

    fn recommend(
        &self,
        profile: &ClientProfile,
        limit: usize,
        extra_data: &ExtraData,
    ) -> Result<Vec<AddonId>, ApiError> {
        let mut scores: HashMap<AddonId, f64> = HashMap::new();

        for (name, member) in self.members.iter() {
            let weight = self.weight(name);
            if weight <= 0.0 || !member.can_recommend(profile, extra_data) {
                continue;
            }
            let items = member.recommend(profile, limit, extra_data)?;
            debug!(recommender = %name, count = items.len(), "Ensemble member answered");
            for (rank, addon) in items.into_iter().enumerate() {
                let points = limit.saturating_sub(rank) as f64;
                *scores.entry(addon).or_insert(0.0) += weight * points;
            }
        }

        Ok(rank_scores(scores, limit))
    }
}
