//! Recommendation strategies
//!
//! Every strategy, the ensemble included, implements [`Recommender`]. The
//! manager only ever talks to strategies through this trait: `can_recommend`
//! decides fallback, `recommend` produces the answer.

use crate::context::Context;
use crate::error::ApiError;
use crate::types::{AddonId, ClientProfile, ExtraData};
use std::collections::BTreeMap;
use std::sync::Arc;

pub mod collaborative;
pub mod ensemble;
pub mod factory;
pub mod legacy;
pub mod locale;
pub mod manager;
pub mod similarity;

pub use collaborative::CollaborativeRecommender;
pub use ensemble::EnsembleRecommender;
pub use factory::{RecommenderConstructor, RecommenderFactory, RecommenderFactoryMap};
pub use legacy::LegacyRecommender;
pub use locale::LocaleRecommender;
pub use manager::{LinearChain, RecommendationManager, LINEAR_RECOMMENDER_ORDER};
pub use similarity::SimilarityRecommender;

/// Strategy capability contract
pub trait Recommender: Send + Sync {
    /// Registered strategy name
    fn name(&self) -> &str;

    /// Whether this strategy is able to answer for the client
    fn can_recommend(&self, profile: &ClientProfile, extra_data: &ExtraData) -> bool;

    /// Ordered add-on ids, at most `limit` long
    fn recommend(
        &self,
        profile: &ClientProfile,
        limit: usize,
        extra_data: &ExtraData,
    ) -> Result<Vec<AddonId>, ApiError>;

    /// Private namespace, for strategies that keep one
    fn context(&self) -> Option<&Context> {
        None
    }
}

/// Shared strategy instance
pub type SharedRecommender = Arc<dyn Recommender>;

/// Name-keyed strategy instances
pub type RecommenderMap = BTreeMap<String, SharedRecommender>;

/// Sort scored add-ons by descending score, ties broken by id, and keep `limit`
pub(crate) fn rank_scores(
    scores: impl IntoIterator<Item = (AddonId, f64)>,
    limit: usize,
) -> Vec<AddonId> {
    let mut ranked: Vec<(AddonId, f64)> = scores.into_iter().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.into_iter().take(limit).map(|(id, _)| id).collect()
}
