//! Collaborative strategy: item-to-item co-installation weights summed over
//! what the client already has.

use crate::context::{keys, Context};
use crate::error::ApiError;
use crate::models::CooccurrenceModel;
use crate::recommenders::{rank_scores, Recommender};
use crate::types::{AddonId, ClientProfile, ExtraData};
use std::collections::HashMap;
use std::sync::Arc;

pub struct CollaborativeRecommender {
    ctx: Context,
    model: Option<Arc<CooccurrenceModel>>,
}

impl CollaborativeRecommender {
    pub const NAME: &'static str = "collaborative";

    pub fn new(ctx: &Context) -> Self {
        let ctx = ctx.child();
        let model = ctx
            .get::<CooccurrenceModel>(keys::COLLABORATIVE_COOCCURRENCE)
            .ok();
        Self { ctx, model }
    }
}

impl Recommender for CollaborativeRecommender {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn context(&self) -> Option<&Context> {
        Some(&self.ctx)
    }

    fn can_recommend(&self, profile: &ClientProfile, _extra_data: &ExtraData) -> bool {
        match &self.model {
            Some(model) => profile
                .installed_addons
                .iter()
                .any(|addon| model.contains_key(addon)),
            None => false,
        }
    }

    fn recommend(
        &self,
        profile: &ClientProfile,
        limit: usize,
        _extra_data: &ExtraData,
    ) -> Result<Vec<AddonId>, ApiError> {
        let Some(model) = &self.model else {
            return Ok(Vec::new());
        };

        let mut scores: HashMap<AddonId, f64> = HashMap::new();
        for installed in &profile.installed_addons {
            let Some(neighbours) = model.get(installed) else {
                continue;
            };
            for (candidate, weight) in neighbours {
                if profile.has_installed(candidate) {
                    continue;
                }
                *scores.entry(candidate.clone()).or_insert(0.0) += weight;
            }
        }

        Ok(rank_scores(scores, limit))
    }
}
