//! Legacy replacement strategy: offers successors for add-ons the client had
//! to disable.

use crate::context::{keys, Context};
use crate::error::ApiError;
use crate::models::LegacyReplacements;
use crate::recommenders::Recommender;
use crate::types::{AddonId, ClientProfile, ExtraData};
use std::collections::HashSet;
use std::sync::Arc;

pub struct LegacyRecommender {
    ctx: Context,
    replacements: Option<Arc<LegacyReplacements>>,
}

impl LegacyRecommender {
    pub const NAME: &'static str = "legacy";

    pub fn new(ctx: &Context) -> Self {
        let ctx = ctx.child();
        let replacements = ctx.get::<LegacyReplacements>(keys::LEGACY_REPLACEMENTS).ok();
        Self { ctx, replacements }
    }
}

impl Recommender for LegacyRecommender {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn context(&self) -> Option<&Context> {
        Some(&self.ctx)
    }

    fn can_recommend(&self, profile: &ClientProfile, _extra_data: &ExtraData) -> bool {
        let Some(replacements) = &self.replacements else {
            return false;
        };
        profile
            .disabled_addons_ids
            .iter()
            .any(|id| replacements.get(id).is_some_and(|r| !r.is_empty()))
    }

    fn recommend(
        &self,
        profile: &ClientProfile,
        limit: usize,
        _extra_data: &ExtraData,
    ) -> Result<Vec<AddonId>, ApiError> {
        let Some(replacements) = &self.replacements else {
            return Ok(Vec::new());
        };

        let mut seen = HashSet::new();
        let result = profile
            .disabled_addons_ids
            .iter()
            .filter_map(|id| replacements.get(id))
            .flatten()
            .filter(|candidate| !profile.has_installed(candidate))
            .filter(|candidate| seen.insert(candidate.as_str()))
            .take(limit)
            .cloned()
            .collect();
        Ok(result)
    }
}
