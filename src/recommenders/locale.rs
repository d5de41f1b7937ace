//! Locale popularity strategy: top add-ons per locale from a remote model.
//!
//! The model is fetched once at construction to answer `can_recommend`, and
//! again on every `recommend` call. There is no cache and no lock, so
//! overlapping calls each pay the full fetch. A transport failure during
//! `recommend` is returned to the caller, not turned into an empty list.

use crate::context::{keys, Context};
use crate::error::ApiError;
use crate::models::{fetch_model, HttpJsonFetcher, LocaleModel, SharedJsonFetcher};
use crate::recommenders::Recommender;
use crate::types::{AddonId, ClientProfile, ExtraData};
use std::sync::Arc;
use tracing::warn;

pub struct LocaleRecommender {
    ctx: Context,
    model_url: Option<Arc<String>>,
    fetcher: SharedJsonFetcher,
    top_addons_per_locale: Option<LocaleModel>,
}

impl LocaleRecommender {
    pub const NAME: &'static str = "locale";

    pub fn new(ctx: &Context) -> Self {
        let ctx = ctx.child();
        let model_url = ctx.get::<String>(keys::LOCALE_MODEL_URL).ok();
        let fetcher = match ctx.get::<SharedJsonFetcher>(keys::JSON_FETCHER) {
            Ok(fetcher) => fetcher.as_ref().clone(),
            Err(_) => Arc::new(HttpJsonFetcher::new()) as SharedJsonFetcher,
        };

        let mut recommender = Self {
            ctx,
            model_url,
            fetcher,
            top_addons_per_locale: None,
        };
        recommender.top_addons_per_locale = match recommender.load_model() {
            Ok(model) => model,
            Err(e) => {
                warn!(error = %e, "Locale model unavailable, locale recommender disabled");
                None
            }
        };
        recommender
    }

    fn load_model(&self) -> Result<Option<LocaleModel>, ApiError> {
        match &self.model_url {
            Some(url) => fetch_model(self.fetcher.as_ref(), url).map(Some),
            None => Ok(None),
        }
    }
}

impl Recommender for LocaleRecommender {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn context(&self) -> Option<&Context> {
        Some(&self.ctx)
    }

    fn can_recommend(&self, profile: &ClientProfile, _extra_data: &ExtraData) -> bool {
        let (Some(model), Some(locale)) = (&self.top_addons_per_locale, &profile.locale) else {
            return false;
        };
        model.get(locale).is_some_and(|addons| !addons.is_empty())
    }

    fn recommend(
        &self,
        profile: &ClientProfile,
        limit: usize,
        _extra_data: &ExtraData,
    ) -> Result<Vec<AddonId>, ApiError> {
        let Some(locale) = &profile.locale else {
            return Ok(Vec::new());
        };
        let Some(mut model) = self.load_model()? else {
            return Ok(Vec::new());
        };

        let mut addons = model.remove(locale).unwrap_or_default();
        addons.truncate(limit);
        Ok(addons)
    }
}
