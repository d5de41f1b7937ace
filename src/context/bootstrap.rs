//! Default context: configuration, model data and strategy constructors.

use super::{keys, Context};
use crate::config::TaarConfig;
use crate::error::ApiError;
use crate::models::{
    load_model_file, CooccurrenceModel, Donor, HttpJsonFetcher, LegacyReplacements,
    SharedJsonFetcher,
};
use crate::profiles::{InMemoryProfileFetcher, SharedProfileFetcher};
use crate::recommenders::{
    CollaborativeRecommender, LegacyRecommender, LocaleRecommender, RecommenderConstructor,
    RecommenderFactory, RecommenderFactoryMap, SharedRecommender, SimilarityRecommender,
};
use serde::de::DeserializeOwned;
use std::any::Any;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

fn constructor<R, F>(shared: &Context, build: F) -> RecommenderConstructor
where
    R: crate::recommenders::Recommender + 'static,
    F: Fn(&Context) -> R + Send + Sync + 'static,
{
    let shared = shared.clone();
    Arc::new(move || Ok::<_, ApiError>(Arc::new(build(&shared)) as SharedRecommender))
}

fn load_into<T>(ctx: &Context, key: &str, path: Option<&Path>) -> Result<(), ApiError>
where
    T: DeserializeOwned + Any + Send + Sync,
{
    if let Some(path) = path {
        let model: T = load_model_file(path)?;
        info!(key, path = %path.display(), "Loaded model data");
        ctx.set(key, model);
    }
    Ok(())
}

/// Build the root context for a configuration.
///
/// The ensemble is deliberately absent from `recommender_factory_map`: it can
/// only be built once the linear strategies exist, which is the manager's job.
pub fn default_context(config: &TaarConfig) -> Result<Context, ApiError> {
    let ctx = Context::new();

    load_into::<LegacyReplacements>(
        &ctx,
        keys::LEGACY_REPLACEMENTS,
        config.models.legacy_path.as_deref(),
    )?;
    load_into::<CooccurrenceModel>(
        &ctx,
        keys::COLLABORATIVE_COOCCURRENCE,
        config.models.collaborative_path.as_deref(),
    )?;
    load_into::<Vec<Donor>>(
        &ctx,
        keys::SIMILARITY_DONORS,
        config.models.similarity_path.as_deref(),
    )?;

    if let Some(url) = &config.models.locale_url {
        ctx.set(keys::LOCALE_MODEL_URL, url.clone());
    }
    ctx.set(
        keys::JSON_FETCHER,
        Arc::new(HttpJsonFetcher::new()) as SharedJsonFetcher,
    );
    ctx.set(keys::ENSEMBLE_WEIGHTS, config.ensemble.weights.clone());

    let profile_fetcher = match &config.profiles.path {
        Some(path) => InMemoryProfileFetcher::load_from_file(path)?,
        None => InMemoryProfileFetcher::new(),
    };
    ctx.set(
        keys::PROFILE_FETCHER,
        Arc::new(profile_fetcher) as SharedProfileFetcher,
    );

    let shared = ctx.child();
    let mut factory_map = RecommenderFactoryMap::new();
    factory_map.insert(
        LegacyRecommender::NAME.to_string(),
        constructor(&shared, LegacyRecommender::new),
    );
    factory_map.insert(
        CollaborativeRecommender::NAME.to_string(),
        constructor(&shared, CollaborativeRecommender::new),
    );
    factory_map.insert(
        SimilarityRecommender::NAME.to_string(),
        constructor(&shared, SimilarityRecommender::new),
    );
    factory_map.insert(
        LocaleRecommender::NAME.to_string(),
        constructor(&shared, LocaleRecommender::new),
    );
    ctx.set(keys::RECOMMENDER_FACTORY_MAP, factory_map);

    let factory = RecommenderFactory::new(&ctx)?;
    ctx.set(keys::RECOMMENDER_FACTORY, factory);

    Ok(ctx)
}
