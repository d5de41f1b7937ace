//! Integration tests for branch routing and the linear fallback chain

use super::test_utils::{branch, harness, linear_specs, StubSpec, KNOWN_CLIENT};
use taar::context::{keys, Context};
use taar::error::ApiError;
use taar::recommenders::{RecommendationManager, LINEAR_RECOMMENDER_ORDER};
use taar::types::ExtraData;

#[test]
fn test_construction_requires_factory_and_fetcher() {
    let empty = Context::new();
    assert!(matches!(
        RecommendationManager::new(&empty),
        Err(ApiError::MissingContextEntry(key)) if key == keys::RECOMMENDER_FACTORY
    ));

    let h = harness(linear_specs([false; 4]));
    let without_fetcher = Context::new();
    without_fetcher.set_value(
        keys::RECOMMENDER_FACTORY,
        h.ctx.get_value(keys::RECOMMENDER_FACTORY).unwrap(),
    );
    assert!(matches!(
        RecommendationManager::new(&without_fetcher),
        Err(ApiError::MissingContextEntry(key)) if key == keys::PROFILE_FETCHER
    ));
}

#[test]
fn test_construction_fails_on_unregistered_strategy() {
    let mut specs = linear_specs([false; 4]);
    specs.retain(|s| s.name != "similarity");
    let h = harness(specs);
    assert!(matches!(
        RecommendationManager::new(&h.ctx),
        Err(ApiError::UnknownRecommender(name)) if name == "similarity"
    ));
}

#[test]
fn test_registers_linear_order_and_ensemble() {
    let h = harness(linear_specs([false; 4]));
    let manager = RecommendationManager::new(&h.ctx).unwrap();
    assert_eq!(manager.linear_order(), LINEAR_RECOMMENDER_ORDER.to_vec());
    assert_eq!(
        manager.recommender_names(),
        vec!["collaborative", "ensemble", "legacy", "locale", "similarity"]
    );
    assert_eq!(manager.recommender("ensemble").unwrap().name(), "ensemble");
    assert!(manager.recommender("bogus").is_none());
    // The manager's own map must not leak into the caller's context
    assert!(!h.ctx.contains_key(keys::RECOMMENDER_MAP));
}

#[test]
fn test_control_branch_is_empty() {
    let h = harness(linear_specs([true; 4]));
    let manager = RecommendationManager::new(&h.ctx).unwrap();

    assert!(manager.recommend(KNOWN_CLIENT, 10, &branch("control")).unwrap().is_empty());
    assert!(manager.recommend(KNOWN_CLIENT, 10, &ExtraData::new()).unwrap().is_empty());
    assert!(h.log.lock().is_empty(), "control must not consult any strategy");
}

#[test]
fn test_unknown_client_is_empty_for_every_branch() {
    let h = harness(linear_specs([true; 4]));
    let manager = RecommendationManager::new(&h.ctx).unwrap();

    for name in ["control", "linear", "ensemble"] {
        assert!(manager.recommend("nobody", 10, &branch(name)).unwrap().is_empty());
    }
    assert!(h.log.lock().is_empty());
    assert_eq!(*h.fetcher.calls.lock(), 3);
}

#[test]
fn test_linear_selects_first_capable_strategy() {
    let h = harness(linear_specs([false, false, true, true]));
    let manager = RecommendationManager::new(&h.ctx).unwrap();

    let out = manager.recommend(KNOWN_CLIENT, 10, &branch("linear")).unwrap();
    assert_eq!(out, vec!["sim-1", "sim-2", "sim-3"]);
    assert_eq!(
        *h.log.lock(),
        vec![
            "legacy.can_recommend",
            "collaborative.can_recommend",
            "similarity.can_recommend",
            "similarity.recommend",
        ]
    );
}

#[test]
fn test_linear_respects_limit() {
    let h = harness(linear_specs([false, false, true, false]));
    let manager = RecommendationManager::new(&h.ctx).unwrap();
    let out = manager.recommend(KNOWN_CLIENT, 2, &branch("linear")).unwrap();
    assert_eq!(out, vec!["sim-1", "sim-2"]);
}

#[test]
fn test_linear_returns_empty_output_verbatim() {
    let mut specs = linear_specs([true, true, false, false]);
    specs[0] = StubSpec::new("legacy", true, &[]);
    let h = harness(specs);
    let manager = RecommendationManager::new(&h.ctx).unwrap();

    let out = manager.recommend(KNOWN_CLIENT, 10, &branch("linear")).unwrap();
    assert!(out.is_empty());
    assert_eq!(*h.log.lock(), vec!["legacy.can_recommend", "legacy.recommend"]);
}

#[test]
fn test_linear_none_capable() {
    let h = harness(linear_specs([false; 4]));
    let manager = RecommendationManager::new(&h.ctx).unwrap();
    assert!(manager.recommend(KNOWN_CLIENT, 10, &branch("linear")).unwrap().is_empty());
    assert_eq!(h.log.lock().len(), 4);
}

#[test]
fn test_linear_failure_propagates_without_fallback() {
    let mut specs = linear_specs([false, true, true, true]);
    specs[1] = StubSpec::failing("collaborative");
    let h = harness(specs);
    let manager = RecommendationManager::new(&h.ctx).unwrap();

    let result = manager.recommend(KNOWN_CLIENT, 10, &branch("linear"));
    assert!(matches!(result, Err(ApiError::ModelFetch(_))));
    assert!(!h.log.lock().iter().any(|c| c.starts_with("similarity")));
}

#[test]
fn test_ensemble_branch_delegates() {
    let h = harness(linear_specs([true, false, false, true]));
    let manager = RecommendationManager::new(&h.ctx).unwrap();

    let direct = manager
        .recommender("ensemble")
        .unwrap()
        .recommend(&taar::ClientProfile::new(KNOWN_CLIENT), 3, &branch("ensemble"))
        .unwrap();
    let routed = manager.recommend(KNOWN_CLIENT, 3, &branch("ensemble")).unwrap();
    assert_eq!(routed, direct);
    // legacy-1 = 3, legacy-2 = 2, locale-1 = 3; ties by id
    assert_eq!(routed, vec!["legacy-1", "locale-1", "legacy-2"]);
}

#[test]
fn test_recommend_with_keyword_args() {
    let h = harness(linear_specs([true, false, false, false]));
    let manager = RecommendationManager::new(&h.ctx).unwrap();

    let keyword = serde_json::json!({
        "limit": 1,
        "extra_data": {"branch": "linear"}
    });
    let serde_json::Value::Object(keyword) = keyword else {
        unreachable!()
    };
    let out = manager
        .recommend_with_args(vec![KNOWN_CLIENT.into()], keyword)
        .unwrap();
    assert_eq!(out, vec!["legacy-1"]);
}
