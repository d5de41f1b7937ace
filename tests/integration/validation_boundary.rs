//! Integration tests for the fail-closed request boundary

use super::test_utils::{branch, harness, linear_specs, KNOWN_CLIENT};
use serde_json::{json, Map};
use taar::recommenders::RecommendationManager;
use taar::types::ExtraData;

#[test]
fn test_negative_limit_skips_profile_fetch() {
    let h = harness(linear_specs([true; 4]));
    let manager = RecommendationManager::new(&h.ctx).unwrap();

    let out = manager.recommend(KNOWN_CLIENT, -1, &branch("linear")).unwrap();
    assert!(out.is_empty());
    let out = manager.recommend(KNOWN_CLIENT, 0, &branch("linear")).unwrap();
    assert!(out.is_empty());
    assert_eq!(*h.fetcher.calls.lock(), 0);
    assert!(h.log.lock().is_empty());
}

#[test]
fn test_bogus_branch_skips_profile_fetch() {
    let h = harness(linear_specs([true; 4]));
    let manager = RecommendationManager::new(&h.ctx).unwrap();

    assert!(manager.recommend(KNOWN_CLIENT, 10, &branch("bogus")).unwrap().is_empty());
    let mut numeric = ExtraData::new();
    numeric.insert("branch".to_string(), json!(7));
    assert!(manager.recommend(KNOWN_CLIENT, 10, &numeric).unwrap().is_empty());
    assert_eq!(*h.fetcher.calls.lock(), 0);
}

#[test]
fn test_empty_client_id_rejected() {
    let h = harness(linear_specs([true; 4]));
    let manager = RecommendationManager::new(&h.ctx).unwrap();
    assert!(manager.recommend("", 10, &branch("linear")).unwrap().is_empty());
    assert_eq!(*h.fetcher.calls.lock(), 0);
}

#[test]
fn test_loosely_typed_arguments_rejected() {
    let h = harness(linear_specs([true; 4]));
    let manager = RecommendationManager::new(&h.ctx).unwrap();

    let cases = vec![
        (vec![json!(12345), json!(10)], Map::new()),
        (vec![json!(KNOWN_CLIENT), json!("10")], Map::new()),
        (vec![json!(KNOWN_CLIENT), json!(10), json!("linear")], Map::new()),
        (vec![json!(KNOWN_CLIENT)], Map::new()),
        (
            vec![json!(KNOWN_CLIENT), json!(10)],
            json!({"unexpected": true}).as_object().cloned().unwrap(),
        ),
    ];
    for (positional, keyword) in cases {
        assert!(manager.recommend_with_args(positional, keyword).unwrap().is_empty());
    }
    assert_eq!(*h.fetcher.calls.lock(), 0);
}

#[test]
fn test_valid_request_runs_unchanged() {
    let h = harness(linear_specs([true, false, false, false]));
    let manager = RecommendationManager::new(&h.ctx).unwrap();
    let out = manager.recommend(KNOWN_CLIENT, 10, &branch("linear")).unwrap();
    assert_eq!(out, vec!["legacy-1", "legacy-2"]);
    assert_eq!(*h.fetcher.calls.lock(), 1);
}
