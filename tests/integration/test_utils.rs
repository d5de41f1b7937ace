//! Shared test utilities for integration tests
//!
//! Stub strategies and a counting profile fetcher, wired into a context the
//! same way the default bootstrap does it.

use parking_lot::Mutex;
use std::sync::Arc;
use taar::context::{keys, Context};
use taar::error::ApiError;
use taar::profiles::{InMemoryProfileFetcher, ProfileFetcher, SharedProfileFetcher};
use taar::recommenders::{
    Recommender, RecommenderFactory, RecommenderFactoryMap, SharedRecommender,
};
use taar::types::{AddonId, ClientProfile, ExtraData};

/// Ordered log of strategy calls, e.g. "legacy.can_recommend"
pub type CallLog = Arc<Mutex<Vec<String>>>;

pub struct StubRecommender {
    pub name: String,
    pub capable: bool,
    pub items: Vec<AddonId>,
    pub fail: bool,
    pub log: CallLog,
}

impl Recommender for StubRecommender {
    fn name(&self) -> &str {
        &self.name
    }

    fn can_recommend(&self, _profile: &ClientProfile, _extra_data: &ExtraData) -> bool {
        self.log.lock().push(format!("{}.can_recommend", self.name));
        self.capable
    }

    fn recommend(
        &self,
        _profile: &ClientProfile,
        limit: usize,
        _extra_data: &ExtraData,
    ) -> Result<Vec<AddonId>, ApiError> {
        self.log.lock().push(format!("{}.recommend", self.name));
        if self.fail {
            return Err(ApiError::ModelFetch("HTTP 503 Service Unavailable".to_string()));
        }
        Ok(self.items.iter().take(limit).cloned().collect())
    }
}

/// Stub behaviour for one strategy name
#[derive(Clone)]
pub struct StubSpec {
    pub name: &'static str,
    pub capable: bool,
    pub items: Vec<&'static str>,
    pub fail: bool,
}

impl StubSpec {
    pub fn new(name: &'static str, capable: bool, items: &[&'static str]) -> Self {
        Self {
            name,
            capable,
            items: items.to_vec(),
            fail: false,
        }
    }

    pub fn failing(name: &'static str) -> Self {
        Self {
            name,
            capable: true,
            items: vec![],
            fail: true,
        }
    }
}

/// Profile fetcher that counts lookups
pub struct CountingFetcher {
    inner: InMemoryProfileFetcher,
    pub calls: Mutex<usize>,
}

impl ProfileFetcher for CountingFetcher {
    fn get(&self, client_id: &str) -> Option<ClientProfile> {
        *self.calls.lock() += 1;
        self.inner.get(client_id)
    }
}

pub struct Harness {
    pub ctx: Context,
    pub log: CallLog,
    pub fetcher: Arc<CountingFetcher>,
}

pub const KNOWN_CLIENT: &str = "test-client";

/// Context with stub strategies for the four linear names and one known client
pub fn harness(specs: Vec<StubSpec>) -> Harness {
    let ctx = Context::new();
    let log: CallLog = Arc::new(Mutex::new(Vec::new()));

    let mut factory_map = RecommenderFactoryMap::new();
    for spec in specs {
        let log = Arc::clone(&log);
        factory_map.insert(
            spec.name.to_string(),
            Arc::new(move || {
                Ok::<_, ApiError>(Arc::new(StubRecommender {
                    name: spec.name.to_string(),
                    capable: spec.capable,
                    items: spec.items.iter().map(|s| s.to_string()).collect(),
                    fail: spec.fail,
                    log: Arc::clone(&log),
                }) as SharedRecommender)
            }),
        );
    }
    ctx.set(keys::RECOMMENDER_FACTORY_MAP, factory_map);
    ctx.set(
        keys::RECOMMENDER_FACTORY,
        RecommenderFactory::new(&ctx).expect("factory map installed"),
    );

    let mut profile = ClientProfile::new(KNOWN_CLIENT);
    profile.locale = Some("en-US".to_string());
    let fetcher = Arc::new(CountingFetcher {
        inner: InMemoryProfileFetcher::from_profiles([profile]),
        calls: Mutex::new(0),
    });
    ctx.set(
        keys::PROFILE_FETCHER,
        Arc::clone(&fetcher) as SharedProfileFetcher,
    );

    Harness { ctx, log, fetcher }
}

/// All four linear stubs, each capable or not
pub fn linear_specs(capable: [bool; 4]) -> Vec<StubSpec> {
    vec![
        StubSpec::new("legacy", capable[0], &["legacy-1", "legacy-2"]),
        StubSpec::new("collaborative", capable[1], &["collab-1", "collab-2"]),
        StubSpec::new("similarity", capable[2], &["sim-1", "sim-2", "sim-3"]),
        StubSpec::new("locale", capable[3], &["locale-1"]),
    ]
}

pub fn branch(name: &str) -> ExtraData {
    let mut extra = ExtraData::new();
    extra.insert("branch".to_string(), name.into());
    extra
}
