//! Scoped Context
//!
//! A chained key/value namespace used to wire strategies together. Lookups
//! check the local layer first and then the delegate; writes and deletes only
//! ever touch the local layer, so a child can shadow an ancestor's value but
//! never change or remove it.
//!
//! Any constructor that receives a [`Context`] should call [`Context::child`]
//! before storing or mutating it, so its overrides stay invisible to siblings
//! and ancestors.

use crate::error::ContextError;
use parking_lot::RwLock;
use std::any::{type_name, Any};
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use tracing::warn;

mod bootstrap;

pub use bootstrap::default_context;

/// Well-known context keys
pub mod keys {
    pub const RECOMMENDER_FACTORY_MAP: &str = "recommender_factory_map";
    pub const RECOMMENDER_FACTORY: &str = "recommender_factory";
    pub const RECOMMENDER_MAP: &str = "recommender_map";
    pub const PROFILE_FETCHER: &str = "profile_fetcher";
    pub const JSON_FETCHER: &str = "json_fetcher";

    pub const LEGACY_REPLACEMENTS: &str = "legacy.replacements";
    pub const COLLABORATIVE_COOCCURRENCE: &str = "collaborative.cooccurrence";
    pub const SIMILARITY_DONORS: &str = "similarity.donors";
    pub const LOCALE_MODEL_URL: &str = "locale.model_url";
    pub const ENSEMBLE_WEIGHTS: &str = "ensemble.weights";
}

/// Value stored in a context layer
pub type ContextValue = Arc<dyn Any + Send + Sync>;

/// Plain mapping usable as the root delegate of a context
pub type ContextMap = HashMap<String, ContextValue>;

enum Delegate {
    None,
    /// Held weakly: a child never keeps its parent alive.
    Context(Weak<Node>),
    Map(Arc<ContextMap>),
}

struct Node {
    local: RwLock<ContextMap>,
    delegate: Delegate,
}

impl Node {
    fn lookup(&self, key: &str) -> Option<ContextValue> {
        if let Some(value) = self.local.read().get(key) {
            return Some(Arc::clone(value));
        }
        match &self.delegate {
            Delegate::None => None,
            Delegate::Context(parent) => parent.upgrade().and_then(|p| p.lookup(key)),
            Delegate::Map(map) => map.get(key).cloned(),
        }
    }
}

/// Handle to a context node. Cloning the handle shares the node.
#[derive(Clone)]
pub struct Context {
    node: Arc<Node>,
}

impl Context {
    /// Create an empty root context
    pub fn new() -> Self {
        Self::with_delegate(Delegate::None)
    }

    /// Create a root context that falls back to a read-only mapping
    pub fn with_delegate_map(map: ContextMap) -> Self {
        Self::with_delegate(Delegate::Map(Arc::new(map)))
    }

    fn with_delegate(delegate: Delegate) -> Self {
        Self {
            node: Arc::new(Node {
                local: RwLock::new(HashMap::new()),
                delegate,
            }),
        }
    }

    /// New context whose delegate is this one
    pub fn child(&self) -> Context {
        Self::with_delegate(Delegate::Context(Arc::downgrade(&self.node)))
    }

    /// Untyped lookup, local layer first
    pub fn get_value(&self, key: &str) -> Result<ContextValue, ContextError> {
        self.node
            .lookup(key)
            .ok_or_else(|| ContextError::NotFound(key.to_string()))
    }

    /// Typed lookup through the delegate chain
    pub fn get<T: Any + Send + Sync>(&self, key: &str) -> Result<Arc<T>, ContextError> {
        self.get_value(key)?
            .downcast::<T>()
            .map_err(|_| ContextError::TypeMismatch {
                key: key.to_string(),
                expected: type_name::<T>(),
            })
    }

    /// Typed lookup returning `default` when the key is absent from the whole chain
    pub fn get_or<T: Any + Send + Sync>(&self, key: &str, default: T) -> Arc<T> {
        match self.get::<T>(key) {
            Ok(value) => value,
            Err(ContextError::NotFound(_)) => Arc::new(default),
            Err(e) => {
                warn!(key, error = %e, "Context value has unexpected type, using default");
                Arc::new(default)
            }
        }
    }

    /// Whether the key resolves anywhere in the chain
    pub fn contains_key(&self, key: &str) -> bool {
        self.node.lookup(key).is_some()
    }

    /// Whether the key is set on this node's own layer
    pub fn contains_local(&self, key: &str) -> bool {
        self.node.local.read().contains_key(key)
    }

    /// Write to the local layer. Shadows, never overwrites, a delegate's value.
    pub fn set<T: Any + Send + Sync>(&self, key: impl Into<String>, value: T) {
        self.set_value(key, Arc::new(value));
    }

    /// Write an already shared value to the local layer
    pub fn set_value(&self, key: impl Into<String>, value: ContextValue) {
        self.node.local.write().insert(key.into(), value);
    }

    /// Remove from the local layer only.
    ///
    /// Fails with [`ContextError::NotFound`] when the key is not local, even if
    /// an ancestor holds it.
    pub fn delete(&self, key: &str) -> Result<ContextValue, ContextError> {
        self.node
            .local
            .write()
            .remove(key)
            .ok_or_else(|| ContextError::NotFound(key.to_string()))
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<String> = self.node.local.read().keys().cloned().collect();
        keys.sort();
        f.debug_struct("Context").field("local_keys", &keys).finish()
    }
}
