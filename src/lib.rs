//! TAAR: Telemetry-Aware Add-on Recommender
//!
//! Picks, among several independently built recommendation strategies, the one
//! that answers a request for browser add-on suggestions, behind a single
//! validated query API.

pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod models;
pub mod profiles;
pub mod recommenders;
pub mod types;
pub mod validation;

pub use context::{default_context, Context};
pub use error::{ApiError, ContextError};
pub use recommenders::{Recommender, RecommendationManager};
pub use types::{AddonId, Branch, ClientProfile, ExtraData};
