//! Shared domain types: client profiles, query extras and branches.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Add-on identifier as it appears in telemetry and model data
pub type AddonId = String;

/// Free-form per-request data. The only key read by the manager is `branch`.
pub type ExtraData = serde_json::Map<String, serde_json::Value>;

/// Key in [`ExtraData`] that selects the routing branch
pub const BRANCH_KEY: &str = "branch";

/// Telemetry attributes resolved for a client id.
///
/// Every field except `client_id` defaults, so a fetcher can hand back an
/// empty-but-present profile which is distinct from "no profile".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientProfile {
    pub client_id: String,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub geo_city: Option<String>,
    #[serde(default)]
    pub os: Option<String>,
    #[serde(default)]
    pub installed_addons: Vec<AddonId>,
    #[serde(default)]
    pub disabled_addons_ids: Vec<AddonId>,
    #[serde(default)]
    pub bookmark_count: u64,
    #[serde(default)]
    pub tab_open_count: u64,
    #[serde(default)]
    pub subsession_length: u64,
    #[serde(default)]
    pub total_uri: u64,
    #[serde(default)]
    pub unique_tlds: u64,
}

impl ClientProfile {
    /// Create an otherwise empty profile for a client
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            ..Default::default()
        }
    }

    /// Whether the client already has this add-on installed
    pub fn has_installed(&self, addon: &str) -> bool {
        self.installed_addons.iter().any(|a| a == addon)
    }
}

/// Caller-selected routing mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Branch {
    /// Holdout group: never recommends anything
    #[default]
    Control,
    /// First capable strategy in the fixed chain
    Linear,
    /// Delegate to the ensemble strategy
    Ensemble,
}

impl Branch {
    pub const ALL: [Branch; 3] = [Branch::Control, Branch::Linear, Branch::Ensemble];

    pub fn as_str(&self) -> &'static str {
        match self {
            Branch::Control => "control",
            Branch::Linear => "linear",
            Branch::Ensemble => "ensemble",
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a branch name is outside the closed set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownBranch(pub String);

impl fmt::Display for UnknownBranch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown branch '{}' (must be 'control', 'linear' or 'ensemble')",
            self.0
        )
    }
}

impl std::error::Error for UnknownBranch {}

impl FromStr for Branch {
    type Err = UnknownBranch;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Branch::ALL
            .into_iter()
            .find(|b| b.as_str() == s)
            .ok_or_else(|| UnknownBranch(s.to_string()))
    }
}
