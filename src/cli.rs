//! CLI: clap definitions and command execution.

use crate::config::{ConfigLoader, TaarConfig};
use crate::context::{default_context, keys, Context};
use crate::error::ApiError;
use crate::recommenders::{EnsembleRecommender, RecommendationManager, RecommenderFactory};
use crate::types::{Branch, ExtraData, BRANCH_KEY};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

/// TAAR CLI - add-on recommendation strategy selection
#[derive(Parser)]
#[command(name = "taar")]
#[command(about = "Select and run add-on recommendation strategies")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory (config/ is read from here)
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Recommend add-ons for a client
    Recommend {
        /// Client identifier
        #[arg(long)]
        client_id: String,
        /// Maximum number of add-ons
        #[arg(long, default_value = "10", allow_hyphen_values = true)]
        limit: i64,
        /// Routing branch (control, linear, ensemble)
        #[arg(long)]
        branch: Option<String>,
        /// Extra request data as a JSON object
        #[arg(long)]
        extra: Option<String>,
    },
    /// List registered strategies
    Strategies,
}

/// Resolved configuration plus the root context built from it
pub struct RunContext {
    ctx: Context,
}

impl RunContext {
    pub fn new(workspace: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = load_config(&workspace, config_path.as_deref())?;
        config.validate().map_err(|issues| {
            let msgs: Vec<String> = issues.iter().map(|i| i.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                msgs.join("\n")
            ))
        })?;
        let ctx = default_context(&config)?;
        Ok(Self { ctx })
    }

    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Recommend {
                client_id,
                limit,
                branch,
                extra,
            } => {
                let mut extra_data = match extra {
                    Some(raw) => parse_extra(raw)?,
                    None => ExtraData::new(),
                };
                if let Some(branch) = branch {
                    extra_data.insert(BRANCH_KEY.to_string(), branch.clone().into());
                }
                let manager = RecommendationManager::new(&self.ctx)?;
                let addons = manager.recommend(client_id, *limit, &extra_data)?;
                info!(client_id = %client_id, count = addons.len(), "Recommend command finished");
                Ok(serde_json::to_string_pretty(&addons)?)
            }
            Commands::Strategies => {
                let factory = self.ctx.get::<RecommenderFactory>(keys::RECOMMENDER_FACTORY)?;
                let mut names = factory.get_names();
                names.push(EnsembleRecommender::NAME.to_string());
                let branches: Vec<&str> = Branch::ALL.iter().map(|b| b.as_str()).collect();
                Ok(format!(
                    "strategies: {}\nbranches: {}",
                    names.join(", "),
                    branches.join(", ")
                ))
            }
        }
    }
}

fn load_config(
    workspace: &std::path::Path,
    config_path: Option<&std::path::Path>,
) -> Result<TaarConfig, ApiError> {
    match config_path {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(workspace),
    }
}

fn parse_extra(raw: &str) -> Result<ExtraData, ApiError> {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Object(map)) => Ok(map),
        Ok(_) => Err(ApiError::ConfigError("--extra must be a JSON object".to_string())),
        Err(e) => Err(ApiError::ConfigError(format!("Invalid --extra JSON: {}", e))),
    }
}

/// Build logging configuration from CLI args and the config file.
/// Precedence: CLI flags override config file override defaults.
pub fn build_logging_config(cli: &Cli) -> crate::logging::LoggingConfig {
    let mut config = load_config(&cli.workspace, cli.config.as_deref())
        .map(|c| c.logging)
        .unwrap_or_default();
    if cli.verbose {
        config.level = "debug".to_string();
    }
    if let Some(level) = &cli.log_level {
        config.level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        config.format = format.clone();
    }
    config
}
