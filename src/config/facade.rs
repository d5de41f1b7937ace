//! Config loading facade.

use super::merge::merge_policy;
use super::sources::{environment, global_file, workspace_file};
use super::TaarConfig;
use crate::error::ApiError;
use config::File;
use std::path::Path;
use tracing::debug;

/// Loads [`TaarConfig`] from layered sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Merge defaults, global file, workspace files and environment, in that order
    pub fn load(workspace_root: &Path) -> Result<TaarConfig, ApiError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = environment::add_to_builder(builder);

        let config: TaarConfig = builder.build()?.try_deserialize()?;
        debug!(workspace = %workspace_root.display(), "Configuration loaded");
        Ok(config)
    }

    /// Load a single file on top of the defaults
    pub fn load_from_file(path: &Path) -> Result<TaarConfig, ApiError> {
        if !path.exists() {
            return Err(ApiError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let config = merge_policy::builder_with_defaults()?
            .add_source(File::from(path.to_path_buf()))
            .build()?
            .try_deserialize()?;
        Ok(config)
    }
}
