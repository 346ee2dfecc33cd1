//! Behavior configuration loader.

use std::path::Path;

use anyhow::Context;
use robot_core::BehaviorConfig;

use crate::loaders::{LoadResult, read_file};

const BUNDLED: &str = include_str!("../../data/behavior.toml");

/// Loader for behavior configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate config data from a TOML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the TOML file containing BehaviorConfig
    pub fn load(path: &Path) -> LoadResult<BehaviorConfig> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Parse and validate config data from TOML text.
    pub fn parse(content: &str) -> LoadResult<BehaviorConfig> {
        let config: BehaviorConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        config.validate()?;

        Ok(config)
    }

    /// The tuning bundled with this crate.
    pub fn bundled() -> LoadResult<BehaviorConfig> {
        Self::parse(BUNDLED).context("Invalid bundled behavior.toml")
    }
}
