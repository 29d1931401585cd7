//! Movement tuning loader.

use std::path::Path;

use nav_core::MovementConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for movement tuning from TOML files.
///
/// Keys left out of the file keep their [`MovementConfig::default`] values.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load movement tuning from a TOML file.
    pub fn load(path: &Path) -> LoadResult<MovementConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<MovementConfig> {
        let config: MovementConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse movement config TOML: {}", e))?;

        if config.reverse_delay_max < config.reverse_delay_min {
            anyhow::bail!(
                "reverse delay range is inverted: [{}, {})",
                config.reverse_delay_min,
                config.reverse_delay_max
            );
        }
        Ok(config)
    }
}
