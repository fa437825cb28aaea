//! Simulation configuration loader.

use std::path::Path;

use crate::config::SimConfig;
use crate::loaders::{LoadResult, read_file};

/// Loader for simulation configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing keys fall back to [`SimConfig::default`].
    pub fn load(path: &Path) -> LoadResult<SimConfig> {
        let content = read_file(path)?;
        let config: SimConfig = toml::from_str(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse config TOML at {}: {}", path.display(), e)
        })?;

        if !(config.tick_hz.is_finite() && config.tick_hz > 0.0) {
            anyhow::bail!("tick_hz must be positive, got {}", config.tick_hz);
        }
        if !(config.rediffusion_interval_secs.is_finite() && config.rediffusion_interval_secs > 0.0)
        {
            anyhow::bail!(
                "rediffusion_interval_secs must be positive, got {}",
                config.rediffusion_interval_secs
            );
        }

        Ok(config)
    }
}
