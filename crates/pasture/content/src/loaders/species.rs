//! Species catalog loader.

use std::collections::HashSet;
use std::path::Path;

use pasture_core::SpeciesConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for species definitions from RON files.
///
/// File format: a list of `SpeciesConfig` records.
///
/// ```ron
/// [
///     (
///         name: "sheep",
///         tag: Sheep,
///         limits: (max_speed: 2.0, max_accel: 10.0, max_rotation: 179.0, max_angular_accel: 30.0),
///         // ...
///     ),
/// ]
/// ```
pub struct SpeciesLoader;

impl SpeciesLoader {
    /// Load and validate every species in the file.
    ///
    /// Fails on the first invalid species or on duplicate names.
    pub fn load(path: &Path) -> LoadResult<Vec<SpeciesConfig>> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to load species from {}: {}", path.display(), e))
    }

    /// Parse species from RON text.
    pub fn parse(content: &str) -> LoadResult<Vec<SpeciesConfig>> {
        let species: Vec<SpeciesConfig> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse species RON: {}", e))?;

        let mut seen = HashSet::new();
        for config in &species {
            config.validate()?;
            if !seen.insert(config.name.as_str()) {
                anyhow::bail!("duplicate species name {:?}", config.name);
            }
        }

        Ok(species)
    }
}
