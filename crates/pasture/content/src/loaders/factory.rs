//! Content factory for loading a whole data directory.

use std::path::{Path, PathBuf};

use pasture_core::SpeciesConfig;

use crate::config::SimConfig;
use crate::loaders::{ConfigLoader, LoadResult, SpeciesLoader};
use crate::presets;

/// Content factory that loads all simulation content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// └── species.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Directory shipped with this crate.
    pub fn bundled() -> Self {
        Self::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("data"))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load simulation configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<SimConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Load species from `species.ron`, or the built-in presets when the file
    /// does not exist.
    pub fn load_species(&self) -> LoadResult<Vec<SpeciesConfig>> {
        let path = self.data_dir.join("species.ron");
        if !path.exists() {
            tracing::info!(path = %path.display(), "no species file; using built-in presets");
            return Ok(presets::all());
        }
        SpeciesLoader::load(&path)
    }
}
