//! Simulation setup read from `config.toml`.

use crate::presets;
use crate::world::GeneratorParams;

/// One line of the initial population.
///
/// With `members` set, `count` packs are spawned: each is an anchor of
/// `species` followed by one `members` agent per formation slot.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PopulationEntry {
    pub species: String,
    pub count: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub members: Option<String>,
}

impl PopulationEntry {
    pub fn solo(species: impl Into<String>, count: u32) -> Self {
        Self {
            species: species.into(),
            count,
            members: None,
        }
    }

    pub fn packs(anchor: impl Into<String>, members: impl Into<String>, count: u32) -> Self {
        Self {
            species: anchor.into(),
            count,
            members: Some(members.into()),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    pub seed: u64,
    /// Simulation steps per second of simulated time.
    pub tick_hz: f32,
    /// Seconds between re-diffusion passes of the meat scent.
    pub rediffusion_interval_secs: f32,
    pub generator: GeneratorParams,
    pub population: Vec<PopulationEntry>,
}

impl SimConfig {
    pub const DEFAULT_TICK_HZ: f32 = 20.0;
    pub const DEFAULT_REDIFFUSION_INTERVAL_SECS: f32 = 3.0;

    /// Length of one tick in seconds.
    pub fn dt(&self) -> f32 {
        1.0 / self.tick_hz
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            tick_hz: Self::DEFAULT_TICK_HZ,
            rediffusion_interval_secs: Self::DEFAULT_REDIFFUSION_INTERVAL_SECS,
            generator: GeneratorParams::default(),
            population: vec![
                PopulationEntry::solo(presets::SHEEP, 20),
                PopulationEntry::solo(presets::WOLF, 2),
                PopulationEntry::packs(presets::WOLF_PACK, presets::WOLF, 1),
            ],
        }
    }
}
