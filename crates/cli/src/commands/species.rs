//! Print the species catalog.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use console::style;
use pasture_core::SpeciesConfig;

/// List the species catalog and what each one can do
#[derive(Parser, Debug)]
pub struct Species {
    /// Directory holding `species.ron`
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

impl Species {
    pub fn execute(self) -> Result<()> {
        let species = super::content(self.data_dir.as_ref()).load_species()?;
        for config in &species {
            print_species(config);
        }
        Ok(())
    }
}

fn print_species(config: &SpeciesConfig) {
    println!(
        "{} [{}] speed {:.1}, accel {:.1}",
        style(&config.name).bold(),
        config.tag,
        config.limits.max_speed,
        config.limits.max_accel
    );
    if config.is_formation_anchor() {
        println!("  leads {} formation slots", config.formation.len());
    }
    for action in &config.actions {
        let effects: Vec<String> = action
            .effects
            .iter()
            .map(|(need, delta)| format!("{} {:+}", need, delta))
            .collect();
        println!(
            "  {:<12} ~{}s  {}",
            action.name,
            action.est_duration_secs,
            effects.join(", ")
        );
    }
}
