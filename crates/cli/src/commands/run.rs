//! Run the simulation headless and summarize the result.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use runtime::{Runtime, RuntimeConfig, StepReport, WorldSnapshot};

/// Generate a world and run the simulation
#[derive(Parser, Debug)]
pub struct Run {
    /// Directory holding `config.toml` and `species.ron`
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// World and behaviour seed (overrides config and PASTURE_SEED)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of ticks to simulate
    #[arg(long, default_value_t = 600)]
    pub ticks: u32,

    /// Ticks per simulated second (overrides config and PASTURE_TICK_HZ)
    #[arg(long)]
    pub tick_hz: Option<f32>,

    /// Pace ticks against the wall clock instead of running flat out
    #[arg(long)]
    pub realtime: bool,

    /// Print the final world snapshot as JSON
    #[arg(long)]
    pub json: bool,

    /// List every surviving agent in the summary
    #[arg(long)]
    pub agents: bool,
}

impl Run {
    pub async fn execute(self) -> Result<()> {
        let factory = super::content(self.data_dir.as_ref());
        let sim = factory.load_config()?;
        let species = factory.load_species()?;

        let mut config = RuntimeConfig::new(sim).with_env_overrides();
        if let Some(seed) = self.seed {
            config.sim.seed = seed;
        }
        if let Some(tick_hz) = self.tick_hz {
            if !(tick_hz.is_finite() && tick_hz > 0.0) {
                anyhow::bail!("--tick-hz must be positive, got {}", tick_hz);
            }
            config.sim.tick_hz = tick_hz;
        }

        let dt = config.sim.dt();
        let batch = (config.sim.tick_hz.round() as u32).max(1);
        tracing::info!(
            seed = config.sim.seed,
            tick_hz = config.sim.tick_hz,
            ticks = self.ticks,
            data_dir = %factory.data_dir().display(),
            "starting simulation"
        );

        let runtime = Runtime::builder()
            .config(config)
            .species(species)
            .build()
            .await
            .context("Failed to start runtime")?;
        let handle = runtime.handle();

        let mut captures = 0;
        let mut remaining = self.ticks;
        if self.realtime {
            let mut ticker = tokio::time::interval(Duration::from_secs_f32(dt));
            while remaining > 0 {
                ticker.tick().await;
                let report = handle.step(1).await?;
                captures += report.captures;
                remaining -= 1;
                if report.tick % u64::from(batch) == 0 {
                    log_progress(&report);
                }
            }
        } else {
            while remaining > 0 {
                let ticks = remaining.min(batch);
                let report = handle.step(ticks).await?;
                captures += report.captures;
                remaining -= ticks;
                log_progress(&report);
            }
        }

        let snapshot = handle.snapshot().await?;
        drop(handle);
        runtime.shutdown().await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        } else {
            print_summary(&snapshot, captures, self.agents);
        }
        Ok(())
    }
}

fn log_progress(report: &StepReport) {
    tracing::info!(
        tick = report.tick,
        clock = report.clock,
        population = report.population,
        "progress"
    );
}

fn print_summary(snapshot: &WorldSnapshot, captures: usize, agents: bool) {
    println!(
        "{} tick {} ({:.1}s simulated) on a {}x{} board",
        style("Pasture").bold().green(),
        snapshot.tick,
        snapshot.clock,
        snapshot.dimensions.width,
        snapshot.dimensions.height
    );
    println!("  captures: {}", style(captures).yellow());
    for (species, count) in snapshot.census() {
        println!("  {:<12} {}", species, count);
    }
    println!("  packs: {}", snapshot.packs.len());

    if !agents {
        return;
    }

    println!();
    println!(
        "{}",
        style(format!(
            "{:<6} {:<12} {:<16} {:>14} {:>10}",
            "id", "species", "goal", "position", "cost"
        ))
        .dim()
    );
    for agent in &snapshot.agents {
        let goal = match (&agent.goal, agent.anchor) {
            (_, Some(anchor)) => format!("follow {}", anchor),
            (Some(goal), None) => goal.clone(),
            (None, None) => "deciding".to_string(),
        };
        println!(
            "{:<6} {:<12} {:<16} {:>14} {:>10.2}",
            agent.id.to_string(),
            agent.species,
            goal,
            format!("({:.1}, {:.1})", agent.position.x, agent.position.y),
            agent.discontentment
        );
    }
}
