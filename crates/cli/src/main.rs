//! Headless pasture simulation.
//!
//! Generates a world, spawns the configured population and steps it for a
//! fixed number of ticks, then prints who is left and what they are doing.

mod commands;
mod dirs;
mod logging;

use anyhow::Result;
use clap::Parser;
use commands::{Run, Species};

/// Sheep and wolves foraging by smell
#[derive(Parser)]
#[command(name = "pasture")]
#[command(about = "Headless smell-driven foraging simulation", long_about = None)]
#[command(version)]
struct Cli {
    /// Also write logs to a per-session file under the cache directory
    #[arg(long, global = true)]
    log_file: bool,

    /// Session name for the log directory (defaults to a timestamp)
    #[arg(long, global = true)]
    session: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Generate a world and run the simulation
    Run(Run),

    /// List the species catalog and what each one can do
    Species(Species),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _guard = logging::setup(cli.log_file, cli.session.as_deref())?;

    match cli.command {
        Command::Run(cmd) => cmd.execute().await,
        Command::Species(cmd) => cmd.execute(),
    }
}
