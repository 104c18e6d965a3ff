//! RoboFactory CLI - run and inspect the factory floor simulation.

mod commands;
mod config;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "robofactory")]
#[command(author, version, about = "RoboFactory - grid-world delivery robot simulation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default robofactory.toml
    Init {
        /// Project directory (default: current directory)
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Run the delivery demo
    Run {
        /// Number of robots (1-5)
        #[arg(short, long)]
        robots: Option<usize>,

        /// Number of ticks to run
        #[arg(short, long)]
        ticks: Option<u64>,

        /// RNG seed for a reproducible run
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Render a freshly generated world
    Show {
        /// RNG seed for obstacle placement
        #[arg(short, long)]
        seed: Option<u64>,

        /// Print the world snapshot as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replay an action script (`agent: action(args)` per line)
    Replay {
        /// Script file
        file: PathBuf,

        /// Write the recorded model events as JSON
        #[arg(short, long)]
        events: Option<PathBuf>,

        /// RNG seed for obstacle placement and movement
        #[arg(short, long)]
        seed: Option<u64>,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Init { path } => commands::init::run(path),
        Commands::Run { robots, ticks, seed } => commands::run::run(robots, ticks, seed, cli.verbose),
        Commands::Show { seed, json } => commands::show::run(seed, json),
        Commands::Replay { file, events, seed } => {
            commands::replay::run(&file, events.as_deref(), seed)
        }
    }
}
