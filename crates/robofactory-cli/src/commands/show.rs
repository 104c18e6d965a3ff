//! Render a freshly generated world.

use anyhow::{Context, Result};
use colored::Colorize;

use crate::commands::build_simulation;
use crate::config::Config;
use crate::render;

pub fn run(seed: Option<u64>, json: bool) -> Result<()> {
    let config = Config::load()?;
    let sim = build_simulation(&config, seed)?;
    let snapshot = sim.snapshot();

    if json {
        let out = serde_json::to_string_pretty(&snapshot).context("Failed to serialize world")?;
        println!("{}", out);
        return Ok(());
    }

    println!(
        "{} {}x{} floor, {} obstacles",
        "→".blue(),
        snapshot.width,
        snapshot.height,
        snapshot.obstacles.len().to_string().cyan()
    );
    println!();
    render::print_world(&snapshot);
    println!();
    render::print_legend();
    println!();
    println!("  Truck:    {}", sim.truck_location());
    println!("  Delivery: {}", sim.delivery_location());

    Ok(())
}
