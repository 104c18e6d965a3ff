//! CLI command implementations.

pub mod init;
pub mod run;
pub mod show;
pub mod replay;

use anyhow::{Context, Result};
use robofactory::prelude::*;

use crate::config::Config;

/// Build a world from the loaded config, with an optional seed override.
pub(crate) fn build_simulation(config: &Config, seed: Option<u64>) -> Result<Simulation> {
    let mut sim_config = config.simulation.clone();
    if seed.is_some() {
        sim_config.seed = seed;
    }
    Simulation::from_config(sim_config).context("Failed to build simulation")
}
