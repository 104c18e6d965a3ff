//! Configuration management for the RoboFactory CLI.

use anyhow::{Context, Result};
use robofactory::prelude::SimulationConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name searched for in the current and parent directories.
pub const CONFIG_FILE: &str = "robofactory.toml";

/// RoboFactory project configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub demo: DemoConfig,
}

/// Parameters of the built-in delivery demo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoConfig {
    #[serde(default = "default_robots")]
    pub robots: usize,
    #[serde(default = "default_ticks")]
    pub ticks: u64,
    #[serde(default = "default_stations")]
    pub stations: usize,
    #[serde(default = "default_charge_rate")]
    pub charge_rate: u32,
}

// Default value functions
fn default_robots() -> usize { 3 }
fn default_ticks() -> u64 { 200 }
fn default_stations() -> usize { 2 }
fn default_charge_rate() -> u32 { 10 }

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            robots: default_robots(),
            ticks: default_ticks(),
            stations: default_stations(),
            charge_rate: default_charge_rate(),
        }
    }
}

impl Config {
    /// Load config from robofactory.toml in the current or parent directories.
    pub fn load() -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to read current directory")?;
        match find_config_file(&cwd) {
            Some(path) => Self::load_from(&path),
            None => Ok(Config::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        config
            .simulation
            .validate()
            .with_context(|| format!("Invalid config: {}", path.display()))?;
        Ok(config)
    }

    /// Save config to the specified path.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }
}

/// Find robofactory.toml in `start` or its parent directories.
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        let config_path = dir.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        Config::default().save(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.simulation, SimulationConfig::default());
        assert_eq!(loaded.demo.robots, 3);
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[simulation]\nobstacle_count = 4\nseed = 9\n").unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.simulation.obstacle_count, 4);
        assert_eq!(loaded.simulation.seed, Some(9));
        assert_eq!(loaded.simulation.grid_size, 13);
        assert_eq!(loaded.demo.ticks, 200);
    }

    #[test]
    fn invalid_values_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[simulation]\ntowards_target_probability = 2.0\n").unwrap();
        assert!(Config::load_from(&path).is_err());

        std::fs::write(&path, "not toml at all [").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn config_is_found_in_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "").unwrap();

        let found = find_config_file(&nested).unwrap();
        assert_eq!(found, dir.path().join(CONFIG_FILE));
    }
}
