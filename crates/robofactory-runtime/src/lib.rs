//! # RoboFactory Runtime
//!
//! The grid-world simulation engine.
//!
//! The runtime owns the factory floor: the landmark grid, the registry of
//! robots, stations and humans, greedy one-step navigation, observer
//! fan-out and the per-agent percepts the reasoning layer reads back.
//!
//! ```rust
//! use robofactory_runtime::prelude::*;
//!
//! let mut sim = Simulation::from_config(SimulationConfig {
//!     obstacle_count: 0,
//!     seed: Some(7),
//!     ..SimulationConfig::default()
//! })
//! .unwrap();
//! let recorder = EventRecorder::new();
//! sim.subscribe(Box::new(recorder.clone()));
//!
//! assert!(sim.dispatch("ch_st_1", "register_charging_station", &[Term::Int(10), Term::Int(3)]));
//! assert_eq!(recorder.len(), 1);
//! ```

pub mod grid;
pub mod registry;
pub mod movement;
pub mod notify;
pub mod percept;
pub mod simulation;
pub mod snapshot;
pub mod shared;
pub mod recorder;
pub mod prelude;
