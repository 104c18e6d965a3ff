//! # RoboFactory
//!
//! A grid-world factory simulation for multi-agent delivery robots.
//!
//! RoboFactory is the environment half of a multi-agent system: external
//! reasoning agents read percepts from it and send actions into it. Robots
//! move one cell at a time across a 13×13 floor, dodging obstacles and each
//! other, draining battery as they go and seeking charging stations.
//!
//! ## Quick Start
//!
//! ```rust
//! use robofactory::prelude::*;
//!
//! // A reproducible world with the default ten obstacles
//! let mut sim = Simulation::from_config(SimulationConfig {
//!     seed: Some(42),
//!     ..SimulationConfig::default()
//! })
//! .unwrap();
//!
//! // Record every change for later inspection
//! let recorder = EventRecorder::new();
//! sim.subscribe(Box::new(recorder.clone()));
//!
//! // Robots are registered by the reasoning layer, on free cells
//! let start = (0..13)
//!     .flat_map(|y| (0..13).map(move |x| Cell::new(x, y)))
//!     .find(|c| sim.grid().is_free(*c))
//!     .unwrap();
//! let init: ActionCall = format!("init_agent(d_bot_1, 90, {}, {})", start.x, start.y)
//!     .parse()
//!     .unwrap();
//! assert!(sim.dispatch_call("d_bot_1", &init));
//!
//! // Head for the truck
//! let truck = sim.truck_location();
//! for _ in 0..5 {
//!     let here = sim.agent("d_bot_1").unwrap().location();
//!     let args: [Term; 4] = [truck.x.into(), truck.y.into(), here.x.into(), here.y.into()];
//!     assert!(sim.dispatch("d_bot_1", "move_towards_target", &args));
//! }
//!
//! for percept in sim.percepts("d_bot_1") {
//!     println!("{}", percept);
//! }
//! assert!(!recorder.is_empty());
//! ```
//!
//! ## Architecture
//!
//! - [`robofactory_core`] - Cells, landmarks, agents, the name table, actions and the observer trait
//! - [`robofactory_runtime`] - Grid state, agent registry, movement, notification hub and the simulation facade
//!
//! ## Actions
//!
//! | Action | Arguments | Effect |
//! |--------|-----------|--------|
//! | `init_agent` / `init_dbot` | name, battery, x, y | Register a delivery robot |
//! | `init_human` | x, y | Register the caller as a human technician |
//! | `move_towards_target` | tx, ty, x, y | One greedy step, costs battery |
//! | `move_randomly` | x, y | One random unit step |
//! | `update_battery_level` | level | Set battery, rejected outside 0..=100 |
//! | `charge_battery` / `consume_battery` | amount | Clamped battery change |
//! | `update_<flag>` | true / false | Set one of the six status flags |
//! | `register_charging_station` | x, y | Add the caller's station |
//! | `unregister_charging_station` | | Remove the caller's station |
//! | `compute_closest_charging_station` / `compute_closest_robot` | [[name, x, y], ...], x, y | Write the nearest candidate as a percept |
//!
//! ## Percepts
//!
//! `initialized`, `current_position(x, y)`, `batteryLevel(n)`, `lowBattery`,
//! `closestChargingStation(name, x, y)` and `closestRobot(name, x, y)`.
//! Every write replaces the previous percept of the same shape.

// Re-export all subcrates
pub use robofactory_core as core;
pub use robofactory_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust
/// use robofactory::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use robofactory_core::types::{
        AgentId, Cell,
        Landmark, LandmarkSet,
        id_of, name_of,
        GRID_SIZE,
    };
    pub use robofactory_core::agent::{
        Agent, AgentKind,
        Battery, DeliveryRobot,
        DisplayStatus, RobotStatus, StatusFlag,
    };
    pub use robofactory_core::action::{Action, ClosestKind};
    pub use robofactory_core::term::{ActionCall, Term};

    // Observer capability
    pub use robofactory_core::observer::{ModelEvent, ModelObserver};

    // Error types
    pub use robofactory_core::error::{ActionError, ParseError, Result, SimError};

    // Runtime
    pub use robofactory_runtime::simulation::{Simulation, SimulationConfig};
    pub use robofactory_runtime::shared::SharedSimulation;
    pub use robofactory_runtime::grid::GridState;
    pub use robofactory_runtime::notify::SubscriptionId;
    pub use robofactory_runtime::percept::Percept;
    pub use robofactory_runtime::snapshot::{AgentSnapshot, WorldSnapshot};
    pub use robofactory_runtime::recorder::{EventRecorder, TracingObserver};
}
