//! Simulation - the facade the reasoning layer talks to.
//!
//! One owned context holds the grid, the agent registry, the observer hub
//! and the percept mirror. Requests come in as `(agent, action, args)`,
//! are parsed into a typed [`Action`] and executed by one exhaustive match.
//!
//! ```text
//! dispatch ─▶ Action::parse ─▶ execute ─▶ grid / registry ─▶ hub ─▶ percepts
//! ```

use crate::grid::{GridState, DELIVERY_LOCATION, TRUCK_LOCATION};
use crate::movement::{Movement, MovementResolver};
use crate::notify::{NotificationHub, SubscriptionId};
use crate::percept::{Percept, PerceptStore};
use crate::registry::AgentRegistry;
use crate::snapshot::WorldSnapshot;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use robofactory_core::action::{Action, ComputeClosest, InitRobot, MoveTowards};
use robofactory_core::agent::{Agent, Battery, StatusFlag};
use robofactory_core::error::{Result, SimError};
use robofactory_core::observer::ModelObserver;
use robofactory_core::term::{ActionCall, Term};
use robofactory_core::types::{self, Cell, GRID_SIZE};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Tunable simulation parameters.
///
/// Use with [`Simulation::from_config`]; [`Simulation::new`] uses the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Side length of the square grid (default: 13).
    pub grid_size: i32,
    /// Obstacles to scatter at construction (default: 10).
    pub obstacle_count: usize,
    /// Sampling budget for obstacle placement (default: 1000).
    pub obstacle_attempts: usize,
    /// Chance that a directed step heads towards the target (default: 0.9).
    pub towards_target_probability: f64,
    /// Battery drained by each `move_towards_target` (default: 1).
    pub move_battery_cost: u32,
    /// `lowBattery` is perceived at or below this level (default: 20).
    pub low_battery_threshold: u8,
    /// Seed for reproducible runs. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            obstacle_count: 10,
            obstacle_attempts: 1000,
            towards_target_probability: 0.9,
            move_battery_cost: 1,
            low_battery_threshold: 20,
            seed: None,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.grid_size <= 0 {
            return Err(SimError::Config(format!(
                "grid_size must be positive, got {}",
                self.grid_size
            )));
        }
        if !(0.0..=1.0).contains(&self.towards_target_probability) {
            return Err(SimError::Config(format!(
                "towards_target_probability must be within 0..=1, got {}",
                self.towards_target_probability
            )));
        }
        if self.low_battery_threshold > Battery::MAX {
            return Err(SimError::Config(format!(
                "low_battery_threshold must be at most {}, got {}",
                Battery::MAX,
                self.low_battery_threshold
            )));
        }
        Ok(())
    }
}

/// The grid world.
pub struct Simulation {
    config: SimulationConfig,
    grid: GridState,
    registry: AgentRegistry,
    hub: NotificationHub,
    percepts: PerceptStore,
    resolver: MovementResolver,
    rng: ChaCha8Rng,
}

impl Simulation {
    /// A world with the default configuration.
    pub fn new() -> Self {
        Self::build(SimulationConfig::default())
    }

    pub fn from_config(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    /// A world on a prepared grid. No obstacles are generated; the grid is
    /// used as given and `grid_size` is taken from its width.
    pub fn with_grid(mut config: SimulationConfig, grid: GridState) -> Result<Self> {
        if grid.width() != grid.height() {
            return Err(SimError::Config(format!(
                "grid must be square, got {}x{}",
                grid.width(),
                grid.height()
            )));
        }
        config.grid_size = grid.width();
        config.validate()?;
        let rng = Self::seeded_rng(config.seed);
        info!(size = config.grid_size, obstacles = grid.obstacles().len(), "simulation ready on prepared grid");
        Ok(Self::assemble(config, grid, rng))
    }

    fn build(config: SimulationConfig) -> Self {
        let mut rng = Self::seeded_rng(config.seed);
        let mut grid = GridState::new(config.grid_size, config.grid_size);
        let placed = grid.generate_obstacles(config.obstacle_count, config.obstacle_attempts, &mut rng);
        if placed < config.obstacle_count {
            warn!(placed, requested = config.obstacle_count, "obstacle budget exhausted");
        }
        info!(size = config.grid_size, obstacles = placed, seed = ?config.seed, "simulation ready");
        Self::assemble(config, grid, rng)
    }

    fn seeded_rng(seed: Option<u64>) -> ChaCha8Rng {
        match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        }
    }

    fn assemble(config: SimulationConfig, grid: GridState, rng: ChaCha8Rng) -> Self {
        let resolver = MovementResolver::new(
            grid.width(),
            grid.height(),
            config.towards_target_probability,
        );
        Self {
            config,
            grid,
            registry: AgentRegistry::new(),
            hub: NotificationHub::new(),
            percepts: PerceptStore::new(),
            resolver,
            rng,
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn grid(&self) -> &GridState {
        &self.grid
    }

    pub fn registry(&self) -> &AgentRegistry {
        &self.registry
    }

    pub fn subscribe(&mut self, observer: Box<dyn ModelObserver>) -> SubscriptionId {
        self.hub.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.hub.unsubscribe(id)
    }

    /// Run an action for `agent`. Failures are logged and reported as `false`;
    /// nothing is mutated on failure.
    pub fn dispatch(&mut self, agent: &str, action: &str, args: &[Term]) -> bool {
        let result = Action::parse(action, args)
            .map_err(SimError::from)
            .and_then(|parsed| self.execute(agent, &parsed));
        self.report(agent, action, result)
    }

    /// Like [`Simulation::dispatch`] for an already parsed literal.
    pub fn dispatch_call(&mut self, agent: &str, call: &ActionCall) -> bool {
        self.dispatch(agent, &call.name, &call.args)
    }

    fn report(&self, agent: &str, action: &str, result: Result<()>) -> bool {
        match result {
            Ok(()) => true,
            Err(e) => {
                warn!(agent, action, category = e.category(), "action rejected: {}", e);
                false
            }
        }
    }

    /// Execute a typed action on behalf of `agent`.
    pub fn execute(&mut self, agent: &str, action: &Action) -> Result<()> {
        debug!(agent, action = action.name(), "execute");
        match action {
            Action::InitRobot(init) => self.init_robot(init),
            Action::InitHuman { location } => self.init_human(agent, *location),
            Action::MoveTowards(step) => self.move_towards(agent, step),
            Action::MoveRandomly { believed } => self.move_randomly(agent, *believed),
            Action::UpdateBatteryLevel { level } => self.update_battery_level(agent, *level),
            Action::ChargeBattery { amount } => self.adjust_battery(agent, i64::from(*amount)),
            Action::ConsumeBattery { amount } => self.adjust_battery(agent, -i64::from(*amount)),
            Action::SetFlag { flag, value } => self.set_flag(agent, *flag, *value),
            Action::RegisterChargingStation { location } => self.register_charging_station(agent, *location),
            Action::UnregisterChargingStation => self.unregister_charging_station(agent),
            Action::ComputeClosest(compute) => {
                self.compute_closest(agent, compute);
                Ok(())
            }
        }
    }

    fn check_spawn(&self, name: &str, location: Cell) -> Result<()> {
        if !self.grid.is_free(location) || self.registry.occupied_by_other(location, name) {
            return Err(SimError::InvalidLocation(location));
        }
        Ok(())
    }

    fn init_robot(&mut self, init: &InitRobot) -> Result<()> {
        let battery = Battery::checked(init.battery).ok_or(SimError::BatteryOutOfRange(init.battery))?;
        self.check_spawn(&init.name, init.location)?;

        let agent = Agent::delivery_robot(init.name.as_str(), init.location, battery);
        let id = agent.id();
        if let Some(previous) = self.registry.register(agent) {
            if previous.location() != init.location {
                self.hub.agent_moved(previous.location(), init.location, id);
            }
        }

        self.percepts.replace(&init.name, Percept::new("initialized", vec![]));
        self.write_position(&init.name, init.location);
        self.write_battery(&init.name, battery);
        self.hub.agent_updated(init.location, id);
        info!(agent = %init.name, %id, location = %init.location, battery = %battery, "robot initialized");
        Ok(())
    }

    fn init_human(&mut self, name: &str, location: Cell) -> Result<()> {
        self.check_spawn(name, location)?;
        let agent = Agent::human_technician(name, location);
        let id = agent.id();
        if let Some(previous) = self.registry.register(agent) {
            if previous.location() != location {
                self.hub.agent_moved(previous.location(), location, id);
            }
        }
        self.percepts.replace(name, Percept::new("initialized", vec![]));
        self.write_position(name, location);
        self.hub.agent_updated(location, id);
        info!(agent = name, %id, %location, "human technician initialized");
        Ok(())
    }

    /// Registry location of a mobile agent.
    fn mobile_location(&self, name: &str, believed: Cell) -> Result<Cell> {
        let agent = self
            .registry
            .get(name)
            .ok_or_else(|| SimError::UnknownAgent(name.to_string()))?;
        if !agent.kind.is_mobile() {
            return Err(SimError::Immobile(name.to_string()));
        }
        if agent.location() != believed {
            warn!(
                agent = name,
                believed = %believed,
                actual = %agent.location(),
                "stale position in request, using registry location"
            );
        }
        Ok(agent.location())
    }

    fn move_towards(&mut self, name: &str, step: &MoveTowards) -> Result<()> {
        let from = self.mobile_location(name, step.believed)?;
        let movement = {
            let grid = &self.grid;
            let registry = &self.registry;
            let passable = |cell: Cell| grid.is_free(cell) && !registry.occupied_by_other(cell, name);
            self.resolver.plan_towards(from, step.target, passable, &mut self.rng)
        };
        self.commit(name, movement);

        let cost = self.config.move_battery_cost;
        if let Some(agent) = self.registry.get_mut(name) {
            let location = agent.location();
            let id = agent.id();
            if let Some(robot) = agent.robot_mut() {
                let before = robot.battery;
                robot.battery.decrease(cost);
                let after = robot.battery;
                if before != after {
                    self.hub.agent_updated(location, id);
                }
                self.write_battery(name, after);
            }
        }
        Ok(())
    }

    fn move_randomly(&mut self, name: &str, believed: Cell) -> Result<()> {
        let from = self.mobile_location(name, believed)?;
        let movement = {
            let grid = &self.grid;
            let registry = &self.registry;
            let passable = |cell: Cell| grid.is_free(cell) && !registry.occupied_by_other(cell, name);
            self.resolver.plan_random(from, passable, &mut self.rng)
        };
        self.commit(name, movement);
        Ok(())
    }

    fn commit(&mut self, name: &str, movement: Movement) {
        if movement.moved() {
            if let Some(agent) = self.registry.get_mut(name) {
                agent.relocate(movement.to);
                let id = agent.id();
                self.hub.agent_moved(movement.from, movement.to, id);
            }
        }
        self.write_position(name, movement.to);
    }

    fn update_battery_level(&mut self, name: &str, level: i64) -> Result<()> {
        let battery = Battery::checked(level).ok_or(SimError::BatteryOutOfRange(level))?;
        if let Some(agent) = self.registry.get_mut(name) {
            let location = agent.location();
            let id = agent.id();
            if let Some(robot) = agent.robot_mut() {
                let changed = robot.battery != battery;
                robot.battery = battery;
                if changed {
                    self.hub.agent_updated(location, id);
                }
            }
        }
        self.write_battery(name, battery);
        Ok(())
    }

    fn adjust_battery(&mut self, name: &str, delta: i64) -> Result<()> {
        let agent = self
            .registry
            .get_mut(name)
            .ok_or_else(|| SimError::UnknownAgent(name.to_string()))?;
        let location = agent.location();
        let id = agent.id();
        let robot = agent
            .robot_mut()
            .ok_or_else(|| SimError::NotARobot(name.to_string()))?;

        let before = robot.battery;
        let amount = u32::try_from(delta.unsigned_abs()).unwrap_or(u32::MAX);
        if delta >= 0 {
            robot.battery.increase(amount);
        } else {
            robot.battery.decrease(amount);
        }
        let after = robot.battery;

        if before != after {
            self.hub.agent_updated(location, id);
        }
        self.write_battery(name, after);
        Ok(())
    }

    fn set_flag(&mut self, name: &str, flag: StatusFlag, value: bool) -> Result<()> {
        let agent = self
            .registry
            .get_mut(name)
            .ok_or_else(|| SimError::UnknownAgent(name.to_string()))?;
        let location = agent.location();
        let id = agent.id();
        let robot = agent
            .robot_mut()
            .ok_or_else(|| SimError::NotARobot(name.to_string()))?;

        if robot.status.set(flag, value) {
            debug!(agent = name, ?flag, value, "status flag changed");
            self.hub.agent_updated(location, id);
        }
        Ok(())
    }

    fn register_charging_station(&mut self, name: &str, location: Cell) -> Result<()> {
        self.grid.add_charging_station(name, location, &mut self.hub)?;
        // A robot acting as a station owner keeps its robot entry.
        let owner_is_mobile = self.registry.get(name).map_or(false, |a| a.kind.is_mobile());
        if !owner_is_mobile {
            self.registry.register(Agent::charging_station(name, location));
        }
        info!(station = name, %location, "charging station registered");
        Ok(())
    }

    fn unregister_charging_station(&mut self, name: &str) -> Result<()> {
        let location = self.grid.remove_charging_station(name, &mut self.hub)?;
        let is_station_entry = self.registry.get(name).map_or(false, |a| !a.kind.is_mobile());
        if is_station_entry {
            self.registry.remove(name);
        }
        info!(station = name, %location, "charging station removed");
        Ok(())
    }

    fn compute_closest(&mut self, name: &str, compute: &ComputeClosest) {
        match compute.closest() {
            Some((best, distance)) => {
                debug!(agent = name, closest = %best.name, distance, "closest candidate");
                let percept = Percept::new(
                    compute.kind.predicate(),
                    vec![
                        Term::string(best.name.as_str()),
                        best.location.x.into(),
                        best.location.y.into(),
                    ],
                );
                self.percepts.replace(name, percept);
            }
            None => debug!(agent = name, "no candidates, percept left untouched"),
        }
    }

    fn write_position(&mut self, name: &str, cell: Cell) {
        self.percepts.replace(
            name,
            Percept::new("current_position", vec![cell.x.into(), cell.y.into()]),
        );
    }

    fn write_battery(&mut self, name: &str, battery: Battery) {
        self.percepts.replace(
            name,
            Percept::new("batteryLevel", vec![i64::from(battery.level()).into()]),
        );
        if battery.level() <= self.config.low_battery_threshold {
            self.percepts.replace(name, Percept::new("lowBattery", vec![]));
        } else {
            self.percepts.remove(name, "lowBattery", 0);
        }
    }

    pub fn percepts(&self, agent: &str) -> &[Percept] {
        self.percepts.all(agent)
    }

    pub fn percept(&self, agent: &str, predicate: &str) -> Option<&Percept> {
        self.percepts.get(agent, predicate)
    }

    pub fn agent(&self, name: &str) -> Option<&Agent> {
        self.registry.get(name)
    }

    pub fn truck_location(&self) -> Cell {
        TRUCK_LOCATION
    }

    pub fn delivery_location(&self) -> Cell {
        DELIVERY_LOCATION
    }

    pub fn charging_station_locations(&self) -> BTreeMap<String, Cell> {
        self.grid.charging_station_locations()
    }

    pub fn has_charging_station_at(&self, cell: Cell) -> bool {
        self.grid.has_charging_station_at(cell)
    }

    /// Protocol id of a name, `-1` if unknown.
    pub fn id_of(name: Option<&str>) -> i32 {
        types::id_of(name)
    }

    /// Protocol name of an id, `"unknown"` if unknown.
    pub fn name_of(id: i32) -> &'static str {
        types::name_of(id)
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot::capture(&self.grid, &self.registry)
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("config", &self.config)
            .field("agents", &self.registry.len())
            .field("observers", &self.hub.len())
            .finish()
    }
}
