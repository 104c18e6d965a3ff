//! Serializable views of the world, for renderers and JSON export.

use crate::grid::GridState;
use crate::registry::AgentRegistry;
use robofactory_core::agent::{Agent, Battery, DisplayStatus, RobotStatus};
use robofactory_core::types::{AgentId, Cell, Landmark};
use serde::Serialize;
use std::collections::BTreeMap;

/// A serializable snapshot of one agent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentSnapshot {
    pub name: String,
    pub id: AgentId,
    pub kind: String,
    pub location: Cell,
    pub battery: Option<Battery>,
    pub status: Option<RobotStatus>,
    pub display: Option<DisplayStatus>,
}

impl AgentSnapshot {
    fn of(agent: &Agent) -> Self {
        let robot = agent.robot();
        Self {
            name: agent.name().to_string(),
            id: agent.id(),
            kind: agent.kind.label().to_string(),
            location: agent.location(),
            battery: robot.map(|r| r.battery),
            status: robot.map(|r| r.status),
            display: robot.map(|r| r.status.display_status()),
        }
    }
}

/// A complete serializable snapshot of the world at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorldSnapshot {
    pub width: i32,
    pub height: i32,
    pub obstacles: Vec<Cell>,
    pub truck: Vec<Cell>,
    pub delivery: Vec<Cell>,
    pub stations: BTreeMap<String, Cell>,
    pub agents: Vec<AgentSnapshot>,
}

impl WorldSnapshot {
    pub fn capture(grid: &GridState, registry: &AgentRegistry) -> Self {
        Self {
            width: grid.width(),
            height: grid.height(),
            obstacles: grid.obstacles(),
            truck: grid.cells_with(Landmark::Truck),
            delivery: grid.cells_with(Landmark::Delivery),
            stations: grid.charging_station_locations(),
            agents: registry.iter().map(AgentSnapshot::of).collect(),
        }
    }

    /// The agent drawn at a cell; the last registered wins.
    pub fn agent_at(&self, cell: Cell) -> Option<&AgentSnapshot> {
        self.agents.iter().rev().find(|a| a.location == cell)
    }
}
