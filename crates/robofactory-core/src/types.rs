//! Shared types used across all RoboFactory crates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Side length of the default square factory floor.
pub const GRID_SIZE: i32 = 13;

/// Protocol value returned for names missing from the agent table.
pub const UNKNOWN_ID: i32 = -1;

/// Protocol value returned for ids missing from the agent table.
pub const UNKNOWN_NAME: &str = "unknown";

/// Fixed name table. The index of a name is its protocol id and must never be renumbered.
const AGENT_TABLE: [&str; 11] = [
    "d_bot_1", "d_bot_2", "d_bot_3", "d_bot_4", "d_bot_5",
    "ch_st_1", "ch_st_2", "ch_st_3",
    "truck_1",
    "deliv_A",
    "humn_1",
];

/// A cell on the factory grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another cell.
    pub fn distance_to(&self, other: &Cell) -> f64 {
        let dx = f64::from(self.x) - f64::from(other.x);
        let dy = f64::from(self.y) - f64::from(other.y);
        (dx * dx + dy * dy).sqrt()
    }

    /// Manhattan (grid-step) distance to another cell.
    pub fn manhattan_to(&self, other: &Cell) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// The cell shifted by `(dx, dy)`.
    pub fn offset(&self, dx: i32, dy: i32) -> Cell {
        Cell::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Static or semi-static grid features, distinct from mobile agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Landmark {
    Obstacle,
    Truck,
    Delivery,
    ChargingStation,
}

impl Landmark {
    pub const OBSTACLE: u8 = 4;
    pub const TRUCK: u8 = 16;
    pub const DELIVERY: u8 = 32;
    pub const CHARGING_STATION: u8 = 64;

    pub const ALL: [Landmark; 4] = [
        Landmark::Obstacle,
        Landmark::Truck,
        Landmark::Delivery,
        Landmark::ChargingStation,
    ];

    /// Bit value of this landmark in a cell's bitmask.
    pub const fn bit(self) -> u8 {
        match self {
            Landmark::Obstacle => Self::OBSTACLE,
            Landmark::Truck => Self::TRUCK,
            Landmark::Delivery => Self::DELIVERY,
            Landmark::ChargingStation => Self::CHARGING_STATION,
        }
    }
}

/// Bitmask of the landmarks present at one cell. Kinds may coexist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LandmarkSet(u8);

impl LandmarkSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn bits(&self) -> u8 {
        self.0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub const fn contains(&self, landmark: Landmark) -> bool {
        self.0 & landmark.bit() != 0
    }

    /// Set the landmark bit. Returns true if it was not already set.
    pub fn insert(&mut self, landmark: Landmark) -> bool {
        let was_set = self.contains(landmark);
        self.0 |= landmark.bit();
        !was_set
    }

    /// Clear the landmark bit. Returns true if it was set.
    pub fn remove(&mut self, landmark: Landmark) -> bool {
        let was_set = self.contains(landmark);
        self.0 &= !landmark.bit();
        was_set
    }

    pub fn iter(&self) -> impl Iterator<Item = Landmark> + '_ {
        Landmark::ALL.into_iter().filter(|l| self.contains(*l))
    }
}

/// Dense protocol identifier derived from the fixed agent name table.
///
/// Ids are not freely assigned: `d_bot_1..5 → 0..4`, `ch_st_1..3 → 5..7`,
/// `truck_1 → 8`, `deliv_A → 9`, `humn_1 → 10`. Anything else maps to
/// [`AgentId::UNKNOWN`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub i32);

impl AgentId {
    pub const UNKNOWN: AgentId = AgentId(UNKNOWN_ID);

    /// Look up the id for a name, or [`AgentId::UNKNOWN`].
    pub fn of(name: &str) -> AgentId {
        AGENT_TABLE
            .iter()
            .position(|n| *n == name)
            .map_or(Self::UNKNOWN, |idx| AgentId(idx as i32))
    }

    pub fn is_known(&self) -> bool {
        self.table_index().is_some()
    }

    /// The table name for this id, or `"unknown"`.
    pub fn name(&self) -> &'static str {
        self.table_index()
            .map_or(UNKNOWN_NAME, |idx| AGENT_TABLE[idx])
    }

    fn table_index(&self) -> Option<usize> {
        usize::try_from(self.0)
            .ok()
            .filter(|idx| *idx < AGENT_TABLE.len())
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.name(), self.0)
    }
}

/// Protocol-level name lookup: `None` and unknown names both yield `-1`.
pub fn id_of(name: Option<&str>) -> i32 {
    name.map_or(UNKNOWN_ID, |n| AgentId::of(n).0)
}

/// Protocol-level id lookup: unknown ids yield `"unknown"`.
pub fn name_of(id: i32) -> &'static str {
    AgentId(id).name()
}
