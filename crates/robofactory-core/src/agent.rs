//! Agent - the simulated entities living on the factory floor.
//!
//! Every agent has a stable name, a protocol id from the fixed table and a
//! location. Delivery robots additionally carry a battery and six
//! independent status flags.

use crate::types::{AgentId, Cell};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Battery charge, always within `0..=100`.
///
/// Writes through [`Battery::new`], [`Battery::increase`] and
/// [`Battery::decrease`] clamp. Use [`Battery::checked`] for explicit
/// updates that must reject out-of-range values instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Battery(u8);

impl Battery {
    pub const MIN: u8 = 0;
    pub const MAX: u8 = 100;

    pub fn new(level: i64) -> Self {
        Self(level.clamp(i64::from(Self::MIN), i64::from(Self::MAX)) as u8)
    }

    pub fn full() -> Self {
        Self(Self::MAX)
    }

    /// `None` when `level` is outside `0..=100`.
    pub fn checked(level: i64) -> Option<Self> {
        (i64::from(Self::MIN)..=i64::from(Self::MAX))
            .contains(&level)
            .then(|| Self(level as u8))
    }

    pub fn level(&self) -> u8 {
        self.0
    }

    pub fn increase(&mut self, amount: u32) {
        *self = Self::new(i64::from(self.0) + i64::from(amount));
    }

    pub fn decrease(&mut self, amount: u32) {
        *self = Self::new(i64::from(self.0) - i64::from(amount));
    }
}

impl Default for Battery {
    fn default() -> Self {
        Self::full()
    }
}

impl fmt::Display for Battery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// One of the six independent robot status flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFlag {
    CarryingCargo,
    Malfunctioning,
    Charging,
    SeekingChargingStation,
    BatterySharing,
    HelpingRobot,
}

impl StatusFlag {
    pub const ALL: [StatusFlag; 6] = [
        StatusFlag::CarryingCargo,
        StatusFlag::Malfunctioning,
        StatusFlag::Charging,
        StatusFlag::SeekingChargingStation,
        StatusFlag::BatterySharing,
        StatusFlag::HelpingRobot,
    ];

    /// Name of the `update_<flag>` action that sets this flag.
    pub fn action_name(self) -> &'static str {
        match self {
            StatusFlag::CarryingCargo => "update_carrying_package",
            StatusFlag::Malfunctioning => "update_malfunctioning",
            StatusFlag::Charging => "update_charging",
            StatusFlag::SeekingChargingStation => "update_seeking_charging_station",
            StatusFlag::BatterySharing => "update_battery_sharing",
            StatusFlag::HelpingRobot => "update_helping_robot",
        }
    }

    pub fn from_action_name(name: &str) -> Option<StatusFlag> {
        Self::ALL.into_iter().find(|flag| flag.action_name() == name)
    }
}

/// Status flags of a delivery robot.
///
/// Each flag is an independent field: a robot can be malfunctioning and
/// seeking a charging station at the same time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RobotStatus {
    pub carrying_cargo: bool,
    pub malfunctioning: bool,
    pub charging: bool,
    pub seeking_charging_station: bool,
    pub battery_sharing_active: bool,
    pub helping_robot: bool,
}

/// Single state picked for display when several flags are set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayStatus {
    BatterySharing,
    Charging,
    Malfunctioning,
    SeekingCharging,
    HelpingRobot,
    CarryingCargo,
    Idle,
}

impl RobotStatus {
    pub fn get(&self, flag: StatusFlag) -> bool {
        match flag {
            StatusFlag::CarryingCargo => self.carrying_cargo,
            StatusFlag::Malfunctioning => self.malfunctioning,
            StatusFlag::Charging => self.charging,
            StatusFlag::SeekingChargingStation => self.seeking_charging_station,
            StatusFlag::BatterySharing => self.battery_sharing_active,
            StatusFlag::HelpingRobot => self.helping_robot,
        }
    }

    /// Set a flag. Returns true if the value changed.
    pub fn set(&mut self, flag: StatusFlag, value: bool) -> bool {
        let slot = match flag {
            StatusFlag::CarryingCargo => &mut self.carrying_cargo,
            StatusFlag::Malfunctioning => &mut self.malfunctioning,
            StatusFlag::Charging => &mut self.charging,
            StatusFlag::SeekingChargingStation => &mut self.seeking_charging_station,
            StatusFlag::BatterySharing => &mut self.battery_sharing_active,
            StatusFlag::HelpingRobot => &mut self.helping_robot,
        };
        let changed = *slot != value;
        *slot = value;
        changed
    }

    /// Flags currently set, in declaration order.
    pub fn active(&self) -> Vec<StatusFlag> {
        StatusFlag::ALL
            .into_iter()
            .filter(|flag| self.get(*flag))
            .collect()
    }

    /// Presentation-only priority pick. Simulation logic reads the flags directly.
    pub fn display_status(&self) -> DisplayStatus {
        if self.battery_sharing_active {
            DisplayStatus::BatterySharing
        } else if self.charging {
            DisplayStatus::Charging
        } else if self.malfunctioning {
            DisplayStatus::Malfunctioning
        } else if self.seeking_charging_station {
            DisplayStatus::SeekingCharging
        } else if self.helping_robot {
            DisplayStatus::HelpingRobot
        } else if self.carrying_cargo {
            DisplayStatus::CarryingCargo
        } else {
            DisplayStatus::Idle
        }
    }
}

/// Mutable state of a delivery robot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryRobot {
    pub battery: Battery,
    pub status: RobotStatus,
}

impl DeliveryRobot {
    pub fn new(battery: Battery) -> Self {
        Self {
            battery,
            status: RobotStatus::default(),
        }
    }
}

/// Variant-specific state of an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AgentKind {
    DeliveryRobot(DeliveryRobot),
    ChargingStation,
    HumanTechnician,
}

impl AgentKind {
    pub fn label(&self) -> &'static str {
        match self {
            AgentKind::DeliveryRobot(_) => "delivery_robot",
            AgentKind::ChargingStation => "charging_station",
            AgentKind::HumanTechnician => "human_technician",
        }
    }

    /// Robots and humans occupy cells; stations are landmarks.
    pub fn is_mobile(&self) -> bool {
        !matches!(self, AgentKind::ChargingStation)
    }
}

/// A named entity on the factory floor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    name: String,
    id: AgentId,
    location: Cell,
    pub kind: AgentKind,
}

impl Agent {
    pub fn new(name: impl Into<String>, location: Cell, kind: AgentKind) -> Self {
        let name = name.into();
        let id = AgentId::of(&name);
        Self {
            name,
            id,
            location,
            kind,
        }
    }

    pub fn delivery_robot(name: impl Into<String>, location: Cell, battery: Battery) -> Self {
        Self::new(name, location, AgentKind::DeliveryRobot(DeliveryRobot::new(battery)))
    }

    pub fn charging_station(name: impl Into<String>, location: Cell) -> Self {
        Self::new(name, location, AgentKind::ChargingStation)
    }

    pub fn human_technician(name: impl Into<String>, location: Cell) -> Self {
        Self::new(name, location, AgentKind::HumanTechnician)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn location(&self) -> Cell {
        self.location
    }

    /// Move the agent. Callers are responsible for checking the target cell.
    pub fn relocate(&mut self, location: Cell) {
        self.location = location;
    }

    pub fn robot(&self) -> Option<&DeliveryRobot> {
        match &self.kind {
            AgentKind::DeliveryRobot(robot) => Some(robot),
            _ => None,
        }
    }

    pub fn robot_mut(&mut self) -> Option<&mut DeliveryRobot> {
        match &mut self.kind {
            AgentKind::DeliveryRobot(robot) => Some(robot),
            _ => None,
        }
    }
}
