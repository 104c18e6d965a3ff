//! Action - the closed set of requests the reasoning layer can issue.
//!
//! Actions arrive as a name plus a positional [`Term`] list. [`Action::parse`]
//! validates arity and argument types and produces a strongly-typed payload;
//! the runtime then executes it with one exhaustive match.

use crate::agent::StatusFlag;
use crate::error::ActionError;
use crate::term::{ActionCall, Term};
use crate::types::Cell;
use serde::{Deserialize, Serialize};

/// Register (or re-register) a delivery robot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitRobot {
    pub name: String,
    pub battery: i64,
    pub location: Cell,
}

/// One greedy step towards a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveTowards {
    pub target: Cell,
    /// Position the caller believes it is at. The registry stays authoritative.
    pub believed: Cell,
}

/// A candidate for a closest-entity computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub name: String,
    pub location: Cell,
}

/// What a closest-entity computation searches for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosestKind {
    ChargingStation,
    Robot,
}

impl ClosestKind {
    pub fn action_name(self) -> &'static str {
        match self {
            ClosestKind::ChargingStation => "compute_closest_charging_station",
            ClosestKind::Robot => "compute_closest_robot",
        }
    }

    /// Percept predicate the result is written to.
    pub fn predicate(self) -> &'static str {
        match self {
            ClosestKind::ChargingStation => "closestChargingStation",
            ClosestKind::Robot => "closestRobot",
        }
    }
}

/// Find the candidate closest to `origin`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputeClosest {
    pub kind: ClosestKind,
    pub candidates: Vec<Candidate>,
    pub origin: Cell,
}

impl ComputeClosest {
    /// Euclidean argmin. Ties keep the first-listed candidate.
    pub fn closest(&self) -> Option<(&Candidate, f64)> {
        let mut best: Option<(&Candidate, f64)> = None;
        for candidate in &self.candidates {
            let distance = self.origin.distance_to(&candidate.location);
            if best.map_or(true, |(_, d)| distance < d) {
                best = Some((candidate, distance));
            }
        }
        best
    }
}

/// Every action the simulation understands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    InitRobot(InitRobot),
    InitHuman { location: Cell },
    MoveTowards(MoveTowards),
    MoveRandomly { believed: Cell },
    UpdateBatteryLevel { level: i64 },
    ChargeBattery { amount: u32 },
    ConsumeBattery { amount: u32 },
    SetFlag { flag: StatusFlag, value: bool },
    RegisterChargingStation { location: Cell },
    UnregisterChargingStation,
    ComputeClosest(ComputeClosest),
}

impl Action {
    /// Validate a named action and its positional arguments.
    pub fn parse(name: &str, args: &[Term]) -> Result<Action, ActionError> {
        let args = Args { action: name, terms: args };
        let action = match name {
            "init_agent" | "init_dbot" => {
                args.arity(4)?;
                Action::InitRobot(InitRobot {
                    name: args.name(0)?.to_string(),
                    battery: args.int(1)?,
                    location: args.cell(2)?,
                })
            }
            "init_human" => {
                args.arity(2)?;
                Action::InitHuman { location: args.cell(0)? }
            }
            "move_towards_target" => {
                args.arity(4)?;
                Action::MoveTowards(MoveTowards {
                    target: args.cell(0)?,
                    believed: args.cell(2)?,
                })
            }
            "move_randomly" => {
                args.arity(2)?;
                Action::MoveRandomly { believed: args.cell(0)? }
            }
            "update_battery_level" => {
                args.arity(1)?;
                Action::UpdateBatteryLevel { level: args.int(0)? }
            }
            "charge_battery" => {
                args.arity(1)?;
                Action::ChargeBattery { amount: args.amount(0)? }
            }
            "consume_battery" => {
                args.arity(1)?;
                Action::ConsumeBattery { amount: args.amount(0)? }
            }
            "register_charging_station" => {
                args.arity(2)?;
                Action::RegisterChargingStation { location: args.cell(0)? }
            }
            "unregister_charging_station" => {
                args.arity(0)?;
                Action::UnregisterChargingStation
            }
            "compute_closest_charging_station" => args.closest(ClosestKind::ChargingStation)?,
            "compute_closest_robot" => args.closest(ClosestKind::Robot)?,
            other => match StatusFlag::from_action_name(other) {
                Some(flag) => {
                    args.arity(1)?;
                    Action::SetFlag { flag, value: args.boolean(0)? }
                }
                None => return Err(ActionError::UnknownAction(other.to_string())),
            },
        };
        Ok(action)
    }

    /// Canonical action name.
    pub fn name(&self) -> &'static str {
        match self {
            Action::InitRobot(_) => "init_agent",
            Action::InitHuman { .. } => "init_human",
            Action::MoveTowards(_) => "move_towards_target",
            Action::MoveRandomly { .. } => "move_randomly",
            Action::UpdateBatteryLevel { .. } => "update_battery_level",
            Action::ChargeBattery { .. } => "charge_battery",
            Action::ConsumeBattery { .. } => "consume_battery",
            Action::SetFlag { flag, .. } => flag.action_name(),
            Action::RegisterChargingStation { .. } => "register_charging_station",
            Action::UnregisterChargingStation => "unregister_charging_station",
            Action::ComputeClosest(c) => c.kind.action_name(),
        }
    }
}

impl TryFrom<&ActionCall> for Action {
    type Error = ActionError;

    fn try_from(call: &ActionCall) -> Result<Self, Self::Error> {
        Action::parse(&call.name, &call.args)
    }
}

/// Positional argument accessor with diagnostics naming the action and index.
struct Args<'a> {
    action: &'a str,
    terms: &'a [Term],
}

impl<'a> Args<'a> {
    fn arity(&self, expected: usize) -> Result<(), ActionError> {
        if self.terms.len() == expected {
            Ok(())
        } else {
            Err(ActionError::Arity {
                action: self.action.to_string(),
                expected,
                actual: self.terms.len(),
            })
        }
    }

    fn type_error(&self, index: usize, expected: &'static str, found: &Term) -> ActionError {
        ActionError::ArgumentType {
            action: self.action.to_string(),
            index,
            expected,
            found: found.to_string(),
        }
    }

    fn term(&self, index: usize) -> &'a Term {
        &self.terms[index]
    }

    fn int(&self, index: usize) -> Result<i64, ActionError> {
        let term = self.term(index);
        term.as_int().ok_or_else(|| self.type_error(index, "an integer", term))
    }

    fn coordinate(&self, index: usize) -> Result<i32, ActionError> {
        let term = self.term(index);
        self.int(index)
            .and_then(|n| i32::try_from(n).map_err(|_| self.type_error(index, "a 32-bit coordinate", term)))
    }

    fn cell(&self, index: usize) -> Result<Cell, ActionError> {
        Ok(Cell::new(self.coordinate(index)?, self.coordinate(index + 1)?))
    }

    fn amount(&self, index: usize) -> Result<u32, ActionError> {
        let term = self.term(index);
        self.int(index)
            .and_then(|n| u32::try_from(n).map_err(|_| self.type_error(index, "a non-negative integer", term)))
    }

    fn name(&self, index: usize) -> Result<&'a str, ActionError> {
        let term = self.term(index);
        term.as_name().ok_or_else(|| self.type_error(index, "an atom", term))
    }

    fn boolean(&self, index: usize) -> Result<bool, ActionError> {
        let term = self.term(index);
        match term.as_atom() {
            Some("true") => Ok(true),
            Some("false") => Ok(false),
            _ => Err(self.type_error(index, "the atom true or false", term)),
        }
    }

    fn closest(&self, kind: ClosestKind) -> Result<Action, ActionError> {
        self.arity(3)?;
        let list_term = self.term(0);
        let entries = list_term
            .as_list()
            .ok_or_else(|| self.type_error(0, "a list of [name, x, y]", list_term))?;

        let mut candidates = Vec::with_capacity(entries.len());
        for entry in entries {
            let fields = match entry.as_list() {
                Some(fields) if fields.len() == 3 => fields,
                _ => return Err(self.type_error(0, "a list of [name, x, y]", entry)),
            };
            let candidate = Args { action: self.action, terms: fields };
            candidates.push(Candidate {
                name: candidate
                    .name(0)
                    .map_err(|_| self.type_error(0, "a list of [name, x, y]", entry))?
                    .to_string(),
                location: candidate
                    .cell(1)
                    .map_err(|_| self.type_error(0, "a list of [name, x, y]", entry))?,
            });
        }

        Ok(Action::ComputeClosest(ComputeClosest {
            kind,
            candidates,
            origin: self.cell(1)?,
        }))
    }
}
