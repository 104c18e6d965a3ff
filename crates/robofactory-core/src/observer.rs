//! Observer - the notification capability for renderers and telemetry.
//!
//! Observers receive value snapshots (cells and ids) synchronously on the
//! thread that mutated the model. They must not block and must not call
//! back into the simulation from a callback.

use crate::types::{AgentId, Cell};
use serde::{Deserialize, Serialize};

/// Receives model change notifications.
///
/// All methods default to no-ops so implementers only override what they
/// care about.
pub trait ModelObserver: Send {
    /// An agent's state changed without necessarily moving (e.g. a flag flip).
    fn on_agent_updated(&mut self, _location: Cell, _agent: AgentId) {}

    /// An agent moved from one cell to another.
    fn on_agent_moved(&mut self, _from: Cell, _to: Cell, _agent: AgentId) {}

    /// A landmark appeared or disappeared at a cell.
    fn on_cell_updated(&mut self, _location: Cell) {}
}

/// A serializable record of one notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ModelEvent {
    AgentUpdated { location: Cell, agent: AgentId },
    AgentMoved { from: Cell, to: Cell, agent: AgentId },
    CellUpdated { location: Cell },
}

impl ModelEvent {
    /// Replay this event into an observer.
    pub fn deliver(&self, observer: &mut dyn ModelObserver) {
        match *self {
            ModelEvent::AgentUpdated { location, agent } => observer.on_agent_updated(location, agent),
            ModelEvent::AgentMoved { from, to, agent } => observer.on_agent_moved(from, to, agent),
            ModelEvent::CellUpdated { location } => observer.on_cell_updated(location),
        }
    }

    /// The agent this event concerns, if any.
    pub fn agent(&self) -> Option<AgentId> {
        match *self {
            ModelEvent::AgentUpdated { agent, .. } | ModelEvent::AgentMoved { agent, .. } => Some(agent),
            ModelEvent::CellUpdated { .. } => None,
        }
    }
}
