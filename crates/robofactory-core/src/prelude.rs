//! RoboFactory Core Prelude - convenient imports for common usage.
//!
//! ```rust
//! use robofactory_core::prelude::*;
//! ```

// Grid and identity types
pub use crate::types::{
    AgentId, Cell,
    Landmark, LandmarkSet,
    id_of, name_of,
    GRID_SIZE, UNKNOWN_ID, UNKNOWN_NAME,
};

// Agents and robot state
pub use crate::agent::{
    Agent, AgentKind,
    Battery, DeliveryRobot,
    DisplayStatus, RobotStatus, StatusFlag,
};

// Actions and their arguments
pub use crate::action::{Action, Candidate, ClosestKind, ComputeClosest, InitRobot, MoveTowards};
pub use crate::term::{ActionCall, Term};

// Observer capability
pub use crate::observer::{ModelEvent, ModelObserver};

// Error types
pub use crate::error::{ActionError, ParseError, Result, SimError};
