//! RoboFactory Runtime Prelude - convenient imports for common usage.
//!
//! ```rust
//! use robofactory_runtime::prelude::*;
//! ```

// Re-export the simulation facade
pub use crate::simulation::{Simulation, SimulationConfig};
pub use crate::shared::SharedSimulation;

// Re-export world components
pub use crate::grid::{GridState, DELIVERY_LOCATION, TRUCK_LOCATION};
pub use crate::registry::AgentRegistry;
pub use crate::movement::{Movement, MovementResolver};
pub use crate::notify::{NotificationHub, SubscriptionId};
pub use crate::percept::{Percept, PerceptStore};
pub use crate::snapshot::{AgentSnapshot, WorldSnapshot};

// Re-export stock observers
pub use crate::recorder::{EventRecorder, TracingObserver};

// Re-export from core
pub use robofactory_core::prelude::*;
