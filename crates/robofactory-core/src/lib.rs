//! # RoboFactory Core
//!
//! Core types shared by every RoboFactory crate:
//!
//! - **Cell / Landmark** - grid coordinates and the landmark bitmask stored per cell
//! - **AgentId** - the fixed name↔ID table of the external protocol
//! - **Agent** - delivery robots, charging stations and the human technician
//! - **Term / Action** - typed action requests coming from the reasoning layer
//! - **ModelObserver** - the notification capability renderers and telemetry implement
//!
//! ## Quick Start
//!
//! ```rust
//! use robofactory_core::prelude::*;
//!
//! let id = AgentId::of("d_bot_3");
//! assert_eq!(id, AgentId(2));
//! assert_eq!(id.name(), "d_bot_3");
//!
//! let call: ActionCall = "move_towards_target(8, 10, 3, 4)".parse().unwrap();
//! let action = Action::try_from(&call).unwrap();
//! assert_eq!(action.name(), "move_towards_target");
//! ```

pub mod types;
pub mod agent;
pub mod observer;
pub mod term;
pub mod action;
pub mod error;
pub mod prelude;
