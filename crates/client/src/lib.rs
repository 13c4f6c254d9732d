//! Operator-side half of the actuator subsystem.
//!
//! [`panel::ActuatorPanel`] holds what the dashboard shows and decides which
//! commands a click produces; [`api::CommandClient`] delivers those commands
//! to the hub's command gateway.

pub mod api;
pub mod endpoint;
pub mod panel;

pub use api::{ClientError, CommandClient, CommandOutcome};
pub use endpoint::resolve_endpoint;
pub use panel::{ActuatorControl, ActuatorPanel, SystemStatus};
