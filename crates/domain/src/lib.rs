//! # aerotech-domain
//!
//! Pure domain model for the aerotech aeroponics hub.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define the **actuators** (pump, fan) and their control **modes**
//! - Define the per-device **actuator state** row and the reconciliation
//!   policy that turns a command into the next row
//! - Define the **transition log** entries written for audit
//! - Define **targets** (operator-set ranges) and **sensor readings**
//! - Define **devices** (provisioned controllers that push telemetry)
//! - Define the **change notifications** delivered to realtime observers
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod actuator;
pub mod actuator_state;
pub mod command;
pub mod device;
pub mod event;
pub mod reading;
pub mod targets;
pub mod transition;
