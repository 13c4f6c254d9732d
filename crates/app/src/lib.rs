//! # aerotech-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `ActuatorStateRepository`: read and upsert the per-device actuator row
//!   - `TransitionLog`: append & query the audit log
//!   - `TargetsRepository`, `ReadingRepository`, `DeviceRepository`
//!   - `IdentityProvider`: resolve a bearer credential to an actor
//!   - `EventPublisher`: fan out change notifications
//! - Define **driving/inbound ports** as use-case structs:
//!   - `ActuatorService`: the command reconciler
//!   - `TargetsService`, `TelemetryService`, `DeviceService`
//! - Provide **in-process infrastructure** (event bus, change feed) that
//!   doesn't need IO
//!
//! ## Dependency rule
//! Depends on `aerotech-domain` only (plus `tokio::sync` for channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod change_feed;
pub mod event_bus;
pub mod ports;
pub mod services;
