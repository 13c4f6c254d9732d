//! # aerotech-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the **command gateway** (`POST /api/actuators/command`): resolve
//!   the caller's bearer credential, then hand the command to the reconciler
//! - Serve a JSON API for the read side (actuator state, transition log,
//!   targets, readings, devices) and the telemetry ingest endpoint
//! - Stream committed changes per device as Server-Sent Events
//! - Answer CORS preflights for browser clients on other origins
//!
//! ## Dependency rule
//! Depends on `aerotech-app` (for port traits and services) and
//! `aerotech-domain` (for domain types used in request/response mapping).
//! Never leaks axum types into the domain.

pub mod api;
mod auth;
pub mod error;
pub mod router;
pub mod state;

#[cfg(test)]
mod test_support;
