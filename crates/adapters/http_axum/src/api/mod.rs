//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod actuators;
#[allow(clippy::missing_errors_doc)]
pub mod devices;
#[allow(clippy::missing_errors_doc)]
pub mod readings;
pub mod sse;
#[allow(clippy::missing_errors_doc)]
pub mod targets;

use axum::Router;
use axum::routing::{get, post};
use serde::Deserialize;

use aerotech_app::ports::{
    ActuatorStateRepository, DeviceRepository, IdentityProvider, ReadingRepository,
    TargetsRepository, TransitionLog,
};

use crate::state::AppState;

/// Page size used when a list endpoint gets no `limit`.
pub const DEFAULT_LIMIT: usize = 50;
/// Largest page a list endpoint returns.
pub const MAX_LIMIT: usize = 500;

/// `?limit=N` query of the list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

impl LimitQuery {
    /// Requested page size, defaulted and capped.
    #[must_use]
    pub fn resolve(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT)
    }
}

/// Build the `/api` sub-router.
pub fn routes<AR, LR, TR, RR, DR, IP>() -> Router<AppState<AR, LR, TR, RR, DR, IP>>
where
    AR: ActuatorStateRepository + Send + Sync + 'static,
    LR: TransitionLog + Send + Sync + 'static,
    TR: TargetsRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    IP: IdentityProvider + Send + Sync + 'static,
{
    Router::new()
        // Command gateway
        .route(
            "/actuators/command",
            post(actuators::command::<AR, LR, TR, RR, DR, IP>),
        )
        // Telemetry ingest (device secret, not operator token)
        .route("/readings", post(readings::ingest::<AR, LR, TR, RR, DR, IP>))
        // Devices
        .route("/devices", get(devices::list::<AR, LR, TR, RR, DR, IP>))
        .route(
            "/devices/{device_id}",
            get(devices::get::<AR, LR, TR, RR, DR, IP>),
        )
        .route(
            "/devices/{device_id}/actuators",
            get(actuators::current::<AR, LR, TR, RR, DR, IP>),
        )
        .route(
            "/devices/{device_id}/actuators/log",
            get(actuators::log::<AR, LR, TR, RR, DR, IP>),
        )
        .route(
            "/devices/{device_id}/targets",
            get(targets::get::<AR, LR, TR, RR, DR, IP>)
                .put(targets::update::<AR, LR, TR, RR, DR, IP>),
        )
        .route(
            "/devices/{device_id}/readings",
            get(readings::list::<AR, LR, TR, RR, DR, IP>),
        )
        .route(
            "/devices/{device_id}/readings/latest",
            get(readings::latest::<AR, LR, TR, RR, DR, IP>),
        )
        .route(
            "/devices/{device_id}/stream",
            get(sse::stream::<AR, LR, TR, RR, DR, IP>),
        )
}
