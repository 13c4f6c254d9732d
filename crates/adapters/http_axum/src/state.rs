//! Shared application state for axum handlers.

use std::sync::Arc;

use aerotech_app::event_bus::InProcessEventBus;
use aerotech_app::services::actuator_service::ActuatorService;
use aerotech_app::services::device_service::DeviceService;
use aerotech_app::services::targets_service::TargetsService;
use aerotech_app::services::telemetry_service::TelemetryService;

/// Application state shared across all axum handlers.
///
/// Generic over the actuator state repository (`AR`), transition log (`LR`),
/// targets repository (`TR`), reading repository (`RR`), device repository
/// (`DR`) and identity provider (`IP`) to avoid dynamic dispatch.
/// `Clone` is implemented manually so the underlying types themselves do not
/// need to be `Clone`; only the `Arc` wrappers are cloned.
pub struct AppState<AR, LR, TR, RR, DR, IP> {
    /// Command reconciler and actuator read side.
    pub actuator_service: Arc<ActuatorService<AR, LR>>,
    pub targets_service: Arc<TargetsService<TR>>,
    pub telemetry_service: Arc<TelemetryService<RR, DR>>,
    pub device_service: Arc<DeviceService<DR>>,
    /// Resolves operator bearer credentials.
    pub identity: Arc<IP>,
    /// Source of the per-device change feed.
    pub event_bus: Arc<InProcessEventBus>,
}

impl<AR, LR, TR, RR, DR, IP> Clone for AppState<AR, LR, TR, RR, DR, IP> {
    fn clone(&self) -> Self {
        Self {
            actuator_service: Arc::clone(&self.actuator_service),
            targets_service: Arc::clone(&self.targets_service),
            telemetry_service: Arc::clone(&self.telemetry_service),
            device_service: Arc::clone(&self.device_service),
            identity: Arc::clone(&self.identity),
            event_bus: Arc::clone(&self.event_bus),
        }
    }
}

/// Services wired by the composition root, grouped to keep
/// [`AppState::new`] readable.
pub struct Services<AR, LR, TR, RR, DR> {
    pub actuators: ActuatorService<AR, LR>,
    pub targets: TargetsService<TR>,
    pub telemetry: TelemetryService<RR, DR>,
    pub devices: DeviceService<DR>,
}

impl<AR, LR, TR, RR, DR, IP> AppState<AR, LR, TR, RR, DR, IP> {
    /// Create a new application state from service instances.
    pub fn new(
        services: Services<AR, LR, TR, RR, DR>,
        identity: IP,
        event_bus: Arc<InProcessEventBus>,
    ) -> Self {
        Self::from_arcs(
            Arc::new(services.actuators),
            Arc::new(services.targets),
            Arc::new(services.telemetry),
            Arc::new(services.devices),
            Arc::new(identity),
            event_bus,
        )
    }

    /// Create a new application state from pre-wrapped `Arc` services.
    ///
    /// Use this when services need to be shared with other tasks
    /// before constructing the HTTP state.
    pub fn from_arcs(
        actuator_service: Arc<ActuatorService<AR, LR>>,
        targets_service: Arc<TargetsService<TR>>,
        telemetry_service: Arc<TelemetryService<RR, DR>>,
        device_service: Arc<DeviceService<DR>>,
        identity: Arc<IP>,
        event_bus: Arc<InProcessEventBus>,
    ) -> Self {
        Self {
            actuator_service,
            targets_service,
            telemetry_service,
            device_service,
            identity,
            event_bus,
        }
    }
}
