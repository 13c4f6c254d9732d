//! In-memory port implementations shared by the handler tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use aerotech_app::change_feed::Notifying;
use aerotech_app::event_bus::InProcessEventBus;
use aerotech_app::ports::{
    ActuatorStateRepository, DeviceRepository, IdentityProvider, ReadingRepository,
    TargetsRepository, TransitionLog,
};
use aerotech_app::services::actuator_service::ActuatorService;
use aerotech_app::services::device_service::DeviceService;
use aerotech_app::services::targets_service::TargetsService;
use aerotech_app::services::telemetry_service::TelemetryService;
use aerotech_domain::actuator_state::ActuatorState;
use aerotech_domain::device::Device;
use aerotech_domain::error::{AeroTechError, AuthError};
use aerotech_domain::id::{ActorId, DeviceId};
use aerotech_domain::reading::SensorReading;
use aerotech_domain::targets::SystemTargets;
use aerotech_domain::transition::TransitionLogEntry;

use crate::state::{AppState, Services};

pub const OPERATOR_TOKEN: &str = "operator-token";
pub const DEVICE_SECRET: &str = "s3cret";

#[derive(Default)]
pub struct MemoryStates(Mutex<HashMap<DeviceId, ActuatorState>>);

impl ActuatorStateRepository for MemoryStates {
    async fn get(&self, device_id: &DeviceId) -> Result<Option<ActuatorState>, AeroTechError> {
        Ok(self.0.lock().unwrap().get(device_id).cloned())
    }

    async fn upsert(&self, state: ActuatorState) -> Result<ActuatorState, AeroTechError> {
        self.0
            .lock()
            .unwrap()
            .insert(state.device_id.clone(), state.clone());
        Ok(state)
    }
}

#[derive(Default)]
pub struct MemoryLog {
    entries: Mutex<Vec<TransitionLogEntry>>,
    fail: bool,
}

impl MemoryLog {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

impl TransitionLog for MemoryLog {
    async fn append(&self, entry: TransitionLogEntry) -> Result<TransitionLogEntry, AeroTechError> {
        if self.fail {
            return Err(AeroTechError::Storage("audit table unavailable".into()));
        }
        self.entries.lock().unwrap().push(entry.clone());
        Ok(entry)
    }

    async fn list_for_device(
        &self,
        device_id: &DeviceId,
        limit: usize,
    ) -> Result<Vec<TransitionLogEntry>, AeroTechError> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|e| &e.device_id == device_id)
            .take(limit)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct MemoryTargets(Mutex<HashMap<DeviceId, SystemTargets>>);

impl TargetsRepository for MemoryTargets {
    async fn get(&self, device_id: &DeviceId) -> Result<Option<SystemTargets>, AeroTechError> {
        Ok(self.0.lock().unwrap().get(device_id).cloned())
    }

    async fn upsert(&self, targets: SystemTargets) -> Result<SystemTargets, AeroTechError> {
        self.0
            .lock()
            .unwrap()
            .insert(targets.device_id.clone(), targets.clone());
        Ok(targets)
    }
}

#[derive(Default)]
pub struct MemoryReadings(Mutex<Vec<SensorReading>>);

impl ReadingRepository for MemoryReadings {
    async fn record(&self, reading: SensorReading) -> Result<SensorReading, AeroTechError> {
        self.0.lock().unwrap().push(reading.clone());
        Ok(reading)
    }

    async fn latest(&self, device_id: &DeviceId) -> Result<Option<SensorReading>, AeroTechError> {
        Ok(self
            .0
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|r| &r.device_id == device_id)
            .cloned())
    }

    async fn recent(
        &self,
        device_id: &DeviceId,
        limit: usize,
    ) -> Result<Vec<SensorReading>, AeroTechError> {
        Ok(self
            .0
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|r| &r.device_id == device_id)
            .take(limit)
            .cloned()
            .collect())
    }
}

#[derive(Clone, Default)]
pub struct MemoryDevices(Arc<Mutex<HashMap<DeviceId, Device>>>);

impl DeviceRepository for MemoryDevices {
    async fn upsert(&self, device: Device) -> Result<Device, AeroTechError> {
        self.0
            .lock()
            .unwrap()
            .insert(device.id.clone(), device.clone());
        Ok(device)
    }

    async fn get_by_id(&self, id: &DeviceId) -> Result<Option<Device>, AeroTechError> {
        Ok(self.0.lock().unwrap().get(id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Device>, AeroTechError> {
        let mut all: Vec<_> = self.0.lock().unwrap().values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(all)
    }
}

/// Accepts exactly [`OPERATOR_TOKEN`].
pub struct StaticIdentity(pub ActorId);

impl IdentityProvider for StaticIdentity {
    async fn resolve(&self, credential: &str) -> Result<ActorId, AeroTechError> {
        if credential == OPERATOR_TOKEN {
            Ok(self.0)
        } else {
            Err(AuthError::InvalidCredential.into())
        }
    }
}

pub type TestState = AppState<
    Notifying<MemoryStates, Arc<InProcessEventBus>>,
    MemoryLog,
    Notifying<MemoryTargets, Arc<InProcessEventBus>>,
    Notifying<MemoryReadings, Arc<InProcessEventBus>>,
    MemoryDevices,
    StaticIdentity,
>;

pub struct TestApp {
    pub router: Router,
    pub state: TestState,
    pub actor: ActorId,
}

pub fn device() -> DeviceId {
    DeviceId::parse("aero-01").unwrap()
}

pub fn build_app(log: MemoryLog) -> TestApp {
    let bus = Arc::new(InProcessEventBus::new(64));
    let devices = MemoryDevices::default();
    let actor = ActorId::new();
    devices.0.lock().unwrap().insert(
        device(),
        Device::builder()
            .id("aero-01")
            .name("Tower one")
            .secret(DEVICE_SECRET)
            .build()
            .unwrap(),
    );

    let state = AppState::new(
        Services {
            actuators: ActuatorService::new(
                Notifying::new(MemoryStates::default(), Arc::clone(&bus)),
                log,
            ),
            targets: TargetsService::new(Notifying::new(
                MemoryTargets::default(),
                Arc::clone(&bus),
            )),
            telemetry: TelemetryService::new(
                Notifying::new(MemoryReadings::default(), Arc::clone(&bus)),
                devices.clone(),
            ),
            devices: DeviceService::new(devices),
        },
        StaticIdentity(actor),
        bus,
    );

    TestApp {
        router: crate::router::build(state.clone()),
        state,
        actor,
    }
}

pub fn test_app() -> TestApp {
    build_app(MemoryLog::default())
}

pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response: Response<Body> = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, body)
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}
