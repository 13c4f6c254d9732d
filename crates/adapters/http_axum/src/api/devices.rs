//! JSON REST handlers for devices.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};

use aerotech_app::ports::{
    ActuatorStateRepository, DeviceRepository, IdentityProvider, ReadingRepository,
    TargetsRepository, TransitionLog,
};
use aerotech_domain::device::Device;
use aerotech_domain::id::DeviceId;

use crate::auth::resolve_actor;
use crate::error::ApiError;
use crate::state::AppState;

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<Device>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<Device>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/devices`
pub async fn list<AR, LR, TR, RR, DR, IP>(
    State(state): State<AppState<AR, LR, TR, RR, DR, IP>>,
    headers: HeaderMap,
) -> Result<ListResponse, ApiError>
where
    AR: ActuatorStateRepository + Send + Sync + 'static,
    LR: TransitionLog + Send + Sync + 'static,
    TR: TargetsRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    IP: IdentityProvider + Send + Sync + 'static,
{
    resolve_actor(state.identity.as_ref(), &headers).await?;
    let devices = state.device_service.list_devices().await?;
    Ok(ListResponse::Ok(Json(devices)))
}

/// `GET /api/devices/{device_id}`
pub async fn get<AR, LR, TR, RR, DR, IP>(
    State(state): State<AppState<AR, LR, TR, RR, DR, IP>>,
    headers: HeaderMap,
    Path(device_id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    AR: ActuatorStateRepository + Send + Sync + 'static,
    LR: TransitionLog + Send + Sync + 'static,
    TR: TargetsRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    IP: IdentityProvider + Send + Sync + 'static,
{
    resolve_actor(state.identity.as_ref(), &headers).await?;
    let device_id = DeviceId::parse(device_id)?;
    let device = state.device_service.get_device(&device_id).await?;
    Ok(GetResponse::Ok(Json(device)))
}
