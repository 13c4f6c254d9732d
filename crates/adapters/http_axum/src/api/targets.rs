//! JSON REST handlers for operator targets.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use aerotech_app::ports::{
    ActuatorStateRepository, DeviceRepository, IdentityProvider, ReadingRepository,
    TargetsRepository, TransitionLog,
};
use aerotech_domain::error::ValidationError;
use aerotech_domain::id::DeviceId;
use aerotech_domain::targets::{SystemTargets, WaterLevel};

use crate::auth::resolve_actor;
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for replacing the targets of a device.
#[derive(Debug, Deserialize)]
pub struct UpdateTargetsRequest {
    pub ph_target: f64,
    pub tds_target: f64,
    pub temp_target: f64,
    #[serde(default)]
    pub water_level_target: WaterLevel,
}

/// Possible responses from the targets endpoints.
pub enum TargetsResponse {
    Ok(Json<SystemTargets>),
}

impl IntoResponse for TargetsResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/devices/{device_id}/targets`
///
/// Answers with the factory defaults when nothing was saved yet.
pub async fn get<AR, LR, TR, RR, DR, IP>(
    State(state): State<AppState<AR, LR, TR, RR, DR, IP>>,
    headers: HeaderMap,
    Path(device_id): Path<String>,
) -> Result<TargetsResponse, ApiError>
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
    let targets = state.targets_service.get(&device_id).await?;
    Ok(TargetsResponse::Ok(Json(targets)))
}

/// `PUT /api/devices/{device_id}/targets`
pub async fn update<AR, LR, TR, RR, DR, IP>(
    State(state): State<AppState<AR, LR, TR, RR, DR, IP>>,
    headers: HeaderMap,
    Path(device_id): Path<String>,
    body: Result<Json<UpdateTargetsRequest>, JsonRejection>,
) -> Result<TargetsResponse, ApiError>
where
    AR: ActuatorStateRepository + Send + Sync + 'static,
    LR: TransitionLog + Send + Sync + 'static,
    TR: TargetsRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    IP: IdentityProvider + Send + Sync + 'static,
{
    let actor = resolve_actor(state.identity.as_ref(), &headers).await?;
    let device_id = DeviceId::parse(device_id)?;
    let Json(req) =
        body.map_err(|rejection| ValidationError::MalformedRequest(rejection.body_text()))?;

    let targets = SystemTargets {
        ph_target: req.ph_target,
        tds_target: req.tds_target,
        temp_target: req.temp_target,
        water_level_target: req.water_level_target,
        ..SystemTargets::defaults(device_id)
    };
    let written = state.targets_service.update(targets, Some(actor)).await?;
    Ok(TargetsResponse::Ok(Json(written)))
}
