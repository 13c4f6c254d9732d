//! Telemetry ingest and reading queries.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};

use aerotech_app::ports::{
    ActuatorStateRepository, DeviceRepository, IdentityProvider, ReadingRepository,
    TargetsRepository, TransitionLog,
};
use aerotech_domain::error::ValidationError;
use aerotech_domain::id::DeviceId;
use aerotech_domain::reading::{ReadingSubmission, SensorReading};

use super::LimitQuery;
use crate::auth::{bearer_token, resolve_actor};
use crate::error::ApiError;
use crate::state::AppState;

/// Possible responses from the ingest endpoint.
///
/// Accepted readings answer `200`, which is what deployed controllers
/// check for.
pub enum IngestResponse {
    Ok(Json<SensorReading>),
}

impl IntoResponse for IngestResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the latest-reading endpoint.
pub enum LatestResponse {
    Ok(Json<SensorReading>),
}

impl IntoResponse for LatestResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<SensorReading>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `POST /api/readings`
///
/// Authenticated with the device's ingest secret as bearer token.
pub async fn ingest<AR, LR, TR, RR, DR, IP>(
    State(state): State<AppState<AR, LR, TR, RR, DR, IP>>,
    headers: HeaderMap,
    body: Result<Json<ReadingSubmission>, JsonRejection>,
) -> Result<IngestResponse, ApiError>
where
    AR: ActuatorStateRepository + Send + Sync + 'static,
    LR: TransitionLog + Send + Sync + 'static,
    TR: TargetsRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    IP: IdentityProvider + Send + Sync + 'static,
{
    let Json(submission) =
        body.map_err(|rejection| ValidationError::MalformedRequest(rejection.body_text()))?;
    let reading = state
        .telemetry_service
        .ingest(submission, bearer_token(&headers))
        .await?;
    Ok(IngestResponse::Ok(Json(reading)))
}

/// `GET /api/devices/{device_id}/readings/latest`
pub async fn latest<AR, LR, TR, RR, DR, IP>(
    State(state): State<AppState<AR, LR, TR, RR, DR, IP>>,
    headers: HeaderMap,
    Path(device_id): Path<String>,
) -> Result<LatestResponse, ApiError>
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
    let reading = state.telemetry_service.latest(&device_id).await?;
    Ok(LatestResponse::Ok(Json(reading)))
}

/// `GET /api/devices/{device_id}/readings?limit=N`
pub async fn list<AR, LR, TR, RR, DR, IP>(
    State(state): State<AppState<AR, LR, TR, RR, DR, IP>>,
    headers: HeaderMap,
    Path(device_id): Path<String>,
    Query(query): Query<LimitQuery>,
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
    let device_id = DeviceId::parse(device_id)?;
    let readings = state
        .telemetry_service
        .recent(&device_id, query.resolve())
        .await?;
    Ok(ListResponse::Ok(Json(readings)))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::test_support::{
        DEVICE_SECRET, OPERATOR_TOKEN, get_request, json_request, send, test_app,
    };

    const BODY: &str = r#"{"device_id":"aero-01","ph":6.2,"tds":790,"temp_c":23.1,"water_level_code":0}"#;

    #[tokio::test]
    async fn should_store_reading_when_device_secret_matches() {
        let app = test_app();

        let (status, body) = send(
            &app.router,
            json_request("POST", "/api/readings", Some(DEVICE_SECRET), BODY),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["water_level"], "low");
        assert_eq!(body["water_level_code"], 0);

        let (status, latest) = send(
            &app.router,
            get_request("/api/devices/aero-01/readings/latest", Some(OPERATOR_TOKEN)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(latest["id"], body["id"]);
    }

    #[tokio::test]
    async fn should_store_off_scale_values_as_sent() {
        let app = test_app();

        let (status, body) = send(
            &app.router,
            json_request(
                "POST",
                "/api/readings",
                Some(DEVICE_SECRET),
                r#"{"device_id":"aero-01","ph":-1,"tds":812,"temp_c":23.5,"water_level_code":7}"#,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ph"], -1.0);
        assert_eq!(body["tds"], 812.0);
        assert_eq!(body["water_level_code"], 7);
        assert_eq!(body["water_level"], "medium");
    }

    #[tokio::test]
    async fn should_reject_reading_with_wrong_secret() {
        let app = test_app();

        let (status, body) = send(
            &app.router,
            json_request("POST", "/api/readings", Some("nope"), BODY),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Unauthorized device");
    }

    #[tokio::test]
    async fn should_reject_reading_without_token() {
        let app = test_app();

        let (status, _) = send(
            &app.router,
            json_request("POST", "/api/readings", None, BODY),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn should_return_not_found_when_no_reading_yet() {
        let app = test_app();

        let (status, _) = send(
            &app.router,
            get_request("/api/devices/aero-01/readings/latest", Some(OPERATOR_TOKEN)),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn should_list_readings_newest_first() {
        let app = test_app();
        for _ in 0..3 {
            send(
                &app.router,
                json_request("POST", "/api/readings", Some(DEVICE_SECRET), BODY),
            )
            .await;
        }

        let (status, body) = send(
            &app.router,
            get_request("/api/devices/aero-01/readings?limit=2", Some(OPERATOR_TOKEN)),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);
    }
}
