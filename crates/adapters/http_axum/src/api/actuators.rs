//! Command gateway and actuator read side.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use aerotech_app::ports::{
    ActuatorStateRepository, DeviceRepository, IdentityProvider, ReadingRepository,
    TargetsRepository, TransitionLog,
};
use aerotech_domain::actuator_state::ActuatorState;
use aerotech_domain::command::CommandRequest;
use aerotech_domain::error::ValidationError;
use aerotech_domain::id::DeviceId;
use aerotech_domain::transition::TransitionLogEntry;

use super::LimitQuery;
use crate::auth::resolve_actor;
use crate::error::ApiError;
use crate::state::AppState;

/// Body of a successful command.
#[derive(Debug, Serialize)]
pub struct CommandBody {
    pub state: ActuatorState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_warning: Option<String>,
}

/// Possible responses from the command endpoint.
pub enum CommandResponse {
    Ok(Json<CommandBody>),
}

impl IntoResponse for CommandResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the current-state endpoint.
pub enum CurrentResponse {
    Ok(Json<ActuatorState>),
}

impl IntoResponse for CurrentResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the log endpoint.
pub enum LogResponse {
    Ok(Json<Vec<TransitionLogEntry>>),
}

impl IntoResponse for LogResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `POST /api/actuators/command`
///
/// The credential is checked before the body is looked at, so an
/// unauthenticated caller always gets `401`.
pub async fn command<AR, LR, TR, RR, DR, IP>(
    State(state): State<AppState<AR, LR, TR, RR, DR, IP>>,
    headers: HeaderMap,
    body: Result<Json<CommandRequest>, JsonRejection>,
) -> Result<CommandResponse, ApiError>
where
    AR: ActuatorStateRepository + Send + Sync + 'static,
    LR: TransitionLog + Send + Sync + 'static,
    TR: TargetsRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    IP: IdentityProvider + Send + Sync + 'static,
{
    let actor = resolve_actor(state.identity.as_ref(), &headers).await?;
    let Json(request) =
        body.map_err(|rejection| ValidationError::MalformedRequest(rejection.body_text()))?;

    let outcome = state
        .actuator_service
        .reconcile(request, Some(actor))
        .await?;

    Ok(CommandResponse::Ok(Json(CommandBody {
        state: outcome.state,
        log_warning: outcome.log_warning,
    })))
}

/// `GET /api/devices/{device_id}/actuators`
pub async fn current<AR, LR, TR, RR, DR, IP>(
    State(state): State<AppState<AR, LR, TR, RR, DR, IP>>,
    headers: HeaderMap,
    Path(device_id): Path<String>,
) -> Result<CurrentResponse, ApiError>
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
    let current = state.actuator_service.current_state(&device_id).await?;
    Ok(CurrentResponse::Ok(Json(current)))
}

/// `GET /api/devices/{device_id}/actuators/log?limit=N`
pub async fn log<AR, LR, TR, RR, DR, IP>(
    State(state): State<AppState<AR, LR, TR, RR, DR, IP>>,
    headers: HeaderMap,
    Path(device_id): Path<String>,
    Query(query): Query<LimitQuery>,
) -> Result<LogResponse, ApiError>
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
    let entries = state
        .actuator_service
        .history(&device_id, query.resolve())
        .await?;
    Ok(LogResponse::Ok(Json(entries)))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::test_support::{
        MemoryLog, OPERATOR_TOKEN, build_app, get_request, json_request, send, test_app,
    };

    const URI: &str = "/api/actuators/command";

    #[tokio::test]
    async fn should_apply_command_and_return_written_state() {
        let app = test_app();

        let (status, body) = send(
            &app.router,
            json_request(
                "POST",
                URI,
                Some(OPERATOR_TOKEN),
                r#"{"device_id":"aero-01","actuator":"pump","mode":"manual","manual_on":true}"#,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["state"]["pump_power"], true);
        assert_eq!(body["state"]["pump_mode"], "manual");
        assert_eq!(body["state"]["fan_mode"], "auto");
        assert_eq!(body["state"]["updated_by"], app.actor.to_string());
        assert!(body.get("log_warning").is_none());
    }

    #[tokio::test]
    async fn should_return_unauthorized_when_credential_missing() {
        let app = test_app();

        let (status, body) = send(
            &app.router,
            json_request(
                "POST",
                URI,
                None,
                r#"{"device_id":"aero-01","actuator":"pump","mode":"auto"}"#,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn should_return_unauthorized_when_credential_invalid() {
        let app = test_app();

        let (status, _) = send(
            &app.router,
            json_request(
                "POST",
                URI,
                Some("forged"),
                r#"{"device_id":"aero-01","actuator":"pump","mode":"auto"}"#,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn should_return_bad_request_when_device_id_missing() {
        let app = test_app();

        let (status, body) = send(
            &app.router,
            json_request(
                "POST",
                URI,
                Some(OPERATOR_TOKEN),
                r#"{"actuator":"pump","mode":"manual","manual_on":true}"#,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "missing required field `device_id`");

        let (status, _) = send(
            &app.router,
            get_request("/api/devices/aero-01/actuators", Some(OPERATOR_TOKEN)),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn should_return_bad_request_when_body_is_not_json() {
        let app = test_app();

        let (status, body) = send(
            &app.router,
            json_request("POST", URI, Some(OPERATOR_TOKEN), "{not json"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(
            body["error"]
                .as_str()
                .unwrap()
                .starts_with("malformed request")
        );
    }

    #[tokio::test]
    async fn should_include_log_warning_when_audit_append_fails() {
        let app = build_app(MemoryLog::failing());

        let (status, body) = send(
            &app.router,
            json_request(
                "POST",
                URI,
                Some(OPERATOR_TOKEN),
                r#"{"device_id":"aero-01","actuator":"fan","mode":"manual","manual_on":1}"#,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["state"]["fan_power"], true);
        assert_eq!(body["log_warning"], "audit table unavailable");
    }

    #[tokio::test]
    async fn should_expose_current_state_and_log_after_commands() {
        let app = test_app();
        for body in [
            r#"{"device_id":"aero-01","actuator":"pump","mode":"manual","manual_on":true}"#,
            r#"{"device_id":"aero-01","actuator":"pump","mode":"auto"}"#,
        ] {
            let (status, _) = send(
                &app.router,
                json_request("POST", URI, Some(OPERATOR_TOKEN), body),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }

        let (status, current) = send(
            &app.router,
            get_request("/api/devices/aero-01/actuators", Some(OPERATOR_TOKEN)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(current["pump_power"], true);
        assert_eq!(current["pump_mode"], "auto");

        let (status, log) = send(
            &app.router,
            get_request(
                "/api/devices/aero-01/actuators/log?limit=1",
                Some(OPERATOR_TOKEN),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let entries = log.as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["event"], "pump_auto");
        assert_eq!(entries[0]["previous_state"]["pump_mode"], "manual");
    }

    #[tokio::test]
    async fn should_require_credential_for_state_reads() {
        let app = test_app();

        let (status, _) = send(
            &app.router,
            get_request("/api/devices/aero-01/actuators", None),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
