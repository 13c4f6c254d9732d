//! Axum router assembly.

use axum::Router;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method};
use axum::routing::get;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use aerotech_app::ports::{
    ActuatorStateRepository, DeviceRepository, IdentityProvider, ReadingRepository,
    TargetsRepository, TransitionLog,
};

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Nests API routes under `/api` and exposes `/health` at the root.
/// Includes a [`TraceLayer`] that logs each HTTP request/response at the
/// `DEBUG` level, and a CORS layer that echoes the caller's origin.
pub fn build<AR, LR, TR, RR, DR, IP>(state: AppState<AR, LR, TR, RR, DR, IP>) -> Router
where
    AR: ActuatorStateRepository + Send + Sync + 'static,
    LR: TransitionLog + Send + Sync + 'static,
    TR: TargetsRepository + Send + Sync + 'static,
    RR: ReadingRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    IP: IdentityProvider + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", crate::api::routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors())
        .with_state(state)
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
        ])
        .allow_methods([Method::POST, Method::OPTIONS, Method::GET, Method::PUT])
}

async fn health_check() -> &'static str {
    "OK"
}
