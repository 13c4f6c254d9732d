//! Server-Sent Events (SSE) change feed of one device.

use std::convert::Infallible;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::sse::{Event, KeepAlive, Sse};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;

use aerotech_app::ports::{
    ActuatorStateRepository, DeviceRepository, IdentityProvider, ReadingRepository,
    TargetsRepository, TransitionLog,
};
use aerotech_domain::event::Change;
use aerotech_domain::id::DeviceId;

use crate::auth::resolve_actor;
use crate::error::ApiError;
use crate::state::AppState;

/// `GET /api/devices/{device_id}/stream`
///
/// Subscribes to the change bus and forwards every committed row of this
/// device as a JSON `data:` frame shaped `{"table": …, "row": …}`. The
/// stream continues until the client disconnects or the bus is closed.
#[allow(clippy::missing_errors_doc)]
pub async fn stream<AR, LR, TR, RR, DR, IP>(
    State(state): State<AppState<AR, LR, TR, RR, DR, IP>>,
    headers: HeaderMap,
    Path(device_id): Path<String>,
) -> Result<Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>>, ApiError>
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

    let rx = state.event_bus.subscribe();
    let frames = BroadcastStream::new(rx).filter_map(move |result| match result {
        Ok(change) if change.device_id() == &device_id => frame(&change).map(Ok),
        Ok(_) => None,
        Err(BroadcastStreamRecvError::Lagged(n)) => {
            tracing::warn!(
                skipped = n,
                "SSE subscriber lagged, some changes were dropped"
            );
            None
        }
    });

    Ok(Sse::new(frames).keep_alive(KeepAlive::default()))
}

fn frame(change: &Change) -> Option<Event> {
    match serde_json::to_string(change) {
        Ok(json) => Some(Event::default().data(json)),
        Err(err) => {
            tracing::warn!(%err, "failed to serialize change for SSE stream");
            None
        }
    }
}
