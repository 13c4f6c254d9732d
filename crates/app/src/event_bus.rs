//! Fan-out of committed table writes to realtime observers.
//!
//! The bus is not partitioned: every [`Change`] reaches every receiver,
//! whichever device it belongs to. Observers scope themselves with
//! [`Change::device_id`], which is how the per-device SSE stream keeps a
//! panel from seeing another device's rows.

use std::future::Future;

use tokio::sync::broadcast;

use aerotech_domain::error::AeroTechError;
use aerotech_domain::event::Change;

use crate::ports::EventPublisher;

/// Broadcasts each change written by the services to all live receivers.
///
/// Nothing is buffered for observers that subscribe later. A receiver that
/// falls more than `capacity` changes behind gets
/// [`broadcast::error::RecvError::Lagged`] and resumes at the oldest change
/// still held.
pub struct InProcessEventBus {
    sender: broadcast::Sender<Change>,
}

impl InProcessEventBus {
    /// `capacity` bounds how far a slow receiver may trail before it lags.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Receiver for changes of every device, starting from the next publish.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Change> {
        self.sender.subscribe()
    }
}

impl EventPublisher for InProcessEventBus {
    fn publish(&self, change: Change) -> impl Future<Output = Result<(), AeroTechError>> + Send {
        // No receivers means no observers; the write itself already happened.
        let _ = self.sender.send(change);
        async { Ok(()) }
    }
}
