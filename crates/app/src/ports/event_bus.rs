//! Event bus port: publish/subscribe for change notifications.

use std::future::Future;

use aerotech_domain::error::AeroTechError;
use aerotech_domain::event::Change;

/// Publishes change notifications to interested subscribers.
pub trait EventPublisher {
    /// Publish a change to all current subscribers.
    fn publish(&self, change: Change) -> impl Future<Output = Result<(), AeroTechError>> + Send;
}

impl<T: EventPublisher + Send + Sync> EventPublisher for std::sync::Arc<T> {
    fn publish(&self, change: Change) -> impl Future<Output = Result<(), AeroTechError>> + Send {
        (**self).publish(change)
    }
}
