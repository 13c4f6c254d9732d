//! Change feed: repository decorator that announces committed writes.
//!
//! [`Notifying`] wraps a repository and forwards every call to it. After a
//! write succeeds it publishes the stored row as a [`Change`], so realtime
//! observers see exactly what landed in storage. Services stay unaware of the
//! feed; the composition root decides which repositories are wrapped.

use std::future::Future;

use aerotech_domain::actuator_state::ActuatorState;
use aerotech_domain::error::AeroTechError;
use aerotech_domain::event::Change;
use aerotech_domain::id::DeviceId;
use aerotech_domain::reading::SensorReading;
use aerotech_domain::targets::SystemTargets;

use crate::ports::{ActuatorStateRepository, EventPublisher, ReadingRepository, TargetsRepository};

/// Repository wrapper publishing a [`Change`] after each successful write.
pub struct Notifying<R, P> {
    inner: R,
    publisher: P,
}

impl<R, P> Notifying<R, P> {
    pub fn new(inner: R, publisher: P) -> Self {
        Self { inner, publisher }
    }

    /// The wrapped repository.
    pub fn inner(&self) -> &R {
        &self.inner
    }
}

impl<R, P> Notifying<R, P>
where
    P: EventPublisher + Sync,
{
    async fn announce(&self, change: Change) {
        // A lost notification must never fail a committed write.
        if let Err(err) = self.publisher.publish(change).await {
            tracing::debug!(error = %err, "change notification dropped");
        }
    }
}

impl<R, P> ActuatorStateRepository for Notifying<R, P>
where
    R: ActuatorStateRepository + Sync,
    P: EventPublisher + Sync,
{
    fn get(
        &self,
        device_id: &DeviceId,
    ) -> impl Future<Output = Result<Option<ActuatorState>, AeroTechError>> + Send {
        self.inner.get(device_id)
    }

    async fn upsert(&self, state: ActuatorState) -> Result<ActuatorState, AeroTechError> {
        let written = self.inner.upsert(state).await?;
        self.announce(Change::ActuatorState(written.clone())).await;
        Ok(written)
    }
}

impl<R, P> TargetsRepository for Notifying<R, P>
where
    R: TargetsRepository + Sync,
    P: EventPublisher + Sync,
{
    fn get(
        &self,
        device_id: &DeviceId,
    ) -> impl Future<Output = Result<Option<SystemTargets>, AeroTechError>> + Send {
        self.inner.get(device_id)
    }

    async fn upsert(&self, targets: SystemTargets) -> Result<SystemTargets, AeroTechError> {
        let written = self.inner.upsert(targets).await?;
        self.announce(Change::SystemTargets(written.clone())).await;
        Ok(written)
    }
}

impl<R, P> ReadingRepository for Notifying<R, P>
where
    R: ReadingRepository + Sync,
    P: EventPublisher + Sync,
{
    async fn record(&self, reading: SensorReading) -> Result<SensorReading, AeroTechError> {
        let written = self.inner.record(reading).await?;
        self.announce(Change::SensorReadings(written.clone())).await;
        Ok(written)
    }

    fn latest(
        &self,
        device_id: &DeviceId,
    ) -> impl Future<Output = Result<Option<SensorReading>, AeroTechError>> + Send {
        self.inner.latest(device_id)
    }

    fn recent(
        &self,
        device_id: &DeviceId,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<SensorReading>, AeroTechError>> + Send {
        self.inner.recent(device_id, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_bus::InProcessEventBus;
    use aerotech_domain::actuator::{Actuator, Mode};
    use aerotech_domain::actuator_state::Channel;
    use aerotech_domain::id::ActorId;
    use aerotech_domain::time::now;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct InMemoryStateRepo {
        store: Mutex<HashMap<DeviceId, ActuatorState>>,
        fail: bool,
    }

    impl ActuatorStateRepository for InMemoryStateRepo {
        fn get(
            &self,
            device_id: &DeviceId,
        ) -> impl Future<Output = Result<Option<ActuatorState>, AeroTechError>> + Send {
            let found = self.store.lock().unwrap().get(device_id).cloned();
            async { Ok(found) }
        }

        fn upsert(
            &self,
            state: ActuatorState,
        ) -> impl Future<Output = Result<ActuatorState, AeroTechError>> + Send {
            let result = if self.fail {
                Err(AeroTechError::Storage("disk full".into()))
            } else {
                self.store
                    .lock()
                    .unwrap()
                    .insert(state.device_id.clone(), state.clone());
                Ok(state)
            };
            async { result }
        }
    }

    #[derive(Default)]
    struct InMemoryTargetsRepo {
        store: Mutex<HashMap<DeviceId, SystemTargets>>,
    }

    impl TargetsRepository for InMemoryTargetsRepo {
        fn get(
            &self,
            device_id: &DeviceId,
        ) -> impl Future<Output = Result<Option<SystemTargets>, AeroTechError>> + Send {
            let found = self.store.lock().unwrap().get(device_id).cloned();
            async { Ok(found) }
        }

        fn upsert(
            &self,
            targets: SystemTargets,
        ) -> impl Future<Output = Result<SystemTargets, AeroTechError>> + Send {
            self.store
                .lock()
                .unwrap()
                .insert(targets.device_id.clone(), targets.clone());
            async { Ok(targets) }
        }
    }

    fn device() -> DeviceId {
        DeviceId::parse("aero-01").unwrap()
    }

    fn state() -> ActuatorState {
        ActuatorState::from_channels(
            device(),
            Channel::new(true, Mode::Manual),
            Channel::default(),
            ActorId::new(),
            now(),
        )
    }

    #[tokio::test]
    async fn should_publish_written_row_when_upsert_succeeds() {
        let bus = Arc::new(InProcessEventBus::new(16));
        let mut rx = bus.subscribe();
        let repo = Notifying::new(InMemoryStateRepo::default(), Arc::clone(&bus));

        let written = ActuatorStateRepository::upsert(&repo, state()).await.unwrap();

        assert_eq!(rx.recv().await.unwrap(), Change::ActuatorState(written));
    }

    #[tokio::test]
    async fn should_not_publish_when_upsert_fails() {
        let bus = Arc::new(InProcessEventBus::new(16));
        let mut rx = bus.subscribe();
        let inner = InMemoryStateRepo {
            fail: true,
            ..InMemoryStateRepo::default()
        };
        let repo = Notifying::new(inner, Arc::clone(&bus));

        let result = ActuatorStateRepository::upsert(&repo, state()).await;

        assert!(matches!(result, Err(AeroTechError::Storage(_))));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn should_not_publish_on_reads() {
        let bus = Arc::new(InProcessEventBus::new(16));
        let mut rx = bus.subscribe();
        let repo = Notifying::new(InMemoryStateRepo::default(), Arc::clone(&bus));

        let found = ActuatorStateRepository::get(&repo, &device()).await.unwrap();

        assert!(found.is_none());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn should_publish_targets_change_with_table_name() {
        let bus = Arc::new(InProcessEventBus::new(16));
        let mut rx = bus.subscribe();
        let repo = Notifying::new(InMemoryTargetsRepo::default(), Arc::clone(&bus));

        TargetsRepository::upsert(&repo, SystemTargets::defaults(device()))
            .await
            .unwrap();

        let change = rx.recv().await.unwrap();
        assert!(matches!(change, Change::SystemTargets(_)));
        assert_eq!(change.device_id(), &device());
    }

    #[tokio::test]
    async fn should_leave_other_actuator_channel_in_published_row() {
        let bus = Arc::new(InProcessEventBus::new(16));
        let mut rx = bus.subscribe();
        let repo = Notifying::new(InMemoryStateRepo::default(), Arc::clone(&bus));

        ActuatorStateRepository::upsert(&repo, state()).await.unwrap();

        let Change::ActuatorState(row) = rx.recv().await.unwrap() else {
            panic!("expected actuator_state change");
        };
        assert_eq!(row.channel(Actuator::Fan), Channel::default());
    }
}
