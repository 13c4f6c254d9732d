//! Targets service: operator-set ranges per device.

use aerotech_domain::error::{AeroTechError, AuthError};
use aerotech_domain::id::{ActorId, DeviceId};
use aerotech_domain::targets::SystemTargets;
use aerotech_domain::time::now;

use crate::ports::TargetsRepository;

pub struct TargetsService<R> {
    repo: R,
}

impl<R: TargetsRepository> TargetsService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Targets of a device, falling back to the factory defaults when the
    /// operator never saved any.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, device_id: &DeviceId) -> Result<SystemTargets, AeroTechError> {
        Ok(self
            .repo
            .get(device_id)
            .await?
            .unwrap_or_else(|| SystemTargets::defaults(device_id.clone())))
    }

    /// Replace the targets of a device, stamped with `actor` and the current
    /// time.
    ///
    /// # Errors
    ///
    /// Returns [`AeroTechError::Auth`] without an actor,
    /// [`AeroTechError::Validation`] for out-of-range values, or a storage
    /// error.
    #[tracing::instrument(skip(self, targets), fields(device_id = %targets.device_id))]
    pub async fn update(
        &self,
        targets: SystemTargets,
        actor: Option<ActorId>,
    ) -> Result<SystemTargets, AeroTechError> {
        let actor = actor.ok_or(AuthError::MissingActor)?;
        targets.validate()?;

        let stamped = SystemTargets {
            updated_by: Some(actor),
            updated_at: Some(now()),
            ..targets
        };
        let written = self.repo.upsert(stamped).await?;
        tracing::info!(device_id = %written.device_id, %actor, "targets updated");
        Ok(written)
    }
}
