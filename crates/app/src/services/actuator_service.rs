//! Actuator service: the command reconciler and the actuator read side.

use aerotech_domain::actuator_state::ActuatorState;
use aerotech_domain::command::{ActuatorCommand, CommandRequest};
use aerotech_domain::error::{AeroTechError, AuthError, NotFoundError};
use aerotech_domain::id::{ActorId, DeviceId};
use aerotech_domain::time::now;
use aerotech_domain::transition::TransitionLogEntry;

use crate::ports::{ActuatorStateRepository, TransitionLog};

/// Outcome of an accepted command.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    /// The row exactly as written by this command.
    pub state: ActuatorState,
    /// Set when the state was committed but the audit entry could not be
    /// appended.
    pub log_warning: Option<String>,
}

/// Turns operator commands into persisted actuator state plus an audit trail.
pub struct ActuatorService<AR, LR> {
    states: AR,
    log: LR,
}

impl<AR, LR> ActuatorService<AR, LR>
where
    AR: ActuatorStateRepository,
    LR: TransitionLog,
{
    pub fn new(states: AR, log: LR) -> Self {
        Self { states, log }
    }

    /// Apply one command for `actor`.
    ///
    /// Reads the latest row, computes the next one for the addressed actuator
    /// only, upserts it and appends a transition entry. A failed append does
    /// not undo the write; its message comes back as
    /// [`Reconciliation::log_warning`].
    ///
    /// # Errors
    ///
    /// - [`AeroTechError::Auth`] when `actor` is absent
    /// - [`AeroTechError::Validation`] for missing or unknown fields
    /// - [`AeroTechError::Storage`] when the read or upsert fails
    ///
    /// Nothing is written in any of these cases.
    #[tracing::instrument(skip(self, request), fields(device_id = ?request.device_id, actuator = ?request.actuator))]
    pub async fn reconcile(
        &self,
        request: CommandRequest,
        actor: Option<ActorId>,
    ) -> Result<Reconciliation, AeroTechError> {
        let actor = actor.ok_or(AuthError::MissingActor)?;
        let command = ActuatorCommand::try_from(request)?;

        let prior = self.states.get(&command.device_id).await?;
        let next = command.apply(prior.as_ref(), actor, now());
        let written = self.states.upsert(next).await?;

        tracing::info!(
            device_id = %written.device_id,
            actuator = %command.actuator,
            mode = %command.mode,
            %actor,
            "actuator command applied"
        );

        let entry = TransitionLogEntry::record(command.actuator, prior, written.clone());
        let log_warning = match self.log.append(entry).await {
            Ok(_) => None,
            Err(err) => {
                tracing::warn!(device_id = %written.device_id, error = %err, "transition log append failed");
                Some(err.to_string())
            }
        };

        Ok(Reconciliation {
            state: written,
            log_warning,
        })
    }

    /// Current row of a device.
    ///
    /// # Errors
    ///
    /// Returns [`AeroTechError::NotFound`] when the device never received a
    /// command, or a storage error.
    #[tracing::instrument(skip(self))]
    pub async fn current_state(&self, device_id: &DeviceId) -> Result<ActuatorState, AeroTechError> {
        self.states.get(device_id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Actuator state",
                id: device_id.to_string(),
            }
            .into()
        })
    }

    /// Transition log of a device, newest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the log.
    pub async fn history(
        &self,
        device_id: &DeviceId,
        limit: usize,
    ) -> Result<Vec<TransitionLogEntry>, AeroTechError> {
        self.log.list_for_device(device_id, limit).await
    }
}
