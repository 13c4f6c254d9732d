//! Transition log: append-only audit records of accepted actuator commands.

use serde::{Deserialize, Serialize};

use crate::actuator::Actuator;
use crate::actuator_state::ActuatorState;
use crate::id::{ActorId, DeviceId, TransitionId};
use crate::time::Timestamp;

/// One accepted command: the row before it (if any) and the row it wrote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionLogEntry {
    pub id: TransitionId,
    pub device_id: DeviceId,
    /// Derived label such as `pump_manual_on` or `fan_auto`.
    pub event: String,
    pub previous_state: Option<ActuatorState>,
    pub new_state: ActuatorState,
    pub actor: ActorId,
    pub created_at: Timestamp,
}

impl TransitionLogEntry {
    /// Record the transition of `actuator` from `previous` to `written`.
    ///
    /// Device, actor and timestamp are taken from the written row so the
    /// entry and the row share one audit stamp.
    #[must_use]
    pub fn record(
        actuator: Actuator,
        previous: Option<ActuatorState>,
        written: ActuatorState,
    ) -> Self {
        Self {
            id: TransitionId::new(),
            device_id: written.device_id.clone(),
            event: written.event_label(actuator),
            actor: written.updated_by,
            created_at: written.updated_at,
            previous_state: previous,
            new_state: written,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actuator::Mode;
    use crate::actuator_state::Channel;
    use crate::time::now;

    fn row(pump: Channel) -> ActuatorState {
        ActuatorState::from_channels(
            DeviceId::parse("aero-01").unwrap(),
            pump,
            Channel::default(),
            ActorId::new(),
            now(),
        )
    }

    #[test]
    fn should_copy_audit_stamp_from_written_row() {
        let written = row(Channel::new(true, Mode::Manual));
        let entry = TransitionLogEntry::record(Actuator::Pump, None, written.clone());

        assert_eq!(entry.device_id, written.device_id);
        assert_eq!(entry.actor, written.updated_by);
        assert_eq!(entry.created_at, written.updated_at);
        assert_eq!(entry.event, "pump_manual_on");
        assert!(entry.previous_state.is_none());
        assert_eq!(entry.new_state, written);
    }

    #[test]
    fn should_keep_previous_row() {
        let before = row(Channel::default());
        let after = row(Channel::new(false, Mode::Manual));
        let entry = TransitionLogEntry::record(Actuator::Pump, Some(before.clone()), after);

        assert_eq!(entry.previous_state, Some(before));
        assert_eq!(entry.event, "pump_manual_off");
    }

    #[test]
    fn should_serialize_null_previous_state() {
        let entry = TransitionLogEntry::record(Actuator::Fan, None, row(Channel::default()));
        let json = serde_json::to_value(&entry).unwrap();
        assert!(json["previous_state"].is_null());
        assert_eq!(json["event"], "fan_auto");
    }
}
