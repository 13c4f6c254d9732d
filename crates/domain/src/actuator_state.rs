//! Actuator state: the single persisted row per device holding the
//! last-issued power and mode of each actuator.
//!
//! Power flags are "last known / desired", never live hardware truth: under
//! [`Mode::Auto`] an external controller may switch the relay without this
//! row being touched.

use serde::{Deserialize, Serialize};

use crate::actuator::{Actuator, Mode};
use crate::id::{ActorId, DeviceId};
use crate::time::Timestamp;

/// Power and mode of a single actuator.
///
/// The default (`power = false`, `mode = auto`) is what a device without a
/// stored row is assumed to have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Channel {
    pub power: bool,
    pub mode: Mode,
}

impl Channel {
    #[must_use]
    pub fn new(power: bool, mode: Mode) -> Self {
        Self { power, mode }
    }
}

/// The stored actuator row of one device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActuatorState {
    pub device_id: DeviceId,
    pub pump_power: bool,
    pub fan_power: bool,
    pub pump_mode: Mode,
    pub fan_mode: Mode,
    pub updated_by: ActorId,
    pub updated_at: Timestamp,
}

impl ActuatorState {
    /// Assemble a row from both channels and an audit stamp.
    #[must_use]
    pub fn from_channels(
        device_id: DeviceId,
        pump: Channel,
        fan: Channel,
        updated_by: ActorId,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            device_id,
            pump_power: pump.power,
            fan_power: fan.power,
            pump_mode: pump.mode,
            fan_mode: fan.mode,
            updated_by,
            updated_at,
        }
    }

    /// Read one actuator's power and mode.
    #[must_use]
    pub fn channel(&self, actuator: Actuator) -> Channel {
        match actuator {
            Actuator::Pump => Channel::new(self.pump_power, self.pump_mode),
            Actuator::Fan => Channel::new(self.fan_power, self.fan_mode),
        }
    }

    /// Copy of `self` with one actuator's channel replaced.
    ///
    /// The other actuator's fields and the audit stamp are left untouched.
    #[must_use]
    pub fn with_channel(&self, actuator: Actuator, channel: Channel) -> Self {
        let mut next = self.clone();
        match actuator {
            Actuator::Pump => {
                next.pump_power = channel.power;
                next.pump_mode = channel.mode;
            }
            Actuator::Fan => {
                next.fan_power = channel.power;
                next.fan_mode = channel.mode;
            }
        }
        next
    }

    /// Audit label describing what this row says about `actuator`.
    ///
    /// `{actuator}_{mode}`, suffixed with `_on`/`_off` only in manual mode,
    /// e.g. `pump_manual_on` or `fan_auto`.
    #[must_use]
    pub fn event_label(&self, actuator: Actuator) -> String {
        let channel = self.channel(actuator);
        if channel.mode.is_manual() {
            let power = if channel.power { "on" } else { "off" };
            format!("{actuator}_{}_{power}", channel.mode)
        } else {
            format!("{actuator}_{}", channel.mode)
        }
    }
}
