//! Actuator commands and the mode/power reconciliation policy.
//!
//! A [`CommandRequest`] is what arrives over the wire: every field optional,
//! strings unparsed. Converting it into an [`ActuatorCommand`] enforces the
//! required fields; [`ActuatorCommand::apply`] computes the next stored row.

use serde::{Deserialize, Deserializer, Serialize};

use crate::actuator::{Actuator, Mode};
use crate::actuator_state::{ActuatorState, Channel};
use crate::error::ValidationError;
use crate::id::{ActorId, DeviceId};
use crate::time::Timestamp;

/// Raw, unvalidated command as submitted by a client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRequest {
    #[serde(default)]
    pub device_id: Option<String>,
    #[serde(default)]
    pub actuator: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default, deserialize_with = "truthy")]
    pub manual_on: Option<bool>,
}

/// A validated request to put one actuator of one device into a mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActuatorCommand {
    pub device_id: DeviceId,
    pub actuator: Actuator,
    pub mode: Mode,
    /// Desired power under manual mode. Ignored under auto.
    #[serde(default)]
    pub manual_on: bool,
}

impl ActuatorCommand {
    #[must_use]
    pub fn new(device_id: DeviceId, actuator: Actuator, mode: Mode, manual_on: bool) -> Self {
        Self {
            device_id,
            actuator,
            mode,
            manual_on,
        }
    }

    /// Hand `actuator` back to the external controller.
    #[must_use]
    pub fn auto(device_id: DeviceId, actuator: Actuator) -> Self {
        Self::new(device_id, actuator, Mode::Auto, false)
    }

    /// Take manual control of `actuator` and switch it on or off.
    #[must_use]
    pub fn manual(device_id: DeviceId, actuator: Actuator, on: bool) -> Self {
        Self::new(device_id, actuator, Mode::Manual, on)
    }

    /// Next power/mode of the addressed actuator given its current channel.
    ///
    /// Auto keeps the current power; manual forces `manual_on`.
    #[must_use]
    pub fn next_channel(&self, current: Channel) -> Channel {
        match self.mode {
            Mode::Auto => Channel::new(current.power, Mode::Auto),
            Mode::Manual => Channel::new(self.manual_on, Mode::Manual),
        }
    }

    /// Compute the full row to persist after this command.
    ///
    /// The non-addressed actuator is carried over from `prior` verbatim, or
    /// defaulted to off/auto when the device has no row yet.
    #[must_use]
    pub fn apply(
        &self,
        prior: Option<&ActuatorState>,
        actor: ActorId,
        at: Timestamp,
    ) -> ActuatorState {
        let base = match prior {
            Some(row) => ActuatorState {
                device_id: self.device_id.clone(),
                updated_by: actor,
                updated_at: at,
                ..row.clone()
            },
            None => ActuatorState::from_channels(
                self.device_id.clone(),
                Channel::default(),
                Channel::default(),
                actor,
                at,
            ),
        };
        let current = base.channel(self.actuator);
        base.with_channel(self.actuator, self.next_channel(current))
    }
}

impl TryFrom<CommandRequest> for ActuatorCommand {
    type Error = ValidationError;

    fn try_from(request: CommandRequest) -> Result<Self, Self::Error> {
        let device_id = required(request.device_id, "device_id")?;
        let actuator = required(request.actuator, "actuator")?;
        let mode = required(request.mode, "mode")?;

        Ok(Self {
            device_id: DeviceId::parse(device_id)?,
            actuator: actuator.parse()?,
            mode: mode.parse()?,
            manual_on: request.manual_on.unwrap_or(false),
        })
    }
}

impl From<ActuatorCommand> for CommandRequest {
    fn from(command: ActuatorCommand) -> Self {
        Self {
            device_id: Some(command.device_id.into()),
            actuator: Some(command.actuator.as_str().to_string()),
            mode: Some(command.mode.as_str().to_string()),
            manual_on: Some(command.manual_on),
        }
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ValidationError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(ValidationError::MissingField(field))
}

/// Accept any JSON scalar for `manual_on` and coerce it to a boolean:
/// numbers are true unless zero, strings unless empty, containers always.
fn truthy<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| match value {
        serde_json::Value::Null => None,
        serde_json::Value::Bool(b) => Some(b),
        serde_json::Value::Number(n) => Some(n.as_f64().is_some_and(|f| f != 0.0)),
        serde_json::Value::String(s) => Some(!s.is_empty()),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => Some(true),
    }))
}
