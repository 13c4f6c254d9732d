//! Actuators and their control modes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// One of the two switchable actuators of an installation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Actuator {
    Pump,
    Fan,
}

impl Actuator {
    /// Both actuators, pump first.
    pub const ALL: [Self; 2] = [Self::Pump, Self::Fan];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pump => "pump",
            Self::Fan => "fan",
        }
    }

    /// The actuator that is not `self`.
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Self::Pump => Self::Fan,
            Self::Fan => Self::Pump,
        }
    }
}

impl fmt::Display for Actuator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Actuator {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pump" => Ok(Self::Pump),
            "fan" => Ok(Self::Fan),
            other => Err(ValidationError::UnknownActuator(other.to_string())),
        }
    }
}

/// Who decides the actuator's power.
///
/// Under [`Auto`](Self::Auto) an external controller owns the relay; under
/// [`Manual`](Self::Manual) the operator's last toggle does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Auto,
    Manual,
}

impl Mode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Manual => "manual",
        }
    }

    #[must_use]
    pub fn is_manual(self) -> bool {
        matches!(self, Self::Manual)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Self::Auto),
            "manual" => Ok(Self::Manual),
            other => Err(ValidationError::UnknownMode(other.to_string())),
        }
    }
}
