//! Change notifications: the full row written to a table, as delivered to
//! realtime observers.

use serde::{Deserialize, Serialize};

use crate::actuator_state::ActuatorState;
use crate::id::DeviceId;
use crate::reading::SensorReading;
use crate::targets::SystemTargets;

/// A write to one of the device-keyed tables.
///
/// Serialized as `{"table": "...", "row": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "table", content = "row", rename_all = "snake_case")]
pub enum Change {
    ActuatorState(ActuatorState),
    SystemTargets(SystemTargets),
    SensorReadings(SensorReading),
}

impl Change {
    /// Device the written row belongs to.
    #[must_use]
    pub fn device_id(&self) -> &DeviceId {
        match self {
            Self::ActuatorState(row) => &row.device_id,
            Self::SystemTargets(row) => &row.device_id,
            Self::SensorReadings(row) => &row.device_id,
        }
    }
}
