//! Sensor readings pushed by the controller.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{AeroTechError, ValidationError};
use crate::id::{DeviceId, ReadingId};
use crate::targets::WaterLevel;
use crate::time::Timestamp;

/// Raw telemetry as posted by a device. Every measurement is optional, a
/// controller with a failed sensor still reports the others.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadingSubmission {
    #[serde(default)]
    pub device_id: Option<String>,
    #[serde(default)]
    pub ph: Option<f64>,
    #[serde(default)]
    pub tds: Option<f64>,
    #[serde(default)]
    pub temp_c: Option<f64>,
    #[serde(default)]
    pub water_level_code: Option<i64>,
}

/// A stored measurement snapshot.
///
/// Values are kept exactly as the device sent them, out-of-scale ones
/// included. The water level stays a raw firmware code; serialised rows
/// carry both the code and its decoded [`WaterLevel`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SensorReading {
    pub id: ReadingId,
    pub device_id: DeviceId,
    pub recorded_at: Timestamp,
    pub ph: Option<f64>,
    pub tds: Option<f64>,
    pub temp_c: Option<f64>,
    #[serde(default)]
    pub water_level_code: Option<i64>,
}

impl SensorReading {
    /// Stamp a submission from `device_id` with `recorded_at`.
    ///
    /// # Errors
    ///
    /// Returns [`AeroTechError::Validation`] when a measurement is NaN or
    /// infinite.
    pub fn from_submission(
        device_id: DeviceId,
        submission: &ReadingSubmission,
        recorded_at: Timestamp,
    ) -> Result<Self, AeroTechError> {
        for (field, value) in [
            ("ph", submission.ph),
            ("tds", submission.tds),
            ("temp_c", submission.temp_c),
        ] {
            if let Some(value) = value {
                finite(field, value)?;
            }
        }

        Ok(Self {
            id: ReadingId::new(),
            device_id,
            recorded_at,
            ph: submission.ph,
            tds: submission.tds,
            temp_c: submission.temp_c,
            water_level_code: submission.water_level_code,
        })
    }

    /// Water level as displayed; unknown codes read as medium.
    #[must_use]
    pub fn water_level(&self) -> Option<WaterLevel> {
        self.water_level_code.map(WaterLevel::from_code)
    }
}

impl Serialize for SensorReading {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut row = serializer.serialize_struct("SensorReading", 8)?;
        row.serialize_field("id", &self.id)?;
        row.serialize_field("device_id", &self.device_id)?;
        row.serialize_field("recorded_at", &self.recorded_at)?;
        row.serialize_field("ph", &self.ph)?;
        row.serialize_field("tds", &self.tds)?;
        row.serialize_field("temp_c", &self.temp_c)?;
        row.serialize_field("water_level_code", &self.water_level_code)?;
        row.serialize_field("water_level", &self.water_level())?;
        row.end()
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NotFinite(field))
    }
}
