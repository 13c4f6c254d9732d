//! Targets: the ranges the operator wants the nutrient solution kept in.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::{AeroTechError, ValidationError};
use crate::id::{ActorId, DeviceId};
use crate::time::Timestamp;

pub const PH_RANGE: RangeInclusive<f64> = 4.0..=8.0;
pub const TDS_RANGE: RangeInclusive<f64> = 0.0..=2000.0;
pub const TEMP_RANGE: RangeInclusive<f64> = 10.0..=35.0;

pub const DEFAULT_PH: f64 = 6.5;
pub const DEFAULT_TDS: f64 = 800.0;
pub const DEFAULT_TEMP: f64 = 24.0;

/// Coarse reservoir level reported by the float switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaterLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl WaterLevel {
    /// Numeric code used by the controller firmware and in storage.
    #[must_use]
    pub fn code(self) -> i64 {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
        }
    }

    /// Decode a firmware code. Anything other than 0 or 2 reads as medium.
    #[must_use]
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::Low,
            2 => Self::High,
            _ => Self::Medium,
        }
    }
}

/// Per-device target ranges. One row per device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemTargets {
    pub device_id: DeviceId,
    pub ph_target: f64,
    pub tds_target: f64,
    pub temp_target: f64,
    pub water_level_target: WaterLevel,
    /// `None` until an operator saves targets for the device.
    pub updated_by: Option<ActorId>,
    pub updated_at: Option<Timestamp>,
}

impl SystemTargets {
    /// Factory targets shown for a device nobody configured yet.
    #[must_use]
    pub fn defaults(device_id: DeviceId) -> Self {
        Self {
            device_id,
            ph_target: DEFAULT_PH,
            tds_target: DEFAULT_TDS,
            temp_target: DEFAULT_TEMP,
            water_level_target: WaterLevel::default(),
            updated_by: None,
            updated_at: None,
        }
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`AeroTechError::Validation`] when a
    /// value is not finite or falls outside its allowed range.
    pub fn validate(&self) -> Result<(), AeroTechError> {
        check("ph_target", self.ph_target, &PH_RANGE)?;
        check("tds_target", self.tds_target, &TDS_RANGE)?;
        check("temp_target", self.temp_target, &TEMP_RANGE)?;
        Ok(())
    }
}

fn check(field: &'static str, value: f64, range: &RangeInclusive<f64>) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite(field));
    }
    if !range.contains(&value) {
        return Err(ValidationError::OutOfRange {
            field,
            min: *range.start(),
            max: *range.end(),
            value,
        });
    }
    Ok(())
}
