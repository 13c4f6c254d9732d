//! Device: a provisioned aeroponics controller that pushes telemetry.

use serde::{Deserialize, Serialize};

use crate::error::{AeroTechError, ValidationError};
use crate::id::DeviceId;

/// A controller known to the hub.
///
/// The ingest `secret` is never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    pub name: String,
    #[serde(skip_serializing, default)]
    pub secret: String,
}

impl Device {
    /// Create a builder for constructing a [`Device`].
    #[must_use]
    pub fn builder() -> DeviceBuilder {
        DeviceBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`AeroTechError::Validation`] when `name` or `secret` is empty.
    pub fn validate(&self) -> Result<(), AeroTechError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        if self.secret.is_empty() {
            return Err(ValidationError::EmptySecret.into());
        }
        Ok(())
    }

    /// Compare a presented ingest token against the stored secret without
    /// short-circuiting on the first differing byte.
    #[must_use]
    pub fn accepts_secret(&self, presented: &str) -> bool {
        let expected = self.secret.as_bytes();
        let presented = presented.as_bytes();
        if expected.is_empty() || expected.len() != presented.len() {
            return false;
        }
        expected
            .iter()
            .zip(presented)
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

/// Step-by-step builder for [`Device`].
#[derive(Debug, Default)]
pub struct DeviceBuilder {
    id: Option<String>,
    name: Option<String>,
    secret: Option<String>,
}

impl DeviceBuilder {
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    /// Consume the builder, validate, and return a [`Device`].
    ///
    /// # Errors
    ///
    /// Returns [`AeroTechError::Validation`] if the id, name or secret is
    /// missing or empty.
    pub fn build(self) -> Result<Device, AeroTechError> {
        let device = Device {
            id: DeviceId::parse(self.id.unwrap_or_default())?,
            name: self.name.unwrap_or_default(),
            secret: self.secret.unwrap_or_default(),
        };
        device.validate()?;
        Ok(device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device() -> Device {
        Device::builder()
            .id("aero-01")
            .name("Greenhouse tower")
            .secret("s3cret")
            .build()
            .unwrap()
    }

    #[test]
    fn should_build_valid_device() {
        let d = device();
        assert_eq!(d.id.as_str(), "aero-01");
        assert_eq!(d.name, "Greenhouse tower");
    }

    #[test]
    fn should_reject_missing_id() {
        let result = Device::builder().name("x").secret("y").build();
        assert!(matches!(
            result,
            Err(AeroTechError::Validation(ValidationError::MissingField(
                "device_id"
            )))
        ));
    }

    #[test]
    fn should_reject_empty_name() {
        let result = Device::builder().id("aero-01").secret("y").build();
        assert!(matches!(
            result,
            Err(AeroTechError::Validation(ValidationError::EmptyName))
        ));
    }

    #[test]
    fn should_reject_empty_secret() {
        let result = Device::builder().id("aero-01").name("x").build();
        assert!(matches!(
            result,
            Err(AeroTechError::Validation(ValidationError::EmptySecret))
        ));
    }

    #[test]
    fn should_accept_matching_secret_only() {
        let d = device();
        assert!(d.accepts_secret("s3cret"));
        assert!(!d.accepts_secret("s3creT"));
        assert!(!d.accepts_secret("s3cret-longer"));
        assert!(!d.accepts_secret(""));
    }

    #[test]
    fn should_not_serialize_secret() {
        let json = serde_json::to_value(device()).unwrap();
        assert!(json.get("secret").is_none());
        assert_eq!(json["id"], "aero-01");
    }
}
