//! Telemetry service: authenticated ingest and read-back of sensor readings.

use aerotech_domain::error::{AeroTechError, AuthError, NotFoundError, ValidationError};
use aerotech_domain::id::DeviceId;
use aerotech_domain::reading::{ReadingSubmission, SensorReading};
use aerotech_domain::time::now;

use crate::ports::{DeviceRepository, ReadingRepository};

pub struct TelemetryService<RR, DR> {
    readings: RR,
    devices: DR,
}

impl<RR, DR> TelemetryService<RR, DR>
where
    RR: ReadingRepository,
    DR: DeviceRepository,
{
    pub fn new(readings: RR, devices: DR) -> Self {
        Self { readings, devices }
    }

    /// Store a reading pushed by a controller.
    ///
    /// `token` is the device's ingest secret taken from the bearer header.
    ///
    /// # Errors
    ///
    /// - [`AeroTechError::Validation`] when the device id or token is missing,
    ///   or a measurement is invalid
    /// - [`AeroTechError::Auth`] when the device is unknown or the secret
    ///   does not match
    /// - a storage error from either repository
    #[tracing::instrument(skip(self, submission, token), fields(device_id = ?submission.device_id))]
    pub async fn ingest(
        &self,
        submission: ReadingSubmission,
        token: Option<&str>,
    ) -> Result<SensorReading, AeroTechError> {
        let raw_id = submission
            .device_id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .ok_or(ValidationError::MissingField("device_id"))?;
        let token = token
            .filter(|t| !t.is_empty())
            .ok_or(ValidationError::MissingField("token"))?;
        let device_id = DeviceId::parse(raw_id)?;

        let authorized = self
            .devices
            .get_by_id(&device_id)
            .await?
            .is_some_and(|device| device.accepts_secret(token));
        if !authorized {
            tracing::warn!(%device_id, "rejected reading from unauthorized device");
            return Err(AuthError::UnauthorizedDevice.into());
        }

        let reading = SensorReading::from_submission(device_id, &submission, now())?;
        self.readings.record(reading).await
    }

    /// Most recent reading of a device.
    ///
    /// # Errors
    ///
    /// Returns [`AeroTechError::NotFound`] when the device never reported,
    /// or a storage error.
    #[tracing::instrument(skip(self))]
    pub async fn latest(&self, device_id: &DeviceId) -> Result<SensorReading, AeroTechError> {
        self.readings.latest(device_id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Sensor reading",
                id: device_id.to_string(),
            }
            .into()
        })
    }

    /// Readings of a device, newest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn recent(
        &self,
        device_id: &DeviceId,
        limit: usize,
    ) -> Result<Vec<SensorReading>, AeroTechError> {
        self.readings.recent(device_id, limit).await
    }
}
