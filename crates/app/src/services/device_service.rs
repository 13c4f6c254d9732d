//! Device service: use-cases for the device registry.

use aerotech_domain::device::Device;
use aerotech_domain::error::{AeroTechError, NotFoundError};
use aerotech_domain::id::DeviceId;

use crate::ports::DeviceRepository;

/// Application service for provisioned devices.
pub struct DeviceService<R> {
    repo: R,
}

impl<R: DeviceRepository> DeviceService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Register a device, or refresh its name and secret if the id is known.
    ///
    /// # Errors
    ///
    /// Returns [`AeroTechError::Validation`] if invariants fail, or a
    /// storage error propagated from the repository.
    #[tracing::instrument(skip(self, device), fields(device_id = %device.id))]
    pub async fn provision(&self, device: Device) -> Result<Device, AeroTechError> {
        device.validate()?;
        self.repo.upsert(device).await
    }

    /// Look up a device by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`AeroTechError::NotFound`] when no device with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get_device(&self, id: &DeviceId) -> Result<Device, AeroTechError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Device",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// List all devices.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_devices(&self) -> Result<Vec<Device>, AeroTechError> {
        self.repo.get_all().await
    }
}
