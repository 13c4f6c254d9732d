//! Storage ports: repository traits for the device-keyed tables.

use std::future::Future;

use aerotech_domain::actuator_state::ActuatorState;
use aerotech_domain::device::Device;
use aerotech_domain::error::AeroTechError;
use aerotech_domain::id::DeviceId;
use aerotech_domain::reading::SensorReading;
use aerotech_domain::targets::SystemTargets;
use aerotech_domain::transition::TransitionLogEntry;

/// The single actuator row per device.
pub trait ActuatorStateRepository {
    /// Read the current row, `None` if the device never received a command.
    fn get(
        &self,
        device_id: &DeviceId,
    ) -> impl Future<Output = Result<Option<ActuatorState>, AeroTechError>> + Send;

    /// Insert or replace the full row keyed by `device_id` in one atomic
    /// statement, returning the row as stored.
    fn upsert(
        &self,
        state: ActuatorState,
    ) -> impl Future<Output = Result<ActuatorState, AeroTechError>> + Send;
}

/// Append-only audit log of actuator transitions.
pub trait TransitionLog {
    /// Persist a new entry.
    fn append(
        &self,
        entry: TransitionLogEntry,
    ) -> impl Future<Output = Result<TransitionLogEntry, AeroTechError>> + Send;

    /// Entries for one device, newest first.
    fn list_for_device(
        &self,
        device_id: &DeviceId,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<TransitionLogEntry>, AeroTechError>> + Send;
}

/// Operator target ranges, one row per device.
pub trait TargetsRepository {
    fn get(
        &self,
        device_id: &DeviceId,
    ) -> impl Future<Output = Result<Option<SystemTargets>, AeroTechError>> + Send;

    /// Insert or replace the row keyed by `device_id`.
    fn upsert(
        &self,
        targets: SystemTargets,
    ) -> impl Future<Output = Result<SystemTargets, AeroTechError>> + Send;
}

/// Time series of sensor readings.
pub trait ReadingRepository {
    fn record(
        &self,
        reading: SensorReading,
    ) -> impl Future<Output = Result<SensorReading, AeroTechError>> + Send;

    /// Most recent reading of a device.
    fn latest(
        &self,
        device_id: &DeviceId,
    ) -> impl Future<Output = Result<Option<SensorReading>, AeroTechError>> + Send;

    /// Readings of a device, newest first.
    fn recent(
        &self,
        device_id: &DeviceId,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<SensorReading>, AeroTechError>> + Send;
}

/// Provisioned devices.
pub trait DeviceRepository {
    /// Insert or update a device by id.
    fn upsert(&self, device: Device) -> impl Future<Output = Result<Device, AeroTechError>> + Send;

    fn get_by_id(
        &self,
        id: &DeviceId,
    ) -> impl Future<Output = Result<Option<Device>, AeroTechError>> + Send;

    fn get_all(&self) -> impl Future<Output = Result<Vec<Device>, AeroTechError>> + Send;
}
