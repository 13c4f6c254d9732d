//! `SQLite` implementation of [`ActuatorStateRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use aerotech_app::ports::ActuatorStateRepository;
use aerotech_domain::actuator::Mode;
use aerotech_domain::actuator_state::ActuatorState;
use aerotech_domain::error::AeroTechError;
use aerotech_domain::id::{ActorId, DeviceId};
use aerotech_domain::time::parse_rfc3339;

use crate::error::{StorageError, decode_error};

/// Wrapper for converting database rows into domain types without polluting
/// domain structs with database concerns.
struct Wrapper(ActuatorState);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let device_id: String = row.try_get("device_id")?;
        let pump_power: bool = row.try_get("pump_power")?;
        let fan_power: bool = row.try_get("fan_power")?;
        let pump_mode: String = row.try_get("pump_mode")?;
        let fan_mode: String = row.try_get("fan_mode")?;
        let updated_by: uuid::Uuid = row.try_get("updated_by")?;
        let updated_at: String = row.try_get("updated_at")?;

        Ok(Self(ActuatorState {
            device_id: DeviceId::parse(device_id).map_err(decode_error)?,
            pump_power,
            fan_power,
            pump_mode: pump_mode.parse::<Mode>().map_err(decode_error)?,
            fan_mode: fan_mode.parse::<Mode>().map_err(decode_error)?,
            updated_by: ActorId::from_uuid(updated_by),
            updated_at: parse_rfc3339(&updated_at).map_err(decode_error)?,
        }))
    }
}

const SELECT_BY_DEVICE: &str = "SELECT * FROM actuator_state WHERE device_id = ?";

// The whole row is written in one statement keyed by device id; the
// returned row is what the caller reports back.
const UPSERT: &str = r"
    INSERT INTO actuator_state (device_id, pump_power, fan_power, pump_mode, fan_mode, updated_by, updated_at)
    VALUES (?, ?, ?, ?, ?, ?, ?)
    ON CONFLICT(device_id) DO UPDATE SET
        pump_power = excluded.pump_power,
        fan_power = excluded.fan_power,
        pump_mode = excluded.pump_mode,
        fan_mode = excluded.fan_mode,
        updated_by = excluded.updated_by,
        updated_at = excluded.updated_at
    RETURNING *
";

/// `SQLite`-backed actuator state repository.
pub struct SqliteActuatorStateRepository {
    pool: SqlitePool,
}

impl SqliteActuatorStateRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ActuatorStateRepository for SqliteActuatorStateRepository {
    async fn get(&self, device_id: &DeviceId) -> Result<Option<ActuatorState>, AeroTechError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_DEVICE)
            .bind(device_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|w| w.0))
    }

    async fn upsert(&self, state: ActuatorState) -> Result<ActuatorState, AeroTechError> {
        let row: Wrapper = sqlx::query_as(UPSERT)
            .bind(state.device_id.as_str())
            .bind(state.pump_power)
            .bind(state.fan_power)
            .bind(state.pump_mode.as_str())
            .bind(state.fan_mode.as_str())
            .bind(state.updated_by.as_uuid())
            .bind(state.updated_at.to_rfc3339())
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.0)
    }
}
