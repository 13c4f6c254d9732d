//! `SQLite` implementation of [`TargetsRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use aerotech_app::ports::TargetsRepository;
use aerotech_domain::error::AeroTechError;
use aerotech_domain::id::{ActorId, DeviceId};
use aerotech_domain::targets::{SystemTargets, WaterLevel};
use aerotech_domain::time::parse_rfc3339;

use crate::error::{StorageError, decode_error};

struct Wrapper(SystemTargets);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let device_id: String = row.try_get("device_id")?;
        let water_level: i64 = row.try_get("water_level_target")?;
        let updated_by: Option<uuid::Uuid> = row.try_get("updated_by")?;
        let updated_at: Option<String> = row.try_get("updated_at")?;

        Ok(Self(SystemTargets {
            device_id: DeviceId::parse(device_id).map_err(decode_error)?,
            ph_target: row.try_get("ph_target")?,
            tds_target: row.try_get("tds_target")?,
            temp_target: row.try_get("temp_target")?,
            water_level_target: WaterLevel::from_code(water_level),
            updated_by: updated_by.map(ActorId::from_uuid),
            updated_at: updated_at
                .as_deref()
                .map(parse_rfc3339)
                .transpose()
                .map_err(decode_error)?,
        }))
    }
}

const SELECT_BY_DEVICE: &str = "SELECT * FROM system_targets WHERE device_id = ?";

const UPSERT: &str = r"
    INSERT INTO system_targets (device_id, ph_target, tds_target, temp_target, water_level_target, updated_by, updated_at)
    VALUES (?, ?, ?, ?, ?, ?, ?)
    ON CONFLICT(device_id) DO UPDATE SET
        ph_target = excluded.ph_target,
        tds_target = excluded.tds_target,
        temp_target = excluded.temp_target,
        water_level_target = excluded.water_level_target,
        updated_by = excluded.updated_by,
        updated_at = excluded.updated_at
    RETURNING *
";

/// `SQLite`-backed targets repository.
pub struct SqliteTargetsRepository {
    pool: SqlitePool,
}

impl SqliteTargetsRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl TargetsRepository for SqliteTargetsRepository {
    async fn get(&self, device_id: &DeviceId) -> Result<Option<SystemTargets>, AeroTechError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_DEVICE)
            .bind(device_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|w| w.0))
    }

    async fn upsert(&self, targets: SystemTargets) -> Result<SystemTargets, AeroTechError> {
        let row: Wrapper = sqlx::query_as(UPSERT)
            .bind(targets.device_id.as_str())
            .bind(targets.ph_target)
            .bind(targets.tds_target)
            .bind(targets.temp_target)
            .bind(targets.water_level_target.code())
            .bind(targets.updated_by.map(ActorId::as_uuid))
            .bind(targets.updated_at.map(|at| at.to_rfc3339()))
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.0)
    }
}
