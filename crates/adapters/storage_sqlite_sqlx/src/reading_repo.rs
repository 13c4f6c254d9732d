//! `SQLite` implementation of [`ReadingRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use aerotech_app::ports::ReadingRepository;
use aerotech_domain::error::AeroTechError;
use aerotech_domain::id::{DeviceId, ReadingId};
use aerotech_domain::reading::SensorReading;
use aerotech_domain::time::parse_rfc3339;

use crate::error::{StorageError, decode_error};

struct Wrapper(SensorReading);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: uuid::Uuid = row.try_get("id")?;
        let device_id: String = row.try_get("device_id")?;
        let recorded_at: String = row.try_get("recorded_at")?;

        Ok(Self(SensorReading {
            id: ReadingId::from_uuid(id),
            device_id: DeviceId::parse(device_id).map_err(decode_error)?,
            recorded_at: parse_rfc3339(&recorded_at).map_err(decode_error)?,
            ph: row.try_get("ph")?,
            tds: row.try_get("tds")?,
            temp_c: row.try_get("temp_c")?,
            water_level_code: row.try_get("water_level_code")?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO sensor_readings (id, device_id, recorded_at, ph, tds, temp_c, water_level_code)
    VALUES (?, ?, ?, ?, ?, ?, ?)
";

const SELECT_RECENT: &str = r"
    SELECT * FROM sensor_readings
    WHERE device_id = ?
    ORDER BY recorded_at DESC, rowid DESC
    LIMIT ?
";

/// `SQLite`-backed sensor reading repository.
pub struct SqliteReadingRepository {
    pool: SqlitePool,
}

impl SqliteReadingRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch_recent(
        &self,
        device_id: &DeviceId,
        limit: i64,
    ) -> Result<Vec<SensorReading>, AeroTechError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_RECENT)
            .bind(device_id.as_str())
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }
}

impl ReadingRepository for SqliteReadingRepository {
    async fn record(&self, reading: SensorReading) -> Result<SensorReading, AeroTechError> {
        sqlx::query(INSERT)
            .bind(reading.id.as_uuid())
            .bind(reading.device_id.as_str())
            .bind(reading.recorded_at.to_rfc3339())
            .bind(reading.ph)
            .bind(reading.tds)
            .bind(reading.temp_c)
            .bind(reading.water_level_code)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(reading)
    }

    async fn latest(&self, device_id: &DeviceId) -> Result<Option<SensorReading>, AeroTechError> {
        Ok(self.fetch_recent(device_id, 1).await?.into_iter().next())
    }

    async fn recent(
        &self,
        device_id: &DeviceId,
        limit: usize,
    ) -> Result<Vec<SensorReading>, AeroTechError> {
        self.fetch_recent(device_id, i64::try_from(limit).unwrap_or(i64::MAX))
            .await
    }
}
