//! `SQLite` implementation of [`DeviceRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use aerotech_app::ports::DeviceRepository;
use aerotech_domain::device::Device;
use aerotech_domain::error::AeroTechError;
use aerotech_domain::id::DeviceId;
use aerotech_domain::time::now;

use crate::error::{StorageError, decode_error};

/// Wrapper for converting database rows into domain [`Device`].
struct Wrapper(Device);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;

        Ok(Self(Device {
            id: DeviceId::parse(id).map_err(decode_error)?,
            name: row.try_get("name")?,
            secret: row.try_get("secret")?,
        }))
    }
}

// `created_at` is only set on first insert.
const UPSERT: &str = r"
    INSERT INTO devices (id, name, secret, created_at) VALUES (?, ?, ?, ?)
    ON CONFLICT(id) DO UPDATE SET name = excluded.name, secret = excluded.secret
";
const SELECT_BY_ID: &str = "SELECT * FROM devices WHERE id = ?";
const SELECT_ALL: &str = "SELECT * FROM devices ORDER BY id";

/// `SQLite`-backed device repository.
pub struct SqliteDeviceRepository {
    pool: SqlitePool,
}

impl SqliteDeviceRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl DeviceRepository for SqliteDeviceRepository {
    async fn upsert(&self, device: Device) -> Result<Device, AeroTechError> {
        sqlx::query(UPSERT)
            .bind(device.id.as_str())
            .bind(&device.name)
            .bind(&device.secret)
            .bind(now().to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(device)
    }

    async fn get_by_id(&self, id: &DeviceId) -> Result<Option<Device>, AeroTechError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|w| w.0))
    }

    async fn get_all(&self) -> Result<Vec<Device>, AeroTechError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }
}
