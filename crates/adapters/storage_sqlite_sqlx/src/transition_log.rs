//! `SQLite` implementation of [`TransitionLog`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use aerotech_app::ports::TransitionLog;
use aerotech_domain::actuator_state::ActuatorState;
use aerotech_domain::error::AeroTechError;
use aerotech_domain::id::{ActorId, DeviceId, TransitionId};
use aerotech_domain::time::parse_rfc3339;
use aerotech_domain::transition::TransitionLogEntry;

use crate::error::{StorageError, decode_error};

struct Wrapper(TransitionLogEntry);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: uuid::Uuid = row.try_get("id")?;
        let device_id: String = row.try_get("device_id")?;
        let event: String = row.try_get("event")?;
        let prev_state: Option<String> = row.try_get("prev_state")?;
        let new_state: String = row.try_get("new_state")?;
        let actor: uuid::Uuid = row.try_get("actor")?;
        let created_at: String = row.try_get("created_at")?;

        let previous_state: Option<ActuatorState> = prev_state
            .map(|json| serde_json::from_str(&json))
            .transpose()
            .map_err(decode_error)?;
        let new_state: ActuatorState = serde_json::from_str(&new_state).map_err(decode_error)?;

        Ok(Self(TransitionLogEntry {
            id: TransitionId::from_uuid(id),
            device_id: DeviceId::parse(device_id).map_err(decode_error)?,
            event,
            previous_state,
            new_state,
            actor: ActorId::from_uuid(actor),
            created_at: parse_rfc3339(&created_at).map_err(decode_error)?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO actuator_logs (id, device_id, event, prev_state, new_state, actor, created_at)
    VALUES (?, ?, ?, ?, ?, ?, ?)
";

// rowid breaks ties between entries sharing a timestamp.
const SELECT_BY_DEVICE: &str = r"
    SELECT * FROM actuator_logs
    WHERE device_id = ?
    ORDER BY created_at DESC, rowid DESC
    LIMIT ?
";

/// `SQLite`-backed, append-only transition log.
pub struct SqliteTransitionLog {
    pool: SqlitePool,
}

impl SqliteTransitionLog {
    /// Create a new log using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl TransitionLog for SqliteTransitionLog {
    async fn append(&self, entry: TransitionLogEntry) -> Result<TransitionLogEntry, AeroTechError> {
        let prev_json = entry
            .previous_state
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(StorageError::from)?;
        let new_json = serde_json::to_string(&entry.new_state).map_err(StorageError::from)?;

        sqlx::query(INSERT)
            .bind(entry.id.as_uuid())
            .bind(entry.device_id.as_str())
            .bind(&entry.event)
            .bind(prev_json)
            .bind(new_json)
            .bind(entry.actor.as_uuid())
            .bind(entry.created_at.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(entry)
    }

    async fn list_for_device(
        &self,
        device_id: &DeviceId,
        limit: usize,
    ) -> Result<Vec<TransitionLogEntry>, AeroTechError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_DEVICE)
            .bind(device_id.as_str())
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }
}
