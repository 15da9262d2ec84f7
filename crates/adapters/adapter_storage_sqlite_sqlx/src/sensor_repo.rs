//! `SQLite` implementation of [`SensorRepository`].

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use smarthub_app::ports::SensorRepository;
use smarthub_domain::error::SmartHubError;
use smarthub_domain::id::{HubId, SensorId};
use smarthub_domain::sensor::{DeviceType, Sensor};

use crate::error::StorageError;

struct Wrapper(Sensor);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let hub_id: String = row.try_get("hub_id")?;
        let device_type: String = row.try_get("device_type")?;

        let id = SensorId::new(id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let hub_id = HubId::new(hub_id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let device_type = DeviceType::from_str(&device_type)
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(Sensor {
            id,
            hub_id,
            device_type,
        }))
    }
}

/// `SQLite`-backed sensor roster.
pub struct SqliteSensorRepository {
    pool: SqlitePool,
}

impl SqliteSensorRepository {
    /// Create a new repository backed by the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl SensorRepository for SqliteSensorRepository {
    async fn register(&self, sensor: Sensor) -> Result<Sensor, SmartHubError> {
        sqlx::query(
            "INSERT INTO sensors (id, hub_id, device_type) VALUES (?, ?, ?) \
             ON CONFLICT (hub_id, id) DO UPDATE SET device_type = excluded.device_type",
        )
        .bind(sensor.id.as_str())
        .bind(sensor.hub_id.as_str())
        .bind(sensor.device_type.as_str())
        .execute(&self.pool)
        .await
        .map_err(StorageError::from)?;
        Ok(sensor)
    }

    async fn remove(&self, hub_id: &HubId, sensor_id: &SensorId) -> Result<(), SmartHubError> {
        sqlx::query("DELETE FROM sensors WHERE hub_id = ? AND id = ?")
            .bind(hub_id.as_str())
            .bind(sensor_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(())
    }

    async fn find_by_hub(&self, hub_id: &HubId) -> Result<Vec<Sensor>, SmartHubError> {
        let rows: Vec<Wrapper> =
            sqlx::query_as("SELECT id, hub_id, device_type FROM sensors WHERE hub_id = ? ORDER BY id")
                .bind(hub_id.as_str())
                .fetch_all(&self.pool)
                .await
                .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(|w| w.0).collect())
    }
}
