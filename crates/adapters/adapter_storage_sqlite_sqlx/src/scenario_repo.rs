//! `SQLite` implementation of [`ScenarioRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use smarthub_app::ports::ScenarioRepository;
use smarthub_domain::error::SmartHubError;
use smarthub_domain::id::HubId;
use smarthub_domain::scenario::{Action, Condition, Scenario};

use crate::error::StorageError;

struct Wrapper(Scenario);

fn decode_error<E>(err: E) -> sqlx::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    sqlx::Error::Decode(Box::new(err))
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let hub_id: String = row.try_get("hub_id")?;
        let name: String = row.try_get("name")?;
        let conditions_json: String = row.try_get("conditions")?;
        let actions_json: String = row.try_get("actions")?;

        let hub_id = HubId::new(hub_id).map_err(decode_error)?;
        let conditions: Vec<Condition> =
            serde_json::from_str(&conditions_json).map_err(decode_error)?;
        let actions: Vec<Action> = serde_json::from_str(&actions_json).map_err(decode_error)?;

        Ok(Self(Scenario {
            hub_id,
            name,
            conditions,
            actions,
        }))
    }
}

/// `SQLite`-backed scenario directory.
pub struct SqliteScenarioRepository {
    pool: SqlitePool,
}

impl SqliteScenarioRepository {
    /// Create a new repository backed by the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ScenarioRepository for SqliteScenarioRepository {
    async fn find_by_hub(&self, hub_id: &HubId) -> Result<Vec<Scenario>, SmartHubError> {
        let rows: Vec<Wrapper> = sqlx::query_as(
            "SELECT hub_id, name, conditions, actions FROM scenarios WHERE hub_id = ? ORDER BY name",
        )
        .bind(hub_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn upsert(&self, scenario: Scenario) -> Result<Scenario, SmartHubError> {
        let conditions_json =
            serde_json::to_string(&scenario.conditions).map_err(StorageError::from)?;
        let actions_json = serde_json::to_string(&scenario.actions).map_err(StorageError::from)?;

        sqlx::query(
            "INSERT INTO scenarios (hub_id, name, conditions, actions) VALUES (?, ?, ?, ?) \
             ON CONFLICT (hub_id, name) DO UPDATE SET conditions = excluded.conditions, actions = excluded.actions",
        )
        .bind(scenario.hub_id.as_str())
        .bind(&scenario.name)
        .bind(&conditions_json)
        .bind(&actions_json)
        .execute(&self.pool)
        .await
        .map_err(StorageError::from)?;

        Ok(scenario)
    }

    async fn delete(&self, hub_id: &HubId, name: &str) -> Result<(), SmartHubError> {
        sqlx::query("DELETE FROM scenarios WHERE hub_id = ? AND name = ?")
            .bind(hub_id.as_str())
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(())
    }
}
