//! Pool and schema for the scenario directory and the sensor roster.
//!
//! A file URL (`sqlite:smarthub.db`) is created on first start. An
//! in-memory URL (`sqlite::memory:`) gives every [`Config::build`] its own
//! database, shared by all connections of that pool; it only exists while
//! one of those connections is open, so the pool pins one for its lifetime.

use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::error::StorageError;

/// Configuration for the `SQLite` storage adapter.
pub struct Config {
    /// `SQLite` connection URL (e.g. `sqlite:smarthub.db` or `sqlite::memory:`).
    pub database_url: String,
}

impl Config {
    /// Open the pool and bring the `scenarios` and `sensors` tables up to
    /// date.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the URL is invalid, the database cannot
    /// be opened or a migration fails.
    pub async fn build(self) -> Result<Database, StorageError> {
        Database::initialize(&self.database_url).await
    }
}

/// Migrated pool handed to the scenario and sensor repositories.
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    #[tracing::instrument(skip_all, fields(in_memory))]
    async fn initialize(database_url: &str) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        let in_memory = is_in_memory(database_url);
        tracing::Span::current().record("in_memory", in_memory);
        let mut pool_options = SqlitePoolOptions::new();
        if in_memory {
            pool_options = pool_options
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }
        let pool = pool_options.connect_with(options).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::debug!("database migrations applied");

        Ok(Self { pool })
    }

    /// Borrow the underlying connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}
