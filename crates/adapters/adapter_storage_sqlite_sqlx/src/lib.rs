//! # smarthub-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement `ScenarioRepository` and `SensorRepository` from `smarthub-app::ports`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//!
//! ## Dependency rule
//! Depends on `smarthub-app` (for port traits) and `smarthub-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod error;
mod pool;
mod scenario_repo;
mod sensor_repo;

pub use error::StorageError;
pub use pool::{Config, Database};
pub use scenario_repo::SqliteScenarioRepository;
pub use sensor_repo::SqliteSensorRepository;
