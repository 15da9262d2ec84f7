//! JSON API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod events;
#[allow(clippy::missing_errors_doc)]
pub mod hubs;

use axum::Router;
use axum::routing::{get, post};

use smarthub_app::ports::{ScenarioRepository, SensorRepository, TelemetryPublisher};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<S, R, T>() -> Router<AppState<S, R, T>>
where
    S: ScenarioRepository + Send + Sync + 'static,
    R: SensorRepository + Send + Sync + 'static,
    T: TelemetryPublisher + Send + Sync + 'static,
{
    Router::new()
        // Ingestion
        .route("/events/sensors", post(events::ingest_sensor::<S, R, T>))
        .route("/events/hubs", post(events::ingest_hub::<S, R, T>))
        // Queries
        .route("/hubs", get(hubs::list::<S, R, T>))
        .route("/hubs/{hub_id}/snapshot", get(hubs::snapshot::<S, R, T>))
        .route("/hubs/{hub_id}/scenarios", get(hubs::scenarios::<S, R, T>))
        .route("/hubs/{hub_id}/sensors", get(hubs::sensors::<S, R, T>))
}
