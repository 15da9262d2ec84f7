//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use smarthub_app::ports::{ScenarioRepository, SensorRepository, TelemetryPublisher};

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Nests the API routes under `/api` and includes a [`TraceLayer`] that
/// logs each HTTP request/response using the `tracing` ecosystem.
pub fn build<S, R, T>(state: AppState<S, R, T>) -> Router
where
    S: ScenarioRepository + Send + Sync + 'static,
    R: SensorRepository + Send + Sync + 'static,
    T: TelemetryPublisher + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", crate::api::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
