//! Shared application state for axum handlers.

use std::sync::Arc;

use smarthub_app::ports::{ScenarioRepository, SensorRepository, TelemetryPublisher};
use smarthub_app::services::hub_event_service::HubEventService;
use smarthub_app::snapshot_store::SnapshotStore;

/// Application state shared across all axum handlers.
///
/// Generic over the scenario repository, sensor repository and telemetry
/// publisher to avoid dynamic dispatch. `Clone` is implemented manually so
/// the underlying types themselves do not need to be `Clone`.
pub struct AppState<S, R, T> {
    /// Scenario directory and sensor roster queries.
    pub hub_events: Arc<HubEventService<S, R>>,
    /// Live hub snapshots.
    pub snapshots: Arc<SnapshotStore>,
    /// Forwards ingested events onto the broker.
    pub telemetry: Arc<T>,
}

impl<S, R, T> Clone for AppState<S, R, T> {
    fn clone(&self) -> Self {
        Self {
            hub_events: Arc::clone(&self.hub_events),
            snapshots: Arc::clone(&self.snapshots),
            telemetry: Arc::clone(&self.telemetry),
        }
    }
}

impl<S, R, T> AppState<S, R, T>
where
    S: ScenarioRepository + Send + Sync + 'static,
    R: SensorRepository + Send + Sync + 'static,
    T: TelemetryPublisher + Send + Sync + 'static,
{
    /// Create the state from components shared with the background loops.
    pub fn new(
        hub_events: Arc<HubEventService<S, R>>,
        snapshots: Arc<SnapshotStore>,
        telemetry: Arc<T>,
    ) -> Self {
        Self {
            hub_events,
            snapshots,
            telemetry,
        }
    }
}
