//! Read-only hub queries.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};

use smarthub_app::ports::{ScenarioRepository, SensorRepository, TelemetryPublisher};
use smarthub_domain::error::{NotFoundError, SmartHubError};
use smarthub_domain::id::HubId;
use smarthub_domain::scenario::Scenario;
use smarthub_domain::sensor::Sensor;
use smarthub_domain::snapshot::HubSnapshot;

use crate::error::ApiError;
use crate::state::AppState;

/// Possible responses from the hub endpoints.
pub enum HubResponse {
    Hubs(Json<Vec<HubId>>),
    Snapshot(Json<HubSnapshot>),
    Scenarios(Json<Vec<Scenario>>),
    Sensors(Json<Vec<Sensor>>),
}

impl IntoResponse for HubResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Hubs(json) => json.into_response(),
            Self::Snapshot(json) => json.into_response(),
            Self::Scenarios(json) => json.into_response(),
            Self::Sensors(json) => json.into_response(),
        }
    }
}

/// `GET /api/hubs`: hubs that have a snapshot.
pub async fn list<S, R, T>(
    State(state): State<AppState<S, R, T>>,
) -> Result<HubResponse, ApiError>
where
    S: ScenarioRepository + Send + Sync + 'static,
    R: SensorRepository + Send + Sync + 'static,
    T: TelemetryPublisher + Send + Sync + 'static,
{
    Ok(HubResponse::Hubs(Json(state.snapshots.hubs())))
}

/// `GET /api/hubs/{hub_id}/snapshot`
pub async fn snapshot<S, R, T>(
    State(state): State<AppState<S, R, T>>,
    Path(hub_id): Path<String>,
) -> Result<HubResponse, ApiError>
where
    S: ScenarioRepository + Send + Sync + 'static,
    R: SensorRepository + Send + Sync + 'static,
    T: TelemetryPublisher + Send + Sync + 'static,
{
    let hub_id = HubId::new(hub_id)?;
    let snapshot = state.snapshots.get(&hub_id).ok_or_else(|| {
        ApiError::from(SmartHubError::from(NotFoundError {
            entity: "Snapshot",
            id: hub_id.to_string(),
        }))
    })?;
    Ok(HubResponse::Snapshot(Json(snapshot.as_ref().clone())))
}

/// `GET /api/hubs/{hub_id}/scenarios`
pub async fn scenarios<S, R, T>(
    State(state): State<AppState<S, R, T>>,
    Path(hub_id): Path<String>,
) -> Result<HubResponse, ApiError>
where
    S: ScenarioRepository + Send + Sync + 'static,
    R: SensorRepository + Send + Sync + 'static,
    T: TelemetryPublisher + Send + Sync + 'static,
{
    let hub_id = HubId::new(hub_id)?;
    let scenarios = state.hub_events.list_scenarios(&hub_id).await?;
    Ok(HubResponse::Scenarios(Json(scenarios)))
}

/// `GET /api/hubs/{hub_id}/sensors`
pub async fn sensors<S, R, T>(
    State(state): State<AppState<S, R, T>>,
    Path(hub_id): Path<String>,
) -> Result<HubResponse, ApiError>
where
    S: ScenarioRepository + Send + Sync + 'static,
    R: SensorRepository + Send + Sync + 'static,
    T: TelemetryPublisher + Send + Sync + 'static,
{
    let hub_id = HubId::new(hub_id)?;
    let sensors = state.hub_events.list_sensors(&hub_id).await?;
    Ok(HubResponse::Sensors(Json(sensors)))
}
