//! Ingestion handlers: wire payload → validated event → broker.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use smarthub_app::ports::{ScenarioRepository, SensorRepository, TelemetryPublisher};
use smarthub_domain::error::ValidationError;
use smarthub_domain::hub_event::{HubEvent, HubEventEnvelope, HubEventPayload};
use smarthub_domain::sensor::{SensorEvent, SensorEventEnvelope};

use crate::error::ApiError;
use crate::state::AppState;

/// Possible responses from the ingestion endpoints.
pub enum IngestResponse {
    Accepted,
}

impl IntoResponse for IngestResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Accepted => StatusCode::ACCEPTED.into_response(),
        }
    }
}

/// `POST /api/events/sensors`: publish one sensor reading.
#[tracing::instrument(skip_all)]
pub async fn ingest_sensor<S, R, T>(
    State(state): State<AppState<S, R, T>>,
    Json(envelope): Json<SensorEventEnvelope>,
) -> Result<IngestResponse, ApiError>
where
    S: ScenarioRepository + Send + Sync + 'static,
    R: SensorRepository + Send + Sync + 'static,
    T: TelemetryPublisher + Send + Sync + 'static,
{
    let event = SensorEvent::try_from(envelope)?;
    tracing::debug!(hub_id = %event.hub_id, sensor_id = %event.sensor_id, kind = event.payload.kind(), "sensor event received");
    state.telemetry.publish_sensor_event(event).await?;
    Ok(IngestResponse::Accepted)
}

/// `POST /api/events/hubs`: publish one hub topology event.
#[tracing::instrument(skip_all)]
pub async fn ingest_hub<S, R, T>(
    State(state): State<AppState<S, R, T>>,
    Json(envelope): Json<HubEventEnvelope>,
) -> Result<IngestResponse, ApiError>
where
    S: ScenarioRepository + Send + Sync + 'static,
    R: SensorRepository + Send + Sync + 'static,
    T: TelemetryPublisher + Send + Sync + 'static,
{
    let event = HubEvent::try_from(envelope)?;
    if let HubEventPayload::ScenarioAdded { name, .. } | HubEventPayload::ScenarioRemoved { name } =
        &event.payload
        && name.trim().is_empty()
    {
        return Err(ValidationError::EmptyName.into());
    }
    tracing::debug!(hub_id = %event.hub_id, kind = event.kind(), "hub event received");
    state.telemetry.publish_hub_event(event).await?;
    Ok(IngestResponse::Accepted)
}
