//! Telemetry publisher port: puts ingested events onto the message broker.

use std::future::Future;
use std::sync::Arc;

use smarthub_domain::error::SmartHubError;
use smarthub_domain::hub_event::HubEvent;
use smarthub_domain::sensor::SensorEvent;

/// Forwards validated events to the inbound streams.
pub trait TelemetryPublisher {
    /// Publish a sensor reading onto the sensor stream.
    fn publish_sensor_event(
        &self,
        event: SensorEvent,
    ) -> impl Future<Output = Result<(), SmartHubError>> + Send;

    /// Publish a topology change onto the hub stream.
    fn publish_hub_event(
        &self,
        event: HubEvent,
    ) -> impl Future<Output = Result<(), SmartHubError>> + Send;
}

impl<T: TelemetryPublisher + Send + Sync> TelemetryPublisher for Arc<T> {
    fn publish_sensor_event(
        &self,
        event: SensorEvent,
    ) -> impl Future<Output = Result<(), SmartHubError>> + Send {
        (**self).publish_sensor_event(event)
    }

    fn publish_hub_event(
        &self,
        event: HubEvent,
    ) -> impl Future<Output = Result<(), SmartHubError>> + Send {
        (**self).publish_hub_event(event)
    }
}
