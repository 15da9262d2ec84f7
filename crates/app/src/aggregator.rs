//! Snapshot aggregator — folds sensor readings into hub snapshots and
//! publishes every snapshot that changed.

use std::sync::Arc;

use tokio::sync::mpsc;

use smarthub_domain::error::SmartHubError;
use smarthub_domain::sensor::{SensorEvent, SensorEventEnvelope};
use smarthub_domain::snapshot::HubSnapshot;

use crate::ports::SnapshotPublisher;
use crate::snapshot_store::SnapshotStore;

/// Consumes sensor events and drives the [`SnapshotStore`].
pub struct SnapshotAggregator<P> {
    store: Arc<SnapshotStore>,
    publisher: P,
}

impl<P: SnapshotPublisher> SnapshotAggregator<P> {
    pub fn new(store: Arc<SnapshotStore>, publisher: P) -> Self {
        Self { store, publisher }
    }

    /// Validate a wire event and process it.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHubError::Validation`] when `hub_id`, `sensor_id`,
    /// `timestamp` or the payload is missing, or the publisher's error.
    pub async fn accept(
        &self,
        envelope: SensorEventEnvelope,
    ) -> Result<Option<Arc<HubSnapshot>>, SmartHubError> {
        let event = SensorEvent::try_from(envelope)?;
        self.process(event).await
    }

    /// Merge one reading and publish the resulting snapshot if it changed.
    ///
    /// Returns the published snapshot, or `None` when the reading was stale
    /// or repeated the stored payload.
    ///
    /// # Errors
    ///
    /// Returns the publisher's error. The merge itself cannot fail.
    #[tracing::instrument(skip_all, fields(hub_id = %event.hub_id, sensor_id = %event.sensor_id))]
    pub async fn process(
        &self,
        event: SensorEvent,
    ) -> Result<Option<Arc<HubSnapshot>>, SmartHubError> {
        let result = self.store.merge(
            &event.hub_id,
            &event.sensor_id,
            event.timestamp,
            &event.payload,
        );
        if !result.updated {
            return Ok(None);
        }
        self.publisher.publish(Arc::clone(&result.snapshot)).await?;
        tracing::debug!(sensors = result.snapshot.sensors.len(), "snapshot published");
        Ok(Some(result.snapshot))
    }

    /// Consume the sensor stream until every sender is dropped.
    ///
    /// Malformed events are dropped with a warning. The event being
    /// processed when the stream closes is always completed.
    pub async fn run(&self, mut receiver: mpsc::Receiver<SensorEventEnvelope>) {
        while let Some(envelope) = receiver.recv().await {
            match self.accept(envelope).await {
                Ok(_) => {}
                Err(SmartHubError::Validation(err)) => {
                    tracing::warn!(error = %err, "dropping malformed sensor event");
                }
                Err(err) => {
                    tracing::error!(error = %err.chain(), "failed to publish snapshot");
                }
            }
        }
        tracing::info!("sensor stream closed, aggregator stopped");
    }
}
