//! Snapshot publisher port: the outbound stream of hub snapshots.

use std::future::Future;
use std::sync::Arc;

use smarthub_domain::error::SmartHubError;
use smarthub_domain::snapshot::HubSnapshot;

/// Publishes every accepted snapshot, keyed by its hub.
pub trait SnapshotPublisher {
    /// Publish a snapshot to all current subscribers.
    fn publish(
        &self,
        snapshot: Arc<HubSnapshot>,
    ) -> impl Future<Output = Result<(), SmartHubError>> + Send;
}

impl<T: SnapshotPublisher + Send + Sync> SnapshotPublisher for Arc<T> {
    fn publish(
        &self,
        snapshot: Arc<HubSnapshot>,
    ) -> impl Future<Output = Result<(), SmartHubError>> + Send {
        (**self).publish(snapshot)
    }
}
