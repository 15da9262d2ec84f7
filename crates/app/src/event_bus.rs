//! In-process snapshot bus backed by a tokio broadcast channel.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::broadcast;

use smarthub_domain::error::SmartHubError;
use smarthub_domain::snapshot::HubSnapshot;

use crate::ports::SnapshotPublisher;

/// The snapshot stream between the aggregator and its consumers (the
/// scenario evaluator and the broker forwarder).
///
/// Publishing succeeds even when there are no active subscribers
/// (the snapshot is simply dropped).
pub struct InProcessSnapshotBus {
    sender: broadcast::Sender<Arc<HubSnapshot>>,
}

impl InProcessSnapshotBus {
    /// Create a new bus with the given channel capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to snapshots published *after* this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<HubSnapshot>> {
        self.sender.subscribe()
    }
}

impl SnapshotPublisher for InProcessSnapshotBus {
    fn publish(
        &self,
        snapshot: Arc<HubSnapshot>,
    ) -> impl Future<Output = Result<(), SmartHubError>> + Send {
        // send only fails when nobody listens
        let _ = self.sender.send(snapshot);
        async { Ok(()) }
    }
}
