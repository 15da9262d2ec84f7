//! Hub snapshot store — owns the current snapshot of every hub and applies
//! the merge rule atomically per hub.

use std::sync::{Arc, Mutex, PoisonError};

use dashmap::DashMap;

use smarthub_domain::id::{HubId, SensorId};
use smarthub_domain::sensor::SensorPayload;
use smarthub_domain::snapshot::{HubSnapshot, MergeOutcome};
use smarthub_domain::time::Timestamp;

type Slot = Arc<Mutex<Arc<HubSnapshot>>>;

/// Result of [`SnapshotStore::merge`].
#[derive(Debug, Clone)]
pub struct MergeResult {
    /// Whether the reading changed the snapshot.
    pub updated: bool,
    /// The snapshot after the merge (the unchanged one when `updated` is false).
    pub snapshot: Arc<HubSnapshot>,
}

/// In-memory arena of hub snapshots addressed by hub id.
///
/// Every hub has its own slot guarded by its own mutex, so merges for one
/// hub are serialised while merges for different hubs proceed in parallel.
/// Slots hold an `Arc<HubSnapshot>` replaced wholesale on every accepted
/// merge: readers always get a complete snapshot.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    hubs: DashMap<HubId, Slot>,
}

impl SnapshotStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one reading into the snapshot of `hub_id`, creating the
    /// snapshot on the first reading of the hub.
    pub fn merge(
        &self,
        hub_id: &HubId,
        sensor_id: &SensorId,
        timestamp: Timestamp,
        payload: &SensorPayload,
    ) -> MergeResult {
        let slot = self.slot(hub_id, timestamp);
        let mut current = slot.lock().unwrap_or_else(PoisonError::into_inner);
        match current.merge(sensor_id, timestamp, payload) {
            MergeOutcome::Applied(next) => {
                let next = Arc::new(next);
                *current = Arc::clone(&next);
                MergeResult {
                    updated: true,
                    snapshot: next,
                }
            }
            outcome @ (MergeOutcome::Stale | MergeOutcome::Unchanged) => {
                tracing::debug!(
                    hub_id = %hub_id,
                    sensor_id = %sensor_id,
                    ?outcome,
                    "reading rejected"
                );
                MergeResult {
                    updated: false,
                    snapshot: Arc::clone(&current),
                }
            }
        }
    }

    /// Current snapshot of a hub, if it ever received a reading.
    #[must_use]
    pub fn get(&self, hub_id: &HubId) -> Option<Arc<HubSnapshot>> {
        let slot = self.hubs.get(hub_id).map(|entry| Arc::clone(entry.value()))?;
        let current = slot.lock().unwrap_or_else(PoisonError::into_inner);
        Some(Arc::clone(&current))
    }

    /// Ids of every known hub, sorted.
    #[must_use]
    pub fn hubs(&self) -> Vec<HubId> {
        let mut hubs: Vec<HubId> = self.hubs.iter().map(|entry| entry.key().clone()).collect();
        hubs.sort();
        hubs
    }

    // The map shard lock is released before the slot mutex is taken.
    fn slot(&self, hub_id: &HubId, timestamp: Timestamp) -> Slot {
        if let Some(entry) = self.hubs.get(hub_id) {
            return Arc::clone(entry.value());
        }
        let entry = self.hubs.entry(hub_id.clone()).or_insert_with(|| {
            Arc::new(Mutex::new(Arc::new(HubSnapshot::empty(
                hub_id.clone(),
                timestamp,
            ))))
        });
        Arc::clone(entry.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeMap;

    fn at(secs: i64) -> Timestamp {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn hub(value: &str) -> HubId {
        HubId::new(value).unwrap()
    }

    fn sensor(value: &str) -> SensorId {
        SensorId::new(value).unwrap()
    }

    fn light(luminosity: i64) -> SensorPayload {
        SensorPayload::Light {
            link_quality: 100,
            luminosity,
        }
    }

    #[test]
    fn should_create_snapshot_on_first_reading() {
        let store = SnapshotStore::new();
        let result = store.merge(&hub("h1"), &sensor("s1"), at(10), &light(5));
        assert!(result.updated);
        assert_eq!(result.snapshot.timestamp, at(10));
        assert_eq!(store.get(&hub("h1")).unwrap(), result.snapshot);
    }

    #[test]
    fn should_return_unchanged_snapshot_for_duplicate_reading() {
        let store = SnapshotStore::new();
        let first = store.merge(&hub("h1"), &sensor("s1"), at(10), &light(5));
        let second = store.merge(&hub("h1"), &sensor("s1"), at(10), &light(5));
        assert!(!second.updated);
        assert!(Arc::ptr_eq(&first.snapshot, &second.snapshot));
    }

    #[test]
    fn should_reject_stale_reading() {
        let store = SnapshotStore::new();
        store.merge(&hub("h1"), &sensor("s1"), at(10), &light(5));
        let result = store.merge(&hub("h1"), &sensor("s1"), at(5), &light(99));
        assert!(!result.updated);
        let state = store.get(&hub("h1")).unwrap();
        assert_eq!(state.sensor(&sensor("s1")).unwrap().payload, light(5));
    }

    #[test]
    fn should_keep_previous_snapshot_readable_after_merge() {
        let store = SnapshotStore::new();
        let before = store
            .merge(&hub("h1"), &sensor("s1"), at(10), &light(5))
            .snapshot;
        store.merge(&hub("h1"), &sensor("s1"), at(20), &light(6));
        assert_eq!(before.sensor(&sensor("s1")).unwrap().payload, light(5));
        assert_eq!(
            store
                .get(&hub("h1"))
                .unwrap()
                .sensor(&sensor("s1"))
                .unwrap()
                .payload,
            light(6)
        );
    }

    #[test]
    fn should_return_none_for_unknown_hub() {
        let store = SnapshotStore::new();
        assert!(store.get(&hub("nowhere")).is_none());
        assert!(store.hubs().is_empty());
    }

    #[test]
    fn should_list_known_hubs_sorted() {
        let store = SnapshotStore::new();
        store.merge(&hub("h2"), &sensor("s1"), at(1), &light(1));
        store.merge(&hub("h1"), &sensor("s1"), at(1), &light(1));
        assert_eq!(store.hubs(), vec![hub("h1"), hub("h2")]);
    }

    #[test]
    fn should_isolate_hubs_under_concurrent_merges() {
        const WRITERS_PER_HUB: usize = 4;
        const READINGS: i64 = 200;

        let store = SnapshotStore::new();
        let hubs = [hub("hub-a"), hub("hub-b")];

        std::thread::scope(|scope| {
            for hub_id in &hubs {
                for writer in 0..WRITERS_PER_HUB {
                    let store = &store;
                    scope.spawn(move || {
                        let sensor_id = sensor(&format!("s{writer}"));
                        for step in 1..=READINGS {
                            store.merge(hub_id, &sensor_id, at(step), &light(step));
                            // stale replay must never win
                            store.merge(hub_id, &sensor_id, at(step - 1), &light(-step));
                        }
                    });
                }
            }
        });

        let expected: BTreeMap<SensorId, SensorPayload> = (0..WRITERS_PER_HUB)
            .map(|writer| (sensor(&format!("s{writer}")), light(READINGS)))
            .collect();
        for hub_id in &hubs {
            let snapshot = store.get(hub_id).unwrap();
            assert_eq!(&snapshot.hub_id, hub_id);
            let actual: BTreeMap<SensorId, SensorPayload> = snapshot
                .sensors
                .iter()
                .map(|(id, state)| (id.clone(), state.payload.clone()))
                .collect();
            assert_eq!(actual, expected);
            assert_eq!(snapshot.timestamp, at(READINGS));
        }
    }
}
