//! Hub snapshot — the authoritative latest-known state of every sensor of
//! one hub, and the rule that folds a new reading into it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::id::{HubId, SensorId};
use crate::sensor::{SensorPayload, SensorState};
use crate::time::Timestamp;

/// Latest accepted state of all sensors under one hub.
///
/// Snapshots are immutable values: [`merge`](Self::merge) never mutates
/// `self`, it produces the next version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubSnapshot {
    pub hub_id: HubId,
    /// Timestamp of the most recent accepted update.
    pub timestamp: Timestamp,
    pub sensors: BTreeMap<SensorId, SensorState>,
}

/// Result of folding one reading into a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The reading was accepted; this is the new snapshot.
    Applied(HubSnapshot),
    /// The stored reading is strictly newer than the incoming one.
    Stale,
    /// The incoming payload is identical to the stored one.
    Unchanged,
}

impl HubSnapshot {
    /// A snapshot with no sensors.
    #[must_use]
    pub fn empty(hub_id: HubId, timestamp: Timestamp) -> Self {
        Self {
            hub_id,
            timestamp,
            sensors: BTreeMap::new(),
        }
    }

    /// Current state of a sensor, if it ever reported.
    #[must_use]
    pub fn sensor(&self, sensor_id: &SensorId) -> Option<&SensorState> {
        self.sensors.get(sensor_id)
    }

    /// Fold a reading into this snapshot.
    ///
    /// A reading is rejected when the stored state for the sensor is
    /// strictly newer, or when its payload is structurally equal to the
    /// stored one even if the timestamp advanced. Otherwise the sensor's
    /// state and the snapshot timestamp both take the incoming values.
    #[must_use]
    pub fn merge(
        &self,
        sensor_id: &SensorId,
        timestamp: Timestamp,
        payload: &SensorPayload,
    ) -> MergeOutcome {
        if let Some(current) = self.sensors.get(sensor_id) {
            if current.timestamp > timestamp {
                return MergeOutcome::Stale;
            }
            if current.payload == *payload {
                return MergeOutcome::Unchanged;
            }
        }

        let mut next = self.clone();
        next.sensors.insert(
            sensor_id.clone(),
            SensorState {
                timestamp,
                payload: payload.clone(),
            },
        );
        next.timestamp = timestamp;
        MergeOutcome::Applied(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn at(secs: i64) -> Timestamp {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn hub() -> HubId {
        HubId::new("hub-1").unwrap()
    }

    fn sensor() -> SensorId {
        SensorId::new("switch-1").unwrap()
    }

    fn on() -> SensorPayload {
        SensorPayload::Switch { state: true }
    }

    fn off() -> SensorPayload {
        SensorPayload::Switch { state: false }
    }

    fn applied(outcome: MergeOutcome) -> HubSnapshot {
        match outcome {
            MergeOutcome::Applied(snapshot) => snapshot,
            other => panic!("expected Applied, got {other:?}"),
        }
    }

    #[test]
    fn should_insert_first_reading_of_sensor() {
        let snapshot = HubSnapshot::empty(hub(), at(10));
        let next = applied(snapshot.merge(&sensor(), at(10), &on()));
        assert_eq!(next.timestamp, at(10));
        assert_eq!(next.sensor(&sensor()).unwrap().payload, on());
    }

    #[test]
    fn should_leave_original_snapshot_untouched() {
        let snapshot = HubSnapshot::empty(hub(), at(10));
        let _ = snapshot.merge(&sensor(), at(10), &on());
        assert!(snapshot.sensors.is_empty());
    }

    #[test]
    fn should_reject_identical_reading() {
        let snapshot = applied(HubSnapshot::empty(hub(), at(10)).merge(&sensor(), at(10), &on()));
        assert_eq!(
            snapshot.merge(&sensor(), at(10), &on()),
            MergeOutcome::Unchanged
        );
    }

    #[test]
    fn should_reject_older_reading_whatever_its_payload() {
        let snapshot = applied(HubSnapshot::empty(hub(), at(10)).merge(&sensor(), at(10), &on()));
        assert_eq!(snapshot.merge(&sensor(), at(5), &off()), MergeOutcome::Stale);
        assert_eq!(snapshot.merge(&sensor(), at(5), &on()), MergeOutcome::Stale);
    }

    #[test]
    fn should_reject_newer_reading_with_equal_payload() {
        let snapshot = applied(HubSnapshot::empty(hub(), at(10)).merge(&sensor(), at(10), &on()));
        assert_eq!(
            snapshot.merge(&sensor(), at(20), &on()),
            MergeOutcome::Unchanged
        );
    }

    #[test]
    fn should_replace_state_with_newer_different_reading() {
        let snapshot = applied(HubSnapshot::empty(hub(), at(10)).merge(&sensor(), at(10), &on()));
        let next = applied(snapshot.merge(&sensor(), at(20), &off()));
        assert_eq!(next.timestamp, at(20));
        let state = next.sensor(&sensor()).unwrap();
        assert_eq!(state.timestamp, at(20));
        assert_eq!(state.payload, off());
    }

    #[test]
    fn should_accept_different_payload_with_same_timestamp() {
        let snapshot = applied(HubSnapshot::empty(hub(), at(10)).merge(&sensor(), at(10), &on()));
        let next = applied(snapshot.merge(&sensor(), at(10), &off()));
        assert_eq!(next.sensor(&sensor()).unwrap().payload, off());
    }

    #[test]
    fn should_track_sensors_independently() {
        let other = SensorId::new("switch-2").unwrap();
        let snapshot = applied(HubSnapshot::empty(hub(), at(10)).merge(&sensor(), at(30), &on()));
        let next = applied(snapshot.merge(&other, at(20), &on()));
        assert_eq!(next.sensors.len(), 2);
        assert_eq!(next.timestamp, at(20));
    }

    #[test]
    fn should_serialize_sensors_keyed_by_id() {
        let snapshot = applied(HubSnapshot::empty(hub(), at(10)).merge(&sensor(), at(10), &on()));
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["hub_id"], "hub-1");
        assert_eq!(json["sensors"]["switch-1"]["payload"]["type"], "switch");
    }
}
