//! Reading and snapshot clock.
//!
//! Every timestamp is normalised to UTC on decode so the stale-reading
//! check in [`HubSnapshot::merge`](crate::snapshot::HubSnapshot::merge)
//! compares instants, whatever offset a hub reports in.

use chrono::{DateTime, Utc};

/// UTC timestamp used for sensor readings, snapshots and action requests.
pub type Timestamp = DateTime<Utc>;

/// Current time, stamped on outgoing action requests and generated events.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_return_current_utc_time() {
        let before = Utc::now();
        let ts = now();
        let after = Utc::now();
        assert!(ts >= before);
        assert!(ts <= after);
    }

    #[test]
    fn should_order_readings_with_different_offsets_by_instant() {
        let paris: Timestamp = serde_json::from_str("\"2024-05-01T10:30:00+02:00\"").unwrap();
        let utc: Timestamp = serde_json::from_str("\"2024-05-01T09:00:00Z\"").unwrap();

        assert!(paris < utc);
        assert_eq!(
            serde_json::to_string(&paris).unwrap(),
            "\"2024-05-01T08:30:00Z\""
        );
    }
}
