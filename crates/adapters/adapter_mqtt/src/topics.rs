//! Topic layout and inbound message decoding.

use std::borrow::Cow;

use smarthub_domain::hub_event::HubEventEnvelope;
use smarthub_domain::id::HubId;
use smarthub_domain::sensor::SensorEventEnvelope;

use crate::error::MqttError;

/// Topics derived from the configured base prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topics {
    base: String,
}

/// A decoded inbound message.
#[derive(Debug, Clone)]
pub enum Inbound {
    Sensor(SensorEventEnvelope),
    Hub(HubEventEnvelope),
}

impl Topics {
    #[must_use]
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    /// Inbound sensor readings.
    #[must_use]
    pub fn sensors(&self) -> String {
        format!("{}/sensors", self.base)
    }

    /// Inbound hub topology events.
    #[must_use]
    pub fn hubs(&self) -> String {
        format!("{}/hubs", self.base)
    }

    /// Outbound snapshots of one hub.
    ///
    /// The hub id always occupies exactly one topic level, so
    /// `{base}/snapshots/+` matches every hub.
    #[must_use]
    pub fn snapshot(&self, hub_id: &HubId) -> String {
        format!("{}/snapshots/{}", self.base, topic_level(hub_id.as_str()))
    }

    /// Decode a message received on `topic`.
    ///
    /// # Errors
    ///
    /// Returns [`MqttError::UnknownTopic`] for a topic outside the inbound
    /// streams, or [`MqttError::PayloadParse`] for a body that is not a
    /// JSON object of the expected shape. Missing fields are not an error
    /// here; they are reported when the envelope is validated.
    pub fn decode(&self, topic: &str, payload: &[u8]) -> Result<Inbound, MqttError> {
        let stream = topic
            .strip_prefix(self.base.as_str())
            .and_then(|rest| rest.strip_prefix('/'));
        match stream {
            Some("sensors") => serde_json::from_slice(payload)
                .map(Inbound::Sensor)
                .map_err(MqttError::PayloadParse),
            Some("hubs") => serde_json::from_slice(payload)
                .map(Inbound::Hub)
                .map_err(MqttError::PayloadParse),
            _ => Err(MqttError::UnknownTopic(topic.to_string())),
        }
    }
}

/// Percent-encode the characters MQTT reserves in topic names (level
/// separator, wildcards, NUL) and `%` itself.
fn topic_level(value: &str) -> Cow<'_, str> {
    if !value.contains(['/', '+', '#', '%', '\0']) {
        return Cow::Borrowed(value);
    }
    let mut escaped = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '/' => escaped.push_str("%2F"),
            '+' => escaped.push_str("%2B"),
            '#' => escaped.push_str("%23"),
            '%' => escaped.push_str("%25"),
            '\0' => escaped.push_str("%00"),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}
