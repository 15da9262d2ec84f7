//! Hub events — topology changes reported by a hub: devices and scenarios
//! being added or removed.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::{HubId, SensorId};
use crate::scenario::{Action, Condition};
use crate::sensor::DeviceType;
use crate::time::Timestamp;

/// A topology change on one hub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubEvent {
    pub hub_id: HubId,
    pub timestamp: Timestamp,
    pub payload: HubEventPayload,
}

/// What changed on the hub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HubEventPayload {
    DeviceAdded {
        sensor_id: SensorId,
        device_type: DeviceType,
    },
    DeviceRemoved {
        sensor_id: SensorId,
    },
    ScenarioAdded {
        name: String,
        #[serde(default)]
        conditions: Vec<Condition>,
        #[serde(default)]
        actions: Vec<Action>,
    },
    ScenarioRemoved {
        name: String,
    },
}

impl HubEvent {
    /// Short name of the payload variant, used in logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self.payload {
            HubEventPayload::DeviceAdded { .. } => "device_added",
            HubEventPayload::DeviceRemoved { .. } => "device_removed",
            HubEventPayload::ScenarioAdded { .. } => "scenario_added",
            HubEventPayload::ScenarioRemoved { .. } => "scenario_removed",
        }
    }
}

/// Wire form of a [`HubEvent`] where the envelope fields may be absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HubEventEnvelope {
    pub hub_id: Option<String>,
    pub timestamp: Option<Timestamp>,
    pub payload: Option<HubEventPayload>,
}

impl TryFrom<HubEventEnvelope> for HubEvent {
    type Error = ValidationError;

    fn try_from(envelope: HubEventEnvelope) -> Result<Self, Self::Error> {
        let hub_id = envelope
            .hub_id
            .ok_or(ValidationError::MissingField("hub_id"))?;
        let timestamp = envelope
            .timestamp
            .ok_or(ValidationError::MissingField("timestamp"))?;
        let payload = envelope
            .payload
            .ok_or(ValidationError::MissingField("payload"))?;
        Ok(Self {
            hub_id: HubId::new(hub_id)?,
            timestamp,
            payload,
        })
    }
}

impl From<HubEvent> for HubEventEnvelope {
    fn from(event: HubEvent) -> Self {
        Self {
            hub_id: Some(event.hub_id.into()),
            timestamp: Some(event.timestamp),
            payload: Some(event.payload),
        }
    }
}
