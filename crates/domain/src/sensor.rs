//! Sensors — roster entries, readings, and the per-sensor state kept in a
//! hub snapshot.

mod payload;

pub use payload::SensorPayload;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::{HubId, SensorId};
use crate::time::Timestamp;

/// Kind of device registered on a hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    MotionSensor,
    TemperatureSensor,
    LightSensor,
    ClimateSensor,
    SwitchSensor,
}

impl DeviceType {
    /// Stable textual representation, also used as the storage format.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MotionSensor => "motion_sensor",
            Self::TemperatureSensor => "temperature_sensor",
            Self::LightSensor => "light_sensor",
            Self::ClimateSensor => "climate_sensor",
            Self::SwitchSensor => "switch_sensor",
        }
    }
}

impl std::fmt::Display for DeviceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "motion_sensor" => Ok(Self::MotionSensor),
            "temperature_sensor" => Ok(Self::TemperatureSensor),
            "light_sensor" => Ok(Self::LightSensor),
            "climate_sensor" => Ok(Self::ClimateSensor),
            "switch_sensor" => Ok(Self::SwitchSensor),
            other => Err(ValidationError::UnknownVariant {
                kind: "device type",
                value: other.to_string(),
            }),
        }
    }
}

/// A device registered on a hub (the sensor roster).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sensor {
    pub id: SensorId,
    pub hub_id: HubId,
    pub device_type: DeviceType,
}

/// One typed reading from one sensor at one instant. Immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorEvent {
    pub sensor_id: SensorId,
    pub hub_id: HubId,
    pub timestamp: Timestamp,
    pub payload: SensorPayload,
}

/// Wire form of a [`SensorEvent`] where every field may be absent.
///
/// Ingestion decodes into this shape first so that a message missing a
/// required field can be told apart from a malformed one and dropped
/// with a precise reason.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SensorEventEnvelope {
    pub sensor_id: Option<String>,
    pub hub_id: Option<String>,
    pub timestamp: Option<Timestamp>,
    pub payload: Option<SensorPayload>,
}

impl TryFrom<SensorEventEnvelope> for SensorEvent {
    type Error = ValidationError;

    fn try_from(envelope: SensorEventEnvelope) -> Result<Self, Self::Error> {
        let hub_id = envelope
            .hub_id
            .ok_or(ValidationError::MissingField("hub_id"))?;
        let sensor_id = envelope
            .sensor_id
            .ok_or(ValidationError::MissingField("sensor_id"))?;
        let timestamp = envelope
            .timestamp
            .ok_or(ValidationError::MissingField("timestamp"))?;
        let payload = envelope
            .payload
            .ok_or(ValidationError::MissingField("payload"))?;
        Ok(Self {
            sensor_id: SensorId::new(sensor_id)?,
            hub_id: HubId::new(hub_id)?,
            timestamp,
            payload,
        })
    }
}

impl From<SensorEvent> for SensorEventEnvelope {
    fn from(event: SensorEvent) -> Self {
        Self {
            sensor_id: Some(event.sensor_id.into()),
            hub_id: Some(event.hub_id.into()),
            timestamp: Some(event.timestamp),
            payload: Some(event.payload),
        }
    }
}

/// Latest accepted reading for one sensor within a hub snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorState {
    pub timestamp: Timestamp,
    pub payload: SensorPayload,
}
