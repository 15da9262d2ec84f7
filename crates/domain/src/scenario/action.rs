//! Action: the device command issued when a scenario is satisfied.

use serde::{Deserialize, Serialize};

use crate::id::{HubId, SensorId};
use crate::time::Timestamp;

/// Kind of command sent to a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Activate,
    Deactivate,
    Inverse,
    SetValue,
}

impl ActionType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Activate => "activate",
            Self::Deactivate => "deactivate",
            Self::Inverse => "inverse",
            Self::SetValue => "set_value",
        }
    }
}

/// A command targeting one device, stored with its scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub sensor_id: SensorId,
    #[serde(rename = "type")]
    pub kind: ActionType,
    /// Only meaningful for [`ActionType::SetValue`].
    #[serde(default)]
    pub value: Option<i64>,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.value {
            Some(value) => write!(f, "{}({}, {value})", self.kind.as_str(), self.sensor_id),
            None => write!(f, "{}({})", self.kind.as_str(), self.sensor_id),
        }
    }
}

/// One call to the device-control endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceActionRequest {
    pub hub_id: HubId,
    pub scenario_name: String,
    pub sensor_id: SensorId,
    pub action_type: ActionType,
    pub value: Option<i64>,
    pub timestamp: Timestamp,
}

impl DeviceActionRequest {
    /// Build the request for `action` of scenario `scenario_name` on `hub_id`.
    #[must_use]
    pub fn new(hub_id: &HubId, scenario_name: &str, action: &Action, timestamp: Timestamp) -> Self {
        Self {
            hub_id: hub_id.clone(),
            scenario_name: scenario_name.to_string(),
            sensor_id: action.sensor_id.clone(),
            action_type: action.kind,
            value: action.value,
            timestamp,
        }
    }
}
