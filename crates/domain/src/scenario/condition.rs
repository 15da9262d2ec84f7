//! Condition: a typed predicate over one sensor's latest reading.

use serde::{Deserialize, Serialize};

use crate::id::SensorId;
use crate::sensor::SensorPayload;
use crate::snapshot::HubSnapshot;

/// Selects which scalar is read out of a [`SensorPayload`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionType {
    Motion,
    Luminosity,
    Switch,
    Temperature,
    Co2Level,
    Humidity,
}

impl ConditionType {
    /// Read the scalar this type selects from `payload`.
    ///
    /// Booleans map to `1`/`0`. Returns `None` when the payload variant does
    /// not carry the requested value.
    #[must_use]
    pub fn extract(self, payload: &SensorPayload) -> Option<i64> {
        match (self, payload) {
            (Self::Motion, SensorPayload::Motion { motion, .. }) => Some(i64::from(*motion)),
            (Self::Luminosity, SensorPayload::Light { luminosity, .. }) => Some(*luminosity),
            (Self::Switch, SensorPayload::Switch { state }) => Some(i64::from(*state)),
            (
                Self::Temperature,
                SensorPayload::Climate { temperature_c, .. }
                | SensorPayload::Temperature { temperature_c, .. },
            ) => Some(*temperature_c),
            (Self::Co2Level, SensorPayload::Climate { co2_level, .. }) => Some(*co2_level),
            (Self::Humidity, SensorPayload::Climate { humidity, .. }) => Some(*humidity),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Motion => "motion",
            Self::Luminosity => "luminosity",
            Self::Switch => "switch",
            Self::Temperature => "temperature",
            Self::Co2Level => "co2_level",
            Self::Humidity => "humidity",
        }
    }
}

/// Comparison applied between the extracted value and the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Equals,
    GreaterThan,
    LowerThan,
}

impl Operator {
    /// Compare `value` (left) against `threshold` (right).
    #[must_use]
    pub fn apply(self, value: i64, threshold: i64) -> bool {
        match self {
            Self::Equals => value == threshold,
            Self::GreaterThan => value > threshold,
            Self::LowerThan => value < threshold,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            Self::Equals => "==",
            Self::GreaterThan => ">",
            Self::LowerThan => "<",
        }
    }
}

/// A predicate on one sensor. All conditions of a scenario must hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub sensor_id: SensorId,
    #[serde(rename = "type")]
    pub kind: ConditionType,
    pub operator: Operator,
    pub threshold: i64,
}

impl Condition {
    /// Whether the snapshot satisfies this condition.
    ///
    /// A sensor absent from the snapshot, or a payload that does not carry
    /// the value selected by [`kind`](Self::kind), fails the condition.
    #[must_use]
    pub fn is_satisfied_by(&self, snapshot: &HubSnapshot) -> bool {
        snapshot
            .sensor(&self.sensor_id)
            .and_then(|state| self.kind.extract(&state.payload))
            .is_some_and(|value| self.operator.apply(value, self.threshold))
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}({}) {} {}",
            self.kind.as_str(),
            self.sensor_id,
            self.operator.symbol(),
            self.threshold
        )
    }
}
