//! Sensor payload: the typed body of one reading.

use serde::{Deserialize, Serialize};

/// Typed reading reported by a sensor. Exactly one variant per reading.
///
/// Equality is structural: two payloads are equal when they are the same
/// variant with the same field values, which is what the snapshot merge
/// uses to suppress repeated readings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SensorPayload {
    Motion {
        link_quality: i64,
        motion: bool,
        voltage: i64,
    },
    Light {
        link_quality: i64,
        luminosity: i64,
    },
    Climate {
        temperature_c: i64,
        humidity: i64,
        co2_level: i64,
    },
    Switch {
        state: bool,
    },
    Temperature {
        temperature_c: i64,
        temperature_f: i64,
    },
}

impl SensorPayload {
    /// Short lowercase name of the variant, used in logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Motion { .. } => "motion",
            Self::Light { .. } => "light",
            Self::Climate { .. } => "climate",
            Self::Switch { .. } => "switch",
            Self::Temperature { .. } => "temperature",
        }
    }
}
