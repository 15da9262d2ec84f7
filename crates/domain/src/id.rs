//! Typed identifier newtypes backed by non-empty strings.
//!
//! Hubs and sensors are named by the devices themselves (MAC-like or
//! vendor-assigned strings), so identifiers are opaque text rather than
//! generated UUIDs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

macro_rules! define_id {
    ($(#[doc = $doc:expr])* $name:ident, $field:literal) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Wrap a string, rejecting empty or whitespace-only values.
            ///
            /// # Errors
            ///
            /// Returns [`ValidationError::EmptyId`] when `value` is blank.
            pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
                let value = value.into();
                if value.trim().is_empty() {
                    return Err(ValidationError::EmptyId($field));
                }
                Ok(Self(value))
            }

            /// Borrow the inner string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(
    /// Identifier of a hub: the site-level controller owning sensors and scenarios.
    HubId,
    "hub_id"
);

define_id!(
    /// Identifier of a sensor (or actuator) attached to a hub.
    SensorId,
    "sensor_id"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_reject_empty_hub_id() {
        assert_eq!(HubId::new(""), Err(ValidationError::EmptyId("hub_id")));
    }

    #[test]
    fn should_reject_whitespace_sensor_id() {
        assert_eq!(
            SensorId::new("   "),
            Err(ValidationError::EmptyId("sensor_id"))
        );
    }

    #[test]
    fn should_display_inner_value() {
        let id = HubId::new("hub-kitchen").unwrap();
        assert_eq!(id.to_string(), "hub-kitchen");
        assert_eq!(id.as_str(), "hub-kitchen");
    }

    #[test]
    fn should_serialize_as_plain_string() {
        let id = SensorId::new("motion-1").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"motion-1\"");
    }

    #[test]
    fn should_fail_deserializing_empty_string() {
        let result: Result<SensorId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }

    #[test]
    fn should_parse_from_str() {
        let id: HubId = "hub-1".parse().unwrap();
        assert_eq!(id.as_str(), "hub-1");
    }
}
