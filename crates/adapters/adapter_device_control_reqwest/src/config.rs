//! Device-control client configuration.

use std::time::Duration;

use serde::Deserialize;

use crate::error::DeviceControlError;

/// Configuration for the device-control endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DeviceControlConfig {
    /// Base URL of the device-control service.
    pub base_url: String,
    /// Per-request timeout in milliseconds.
    pub request_timeout_ms: u64,
}

impl Default for DeviceControlConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8081".to_string(),
            request_timeout_ms: 4000,
        }
    }
}

impl DeviceControlConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Build the `reqwest::Client` used for every call.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceControlError::Client`] if the TLS backend cannot be
    /// initialised.
    pub fn build_client(&self) -> Result<reqwest::Client, DeviceControlError> {
        reqwest::Client::builder()
            .timeout(self.request_timeout())
            .user_agent(concat!("smarthub/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(DeviceControlError::Client)
    }
}
