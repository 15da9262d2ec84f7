//! MQTT broker configuration.

use std::time::Duration;

use rumqttc::MqttOptions;
use serde::Deserialize;

/// Configuration for the MQTT broker connection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MqttConfig {
    /// MQTT broker hostname or IP address.
    pub broker_host: String,
    /// MQTT broker port.
    pub broker_port: u16,
    /// MQTT client identifier.
    pub client_id: String,
    /// Base topic prefix for all smarthub MQTT communication.
    pub base_topic: String,
    /// Keep-alive interval in seconds.
    pub keep_alive_secs: u64,
    /// Pause after a connection error before polling again, in milliseconds.
    pub reconnect_delay_ms: u64,
    /// Capacity of the client request queue.
    pub request_capacity: usize,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            broker_host: "localhost".to_string(),
            broker_port: 1883,
            client_id: "smarthub".to_string(),
            base_topic: "smarthub".to_string(),
            keep_alive_secs: 30,
            reconnect_delay_ms: 1000,
            request_capacity: 64,
        }
    }
}

impl MqttConfig {
    /// Connection options for rumqttc.
    #[must_use]
    pub fn options(&self) -> MqttOptions {
        let mut options =
            MqttOptions::new(self.client_id.as_str(), self.broker_host.as_str(), self.broker_port);
        options.set_keep_alive(Duration::from_secs(self.keep_alive_secs));
        options
    }

    #[must_use]
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }
}
