//! MQTT adapter error types.

use smarthub_domain::error::SmartHubError;

/// Errors specific to the MQTT adapter.
#[derive(Debug, thiserror::Error)]
pub enum MqttError {
    /// The rumqttc client rejected a request (its event loop is gone).
    #[error("MQTT client error")]
    Client(#[from] rumqttc::ClientError),

    /// Failed to parse an incoming MQTT payload as JSON.
    #[error("failed to parse MQTT payload")]
    PayloadParse(#[source] serde_json::Error),

    /// Failed to encode an outgoing message as JSON.
    #[error("failed to encode MQTT payload")]
    PayloadEncode(#[source] serde_json::Error),

    /// A message arrived on a topic this adapter does not consume.
    #[error("unexpected topic `{0}`")]
    UnknownTopic(String),
}

impl MqttError {
    /// Convert into a [`SmartHubError::Transport`] for propagation across
    /// port boundaries.
    pub fn into_domain(self) -> SmartHubError {
        SmartHubError::Transport(Box::new(self))
    }
}

impl From<MqttError> for SmartHubError {
    fn from(err: MqttError) -> Self {
        err.into_domain()
    }
}
