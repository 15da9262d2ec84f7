//! Device-control adapter error types.

use smarthub_domain::error::SmartHubError;

/// Errors raised while calling the device-control endpoint.
#[derive(Debug, thiserror::Error)]
pub enum DeviceControlError {
    /// The request could not be sent or its response not read.
    #[error("device-control request failed")]
    Client(#[source] reqwest::Error),

    /// The configured base URL is unusable.
    #[error("invalid device-control base URL `{url}`: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The endpoint answered with a non-success status.
    #[error("device-control endpoint rejected the action with status {status}")]
    Rejected { status: u16, body: String },
}

impl From<DeviceControlError> for SmartHubError {
    fn from(err: DeviceControlError) -> Self {
        Self::Transport(Box::new(err))
    }
}
