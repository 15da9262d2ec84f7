//! reqwest implementation of [`DeviceControl`].

use reqwest::Url;

use smarthub_app::ports::DeviceControl;
use smarthub_domain::error::SmartHubError;
use smarthub_domain::scenario::DeviceActionRequest;

use crate::config::DeviceControlConfig;
use crate::error::DeviceControlError;

/// Device-control endpoint reached over HTTP/JSON.
pub struct HttpDeviceControl {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpDeviceControl {
    /// Create a client from its configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceControlError::Client`] if the HTTP client cannot be
    /// built, or [`DeviceControlError::InvalidBaseUrl`] if `base_url` cannot
    /// carry path segments.
    pub fn new(config: &DeviceControlConfig) -> Result<Self, DeviceControlError> {
        Self::from_reqwest(&config.base_url, config.build_client()?)
    }

    /// Wrap an existing `reqwest::Client`.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceControlError::InvalidBaseUrl`] if `base_url` cannot
    /// carry path segments.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, DeviceControlError> {
        let invalid = |reason: String| DeviceControlError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason,
        };
        let base_url = Url::parse(base_url).map_err(|err| invalid(err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(invalid("URL cannot carry a path".to_string()));
        }
        Ok(Self { http, base_url })
    }

    /// `{base_url}/hubs/{hub_id}/actions`, with the hub id escaped as a
    /// single path segment.
    fn actions_url(&self, request: &DeviceActionRequest) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["hubs", request.hub_id.as_str(), "actions"]);
        }
        url
    }
}

impl DeviceControl for HttpDeviceControl {
    #[tracing::instrument(
        skip_all,
        fields(hub_id = %request.hub_id, sensor_id = %request.sensor_id, action = request.action_type.as_str())
    )]
    async fn dispatch(&self, request: DeviceActionRequest) -> Result<(), SmartHubError> {
        let response = self
            .http
            .post(self.actions_url(&request))
            .json(&request)
            .send()
            .await
            .map_err(DeviceControlError::Client)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DeviceControlError::Rejected {
                status: status.as_u16(),
                body,
            }
            .into());
        }
        tracing::debug!(status = status.as_u16(), "action acknowledged");
        Ok(())
    }
}
