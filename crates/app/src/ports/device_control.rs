//! Device-control port: the endpoint that executes actions on devices.

use std::future::Future;
use std::sync::Arc;

use smarthub_domain::error::SmartHubError;
use smarthub_domain::scenario::DeviceActionRequest;

/// Sends one action to the device-control endpoint and waits for its ack.
///
/// Callers bound every call with a deadline; implementations may apply
/// their own transport timeout as well.
pub trait DeviceControl {
    /// Dispatch a single action request.
    fn dispatch(
        &self,
        request: DeviceActionRequest,
    ) -> impl Future<Output = Result<(), SmartHubError>> + Send;
}

impl<T: DeviceControl + Send + Sync> DeviceControl for Arc<T> {
    fn dispatch(
        &self,
        request: DeviceActionRequest,
    ) -> impl Future<Output = Result<(), SmartHubError>> + Send {
        (**self).dispatch(request)
    }
}
