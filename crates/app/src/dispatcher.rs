//! Action dispatcher — turns a satisfied scenario into device-control calls.

use std::time::Duration;

use smarthub_domain::error::SmartHubError;
use smarthub_domain::scenario::{DeviceActionRequest, Scenario};

use crate::ports::DeviceControl;

/// Upper bound on a single device-control call unless configured otherwise.
pub const DEFAULT_DISPATCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Outcome counters of one or more scenario dispatches.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSummary {
    pub dispatched: usize,
    pub failed: usize,
    pub timed_out: usize,
}

impl DispatchSummary {
    /// Total number of device-control calls attempted.
    #[must_use]
    pub fn attempted(self) -> usize {
        self.dispatched + self.failed + self.timed_out
    }
}

impl std::ops::AddAssign for DispatchSummary {
    fn add_assign(&mut self, rhs: Self) {
        self.dispatched += rhs.dispatched;
        self.failed += rhs.failed;
        self.timed_out += rhs.timed_out;
    }
}

impl std::iter::Sum for DispatchSummary {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |mut acc, item| {
            acc += item;
            acc
        })
    }
}

/// Sends every action of a satisfied scenario to the device-control
/// endpoint, each call bounded by a deadline.
pub struct ActionDispatcher<D> {
    control: D,
    timeout: Duration,
}

impl<D: DeviceControl> ActionDispatcher<D> {
    /// Create a dispatcher using [`DEFAULT_DISPATCH_TIMEOUT`].
    pub fn new(control: D) -> Self {
        Self {
            control,
            timeout: DEFAULT_DISPATCH_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Dispatch the actions of `scenario` in their stored order.
    ///
    /// A failed or timed-out call is logged and counted; it never stops the
    /// remaining actions and is never returned to the caller.
    #[tracing::instrument(skip_all, fields(hub_id = %scenario.hub_id, scenario = %scenario.name))]
    pub async fn dispatch(&self, scenario: &Scenario) -> DispatchSummary {
        let mut summary = DispatchSummary::default();
        for action in &scenario.actions {
            let request = DeviceActionRequest::new(
                &scenario.hub_id,
                &scenario.name,
                action,
                smarthub_domain::time::now(),
            );
            match tokio::time::timeout(self.timeout, self.control.dispatch(request)).await {
                Ok(Ok(())) => {
                    tracing::debug!(%action, "action dispatched");
                    summary.dispatched += 1;
                }
                Ok(Err(err)) => {
                    tracing::warn!(%action, error = %err.chain(), "action dispatch failed");
                    summary.failed += 1;
                }
                Err(_) => {
                    let err = SmartHubError::Timeout(self.timeout);
                    tracing::warn!(%action, error = %err.chain(), "action dispatch failed");
                    summary.timed_out += 1;
                }
            }
        }
        summary
    }
}
