//! Scenario repository port: the scenario directory of each hub.

use std::future::Future;
use std::sync::Arc;

use smarthub_domain::error::SmartHubError;
use smarthub_domain::id::HubId;
use smarthub_domain::scenario::Scenario;

/// Repository for persisting and querying [`Scenario`]s.
///
/// Scenarios are unique per `(hub_id, name)`.
pub trait ScenarioRepository {
    /// All scenarios defined for a hub.
    fn find_by_hub(
        &self,
        hub_id: &HubId,
    ) -> impl Future<Output = Result<Vec<Scenario>, SmartHubError>> + Send;

    /// Store a scenario, atomically replacing the conditions and actions of
    /// any scenario already defined under the same hub and name.
    fn upsert(
        &self,
        scenario: Scenario,
    ) -> impl Future<Output = Result<Scenario, SmartHubError>> + Send;

    /// Delete the scenario `name` of a hub. Deleting a missing scenario is
    /// not an error.
    fn delete(
        &self,
        hub_id: &HubId,
        name: &str,
    ) -> impl Future<Output = Result<(), SmartHubError>> + Send;
}

impl<T: ScenarioRepository + Send + Sync> ScenarioRepository for Arc<T> {
    fn find_by_hub(
        &self,
        hub_id: &HubId,
    ) -> impl Future<Output = Result<Vec<Scenario>, SmartHubError>> + Send {
        (**self).find_by_hub(hub_id)
    }

    fn upsert(
        &self,
        scenario: Scenario,
    ) -> impl Future<Output = Result<Scenario, SmartHubError>> + Send {
        (**self).upsert(scenario)
    }

    fn delete(
        &self,
        hub_id: &HubId,
        name: &str,
    ) -> impl Future<Output = Result<(), SmartHubError>> + Send {
        (**self).delete(hub_id, name)
    }
}
