//! Sensor repository port: the roster of devices registered on each hub.

use std::future::Future;
use std::sync::Arc;

use smarthub_domain::error::SmartHubError;
use smarthub_domain::id::{HubId, SensorId};
use smarthub_domain::sensor::Sensor;

/// Repository for persisting and querying [`Sensor`]s.
pub trait SensorRepository {
    /// Register a sensor. Registering it again overwrites its device type.
    fn register(&self, sensor: Sensor)
    -> impl Future<Output = Result<Sensor, SmartHubError>> + Send;

    /// Remove a sensor from a hub. Removing a missing sensor is not an error.
    fn remove(
        &self,
        hub_id: &HubId,
        sensor_id: &SensorId,
    ) -> impl Future<Output = Result<(), SmartHubError>> + Send;

    /// All sensors registered on a hub.
    fn find_by_hub(
        &self,
        hub_id: &HubId,
    ) -> impl Future<Output = Result<Vec<Sensor>, SmartHubError>> + Send;
}

impl<T: SensorRepository + Send + Sync> SensorRepository for Arc<T> {
    fn register(
        &self,
        sensor: Sensor,
    ) -> impl Future<Output = Result<Sensor, SmartHubError>> + Send {
        (**self).register(sensor)
    }

    fn remove(
        &self,
        hub_id: &HubId,
        sensor_id: &SensorId,
    ) -> impl Future<Output = Result<(), SmartHubError>> + Send {
        (**self).remove(hub_id, sensor_id)
    }

    fn find_by_hub(
        &self,
        hub_id: &HubId,
    ) -> impl Future<Output = Result<Vec<Sensor>, SmartHubError>> + Send {
        (**self).find_by_hub(hub_id)
    }
}
