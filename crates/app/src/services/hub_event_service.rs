//! Hub event service — applies hub topology changes to the sensor roster
//! and the scenario directory.

use tokio::sync::mpsc;

use smarthub_domain::error::SmartHubError;
use smarthub_domain::hub_event::{HubEvent, HubEventEnvelope, HubEventPayload};
use smarthub_domain::id::HubId;
use smarthub_domain::scenario::Scenario;
use smarthub_domain::sensor::Sensor;

use crate::ports::{ScenarioRepository, SensorRepository};

/// Application service for hub topology events and the read queries over
/// what they maintain.
pub struct HubEventService<S, R> {
    scenarios: S,
    sensors: R,
}

impl<S, R> HubEventService<S, R>
where
    S: ScenarioRepository,
    R: SensorRepository,
{
    /// Create a new service backed by the given repositories.
    pub fn new(scenarios: S, sensors: R) -> Self {
        Self { scenarios, sensors }
    }

    /// Validate a wire event and apply it.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHubError::Validation`] for a missing envelope field or
    /// a blank scenario name, or a storage error from the repositories.
    pub async fn accept(&self, envelope: HubEventEnvelope) -> Result<(), SmartHubError> {
        let event = HubEvent::try_from(envelope)?;
        self.handle(event).await
    }

    /// Apply one topology event.
    ///
    /// Adding a scenario under an existing name replaces it. Removing an
    /// unknown device or scenario succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHubError::Validation`] for a blank scenario name, or a
    /// storage error from the repositories.
    #[tracing::instrument(skip_all, fields(hub_id = %event.hub_id, kind = event.kind()))]
    pub async fn handle(&self, event: HubEvent) -> Result<(), SmartHubError> {
        let hub_id = event.hub_id;
        match event.payload {
            HubEventPayload::DeviceAdded {
                sensor_id,
                device_type,
            } => {
                self.sensors
                    .register(Sensor {
                        id: sensor_id,
                        hub_id,
                        device_type,
                    })
                    .await?;
            }
            HubEventPayload::DeviceRemoved { sensor_id } => {
                self.sensors.remove(&hub_id, &sensor_id).await?;
            }
            HubEventPayload::ScenarioAdded {
                name,
                conditions,
                actions,
            } => {
                let scenario = Scenario {
                    hub_id,
                    name,
                    conditions,
                    actions,
                };
                scenario.validate()?;
                self.scenarios.upsert(scenario).await?;
            }
            HubEventPayload::ScenarioRemoved { name } => {
                self.scenarios.delete(&hub_id, &name).await?;
            }
        }
        tracing::info!("hub event applied");
        Ok(())
    }

    /// List the scenarios defined for a hub.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_scenarios(&self, hub_id: &HubId) -> Result<Vec<Scenario>, SmartHubError> {
        self.scenarios.find_by_hub(hub_id).await
    }

    /// List the sensors registered on a hub.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_sensors(&self, hub_id: &HubId) -> Result<Vec<Sensor>, SmartHubError> {
        self.sensors.find_by_hub(hub_id).await
    }

    /// Consume the hub event stream until every sender is dropped.
    pub async fn run(&self, mut receiver: mpsc::Receiver<HubEventEnvelope>) {
        while let Some(envelope) = receiver.recv().await {
            match self.accept(envelope).await {
                Ok(()) => {}
                Err(SmartHubError::Validation(err)) => {
                    tracing::warn!(error = %err, "dropping malformed hub event");
                }
                Err(err) => {
                    tracing::error!(error = %err.chain(), "failed to apply hub event");
                }
            }
        }
        tracing::info!("hub event stream closed, hub event service stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smarthub_domain::error::ValidationError;
    use smarthub_domain::id::SensorId;
    use smarthub_domain::scenario::{Action, ActionType, Condition, ConditionType, Operator};
    use smarthub_domain::sensor::DeviceType;
    use std::collections::HashMap;
    use std::future::Future;
    use std::sync::Mutex;

    #[derive(Default)]
    struct InMemoryScenarioRepo {
        store: Mutex<HashMap<(HubId, String), Scenario>>,
    }

    impl ScenarioRepository for InMemoryScenarioRepo {
        fn find_by_hub(
            &self,
            hub_id: &HubId,
        ) -> impl Future<Output = Result<Vec<Scenario>, SmartHubError>> + Send {
            let store = self.store.lock().unwrap();
            let mut result: Vec<Scenario> = store
                .values()
                .filter(|s| &s.hub_id == hub_id)
                .cloned()
                .collect();
            result.sort_by(|a, b| a.name.cmp(&b.name));
            async { Ok(result) }
        }

        fn upsert(
            &self,
            scenario: Scenario,
        ) -> impl Future<Output = Result<Scenario, SmartHubError>> + Send {
            let mut store = self.store.lock().unwrap();
            store.insert(
                (scenario.hub_id.clone(), scenario.name.clone()),
                scenario.clone(),
            );
            async { Ok(scenario) }
        }

        fn delete(
            &self,
            hub_id: &HubId,
            name: &str,
        ) -> impl Future<Output = Result<(), SmartHubError>> + Send {
            let mut store = self.store.lock().unwrap();
            store.remove(&(hub_id.clone(), name.to_string()));
            async { Ok(()) }
        }
    }

    #[derive(Default)]
    struct InMemorySensorRepo {
        store: Mutex<HashMap<(HubId, SensorId), Sensor>>,
    }

    impl SensorRepository for InMemorySensorRepo {
        fn register(
            &self,
            sensor: Sensor,
        ) -> impl Future<Output = Result<Sensor, SmartHubError>> + Send {
            let mut store = self.store.lock().unwrap();
            store.insert((sensor.hub_id.clone(), sensor.id.clone()), sensor.clone());
            async { Ok(sensor) }
        }

        fn remove(
            &self,
            hub_id: &HubId,
            sensor_id: &SensorId,
        ) -> impl Future<Output = Result<(), SmartHubError>> + Send {
            let mut store = self.store.lock().unwrap();
            store.remove(&(hub_id.clone(), sensor_id.clone()));
            async { Ok(()) }
        }

        fn find_by_hub(
            &self,
            hub_id: &HubId,
        ) -> impl Future<Output = Result<Vec<Sensor>, SmartHubError>> + Send {
            let store = self.store.lock().unwrap();
            let result: Vec<Sensor> = store
                .values()
                .filter(|s| &s.hub_id == hub_id)
                .cloned()
                .collect();
            async { Ok(result) }
        }
    }

    fn make_service() -> HubEventService<InMemoryScenarioRepo, InMemorySensorRepo> {
        HubEventService::new(
            InMemoryScenarioRepo::default(),
            InMemorySensorRepo::default(),
        )
    }

    fn hub() -> HubId {
        HubId::new("hub-1").unwrap()
    }

    fn event(payload: HubEventPayload) -> HubEvent {
        HubEvent {
            hub_id: hub(),
            timestamp: smarthub_domain::time::now(),
            payload,
        }
    }

    fn scenario_added(name: &str, threshold: i64) -> HubEventPayload {
        HubEventPayload::ScenarioAdded {
            name: name.to_string(),
            conditions: vec![Condition {
                sensor_id: SensorId::new("climate-1").unwrap(),
                kind: ConditionType::Co2Level,
                operator: Operator::GreaterThan,
                threshold,
            }],
            actions: vec![Action {
                sensor_id: SensorId::new("vent-1").unwrap(),
                kind: ActionType::Activate,
                value: None,
            }],
        }
    }

    #[tokio::test]
    async fn should_register_and_remove_device() {
        let svc = make_service();
        svc.handle(event(HubEventPayload::DeviceAdded {
            sensor_id: SensorId::new("motion-1").unwrap(),
            device_type: DeviceType::MotionSensor,
        }))
        .await
        .unwrap();

        let sensors = svc.list_sensors(&hub()).await.unwrap();
        assert_eq!(sensors.len(), 1);
        assert_eq!(sensors[0].device_type, DeviceType::MotionSensor);

        svc.handle(event(HubEventPayload::DeviceRemoved {
            sensor_id: SensorId::new("motion-1").unwrap(),
        }))
        .await
        .unwrap();
        assert!(svc.list_sensors(&hub()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_replace_scenario_defined_under_same_name() {
        let svc = make_service();
        svc.handle(event(scenario_added("ventilate", 800)))
            .await
            .unwrap();
        svc.handle(event(scenario_added("ventilate", 1200)))
            .await
            .unwrap();

        let scenarios = svc.list_scenarios(&hub()).await.unwrap();
        assert_eq!(scenarios.len(), 1);
        assert_eq!(scenarios[0].conditions[0].threshold, 1200);
    }

    #[tokio::test]
    async fn should_delete_scenario() {
        let svc = make_service();
        svc.handle(event(scenario_added("ventilate", 800)))
            .await
            .unwrap();
        svc.handle(event(HubEventPayload::ScenarioRemoved {
            name: "ventilate".to_string(),
        }))
        .await
        .unwrap();
        assert!(svc.list_scenarios(&hub()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_succeed_when_removing_unknown_scenario() {
        let svc = make_service();
        let result = svc
            .handle(event(HubEventPayload::ScenarioRemoved {
                name: "ghost".to_string(),
            }))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn should_reject_scenario_with_blank_name() {
        let svc = make_service();
        let result = svc.handle(event(scenario_added(" ", 800))).await;
        assert!(matches!(
            result,
            Err(SmartHubError::Validation(ValidationError::EmptyName))
        ));
        assert!(svc.list_scenarios(&hub()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_reject_envelope_without_hub_id() {
        let svc = make_service();
        let envelope = HubEventEnvelope {
            hub_id: None,
            ..HubEventEnvelope::from(event(scenario_added("ventilate", 800)))
        };
        let result = svc.accept(envelope).await;
        assert!(matches!(
            result,
            Err(SmartHubError::Validation(ValidationError::MissingField(
                "hub_id"
            )))
        ));
    }

    #[tokio::test]
    async fn should_apply_stream_until_closed() {
        let svc = make_service();
        let (sender, receiver) = mpsc::channel(8);
        sender
            .send(HubEventEnvelope::from(event(scenario_added("a", 1))))
            .await
            .unwrap();
        sender.send(HubEventEnvelope::default()).await.unwrap();
        sender
            .send(HubEventEnvelope::from(event(scenario_added("b", 2))))
            .await
            .unwrap();
        drop(sender);

        svc.run(receiver).await;

        let names: Vec<String> = svc
            .list_scenarios(&hub())
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, ["a", "b"]);
    }
}
