//! Scenario evaluator — matches each new hub snapshot against the scenarios
//! of its hub and hands the satisfied ones to the [`ActionDispatcher`].

use std::sync::Arc;

use tokio::sync::broadcast;

use smarthub_domain::error::SmartHubError;
use smarthub_domain::id::HubId;
use smarthub_domain::snapshot::HubSnapshot;

use crate::dispatcher::{ActionDispatcher, DispatchSummary};
use crate::ports::{DeviceControl, ScenarioRepository};

/// What happened while processing one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationReport {
    pub hub_id: HubId,
    /// Number of scenarios defined for the hub.
    pub scenarios_checked: usize,
    /// Names of the scenarios whose conditions all held.
    pub satisfied: Vec<String>,
    pub dispatch: DispatchSummary,
}

impl EvaluationReport {
    /// `true` when no scenario matched the snapshot.
    #[must_use]
    pub fn is_no_match(&self) -> bool {
        self.satisfied.is_empty()
    }
}

/// Evaluates scenarios against snapshots.
pub struct ScenarioEvaluator<R, D> {
    scenarios: R,
    dispatcher: ActionDispatcher<D>,
}

impl<R, D> ScenarioEvaluator<R, D>
where
    R: ScenarioRepository,
    D: DeviceControl,
{
    pub fn new(scenarios: R, dispatcher: ActionDispatcher<D>) -> Self {
        Self {
            scenarios,
            dispatcher,
        }
    }

    /// Load the scenarios of the snapshot's hub, collect the satisfied ones
    /// and dispatch their actions.
    ///
    /// # Errors
    ///
    /// Returns the repository error when the scenarios cannot be loaded.
    /// Dispatch failures are reported in [`EvaluationReport::dispatch`].
    #[tracing::instrument(skip_all, fields(hub_id = %snapshot.hub_id))]
    pub async fn evaluate(
        &self,
        snapshot: &HubSnapshot,
    ) -> Result<EvaluationReport, SmartHubError> {
        let scenarios = self.scenarios.find_by_hub(&snapshot.hub_id).await?;
        let scenarios_checked = scenarios.len();

        let satisfied: Vec<_> = scenarios
            .into_iter()
            .filter(|scenario| scenario.is_satisfied_by(snapshot))
            .collect();

        let mut dispatch = DispatchSummary::default();
        for scenario in &satisfied {
            tracing::info!(scenario = %scenario.name, "scenario satisfied");
            dispatch += self.dispatcher.dispatch(scenario).await;
        }

        Ok(EvaluationReport {
            hub_id: snapshot.hub_id.clone(),
            scenarios_checked,
            satisfied: satisfied.into_iter().map(|s| s.name).collect(),
            dispatch,
        })
    }

    /// Consume the snapshot stream until it closes.
    ///
    /// A snapshot whose scenarios cannot be loaded is skipped. When the
    /// receiver falls behind, the missed snapshots are logged and the loop
    /// resumes with the oldest one still buffered.
    pub async fn run(&self, mut receiver: broadcast::Receiver<Arc<HubSnapshot>>) {
        loop {
            match receiver.recv().await {
                Ok(snapshot) => match self.evaluate(&snapshot).await {
                    Ok(report) if report.is_no_match() => {
                        tracing::debug!(hub_id = %report.hub_id, "no scenario matched");
                    }
                    Ok(_) => {}
                    Err(err) => {
                        tracing::error!(hub_id = %snapshot.hub_id, error = %err.chain(), "failed to load scenarios");
                    }
                },
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "scenario evaluator lagging, snapshots skipped");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
        tracing::info!("snapshot stream closed, scenario evaluator stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smarthub_domain::id::SensorId;
    use smarthub_domain::scenario::{
        Action, ActionType, Condition, ConditionType, DeviceActionRequest, Operator, Scenario,
    };
    use smarthub_domain::sensor::SensorPayload;
    use smarthub_domain::snapshot::MergeOutcome;
    use std::collections::HashMap;
    use std::future::Future;
    use std::sync::Mutex;

    #[derive(Default)]
    struct InMemoryScenarioRepo {
        store: Mutex<HashMap<(HubId, String), Scenario>>,
        broken: bool,
    }

    impl ScenarioRepository for InMemoryScenarioRepo {
        fn find_by_hub(
            &self,
            hub_id: &HubId,
        ) -> impl Future<Output = Result<Vec<Scenario>, SmartHubError>> + Send {
            let result = if self.broken {
                Err(SmartHubError::Storage("database is locked".into()))
            } else {
                let store = self.store.lock().unwrap();
                Ok(store
                    .values()
                    .filter(|s| &s.hub_id == hub_id)
                    .cloned()
                    .collect())
            };
            async { result }
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
    struct RecordingControl {
        calls: Mutex<Vec<DeviceActionRequest>>,
    }

    impl DeviceControl for RecordingControl {
        fn dispatch(
            &self,
            request: DeviceActionRequest,
        ) -> impl Future<Output = Result<(), SmartHubError>> + Send {
            self.calls.lock().unwrap().push(request);
            async { Ok(()) }
        }
    }

    fn hub() -> HubId {
        HubId::new("hub-1").unwrap()
    }

    fn sid(value: &str) -> SensorId {
        SensorId::new(value).unwrap()
    }

    fn light(luminosity: i64) -> SensorPayload {
        SensorPayload::Light {
            link_quality: 90,
            luminosity,
        }
    }

    fn snapshot(readings: &[(&str, SensorPayload)]) -> HubSnapshot {
        let now = smarthub_domain::time::now();
        let mut snapshot = HubSnapshot::empty(hub(), now);
        for (sensor, payload) in readings {
            if let MergeOutcome::Applied(next) = snapshot.merge(&sid(sensor), now, payload) {
                snapshot = next;
            }
        }
        snapshot
    }

    fn luminosity_above(sensor: &str, threshold: i64) -> Condition {
        Condition {
            sensor_id: sid(sensor),
            kind: ConditionType::Luminosity,
            operator: Operator::GreaterThan,
            threshold,
        }
    }

    fn activate(sensor: &str) -> Action {
        Action {
            sensor_id: sid(sensor),
            kind: ActionType::Activate,
            value: None,
        }
    }

    fn scenario(name: &str, conditions: Vec<Condition>, actions: Vec<Action>) -> Scenario {
        Scenario {
            hub_id: hub(),
            name: name.to_string(),
            conditions,
            actions,
        }
    }

    type TestEvaluator = ScenarioEvaluator<InMemoryScenarioRepo, Arc<RecordingControl>>;

    async fn evaluator_with(scenarios: Vec<Scenario>) -> (TestEvaluator, Arc<RecordingControl>) {
        let repo = InMemoryScenarioRepo::default();
        for s in scenarios {
            repo.upsert(s).await.unwrap();
        }
        let control = Arc::new(RecordingControl::default());
        let evaluator = ScenarioEvaluator::new(repo, ActionDispatcher::new(Arc::clone(&control)));
        (evaluator, control)
    }

    fn calls(control: &RecordingControl) -> usize {
        control.calls.lock().unwrap().len()
    }

    #[tokio::test]
    async fn should_dispatch_when_condition_holds() {
        let (evaluator, control) = evaluator_with(vec![scenario(
            "bright",
            vec![luminosity_above("s1", 50)],
            vec![activate("blind-1")],
        )])
        .await;

        let report = evaluator.evaluate(&snapshot(&[("s1", light(80))])).await.unwrap();

        assert_eq!(report.satisfied, vec!["bright".to_string()]);
        assert_eq!(report.dispatch.dispatched, 1);
        assert_eq!(calls(&control), 1);
    }

    #[tokio::test]
    async fn should_not_dispatch_when_threshold_not_reached() {
        let (evaluator, control) = evaluator_with(vec![scenario(
            "bright",
            vec![luminosity_above("s1", 90)],
            vec![activate("blind-1")],
        )])
        .await;

        let report = evaluator.evaluate(&snapshot(&[("s1", light(80))])).await.unwrap();

        assert!(report.is_no_match());
        assert_eq!(report.scenarios_checked, 1);
        assert_eq!(calls(&control), 0);
    }

    #[tokio::test]
    async fn should_require_every_condition() {
        let (evaluator, control) = evaluator_with(vec![scenario(
            "both",
            vec![luminosity_above("s1", 50), luminosity_above("s2", 50)],
            vec![activate("lamp-1")],
        )])
        .await;

        let one_true = snapshot(&[("s1", light(80)), ("s2", light(10))]);
        assert!(evaluator.evaluate(&one_true).await.unwrap().is_no_match());
        assert_eq!(calls(&control), 0);

        let both_true = snapshot(&[("s1", light(80)), ("s2", light(60))]);
        let report = evaluator.evaluate(&both_true).await.unwrap();
        assert_eq!(report.satisfied, vec!["both".to_string()]);
        assert_eq!(calls(&control), 1);
    }

    #[tokio::test]
    async fn should_dispatch_every_satisfied_scenario() {
        let (evaluator, control) = evaluator_with(vec![
            scenario("a", vec![luminosity_above("s1", 10)], vec![activate("x")]),
            scenario(
                "b",
                vec![luminosity_above("s1", 20)],
                vec![activate("y"), activate("z")],
            ),
            scenario("c", vec![luminosity_above("s1", 500)], vec![activate("w")]),
        ])
        .await;

        let mut report = evaluator.evaluate(&snapshot(&[("s1", light(80))])).await.unwrap();
        report.satisfied.sort();

        assert_eq!(report.satisfied, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(report.scenarios_checked, 3);
        assert_eq!(report.dispatch.dispatched, 3);
        assert_eq!(calls(&control), 3);
    }

    #[tokio::test]
    async fn should_ignore_scenarios_of_other_hubs() {
        let mut foreign = scenario("bright", vec![luminosity_above("s1", 50)], vec![activate("x")]);
        foreign.hub_id = HubId::new("hub-2").unwrap();
        let (evaluator, control) = evaluator_with(vec![foreign]).await;

        let report = evaluator.evaluate(&snapshot(&[("s1", light(80))])).await.unwrap();
        assert_eq!(report.scenarios_checked, 0);
        assert!(report.is_no_match());
        assert_eq!(calls(&control), 0);
    }

    #[tokio::test]
    async fn should_never_match_scenario_without_conditions() {
        let (evaluator, control) =
            evaluator_with(vec![scenario("empty", Vec::new(), vec![activate("x")])]).await;
        let report = evaluator.evaluate(&snapshot(&[("s1", light(80))])).await.unwrap();
        assert!(report.is_no_match());
        assert_eq!(calls(&control), 0);
    }

    #[tokio::test]
    async fn should_propagate_directory_failure() {
        let repo = InMemoryScenarioRepo {
            broken: true,
            ..Default::default()
        };
        let evaluator =
            ScenarioEvaluator::new(repo, ActionDispatcher::new(RecordingControl::default()));
        let result = evaluator.evaluate(&snapshot(&[("s1", light(80))])).await;
        assert!(matches!(result, Err(SmartHubError::Storage(_))));
    }

    #[tokio::test]
    async fn should_evaluate_stream_until_closed() {
        let (evaluator, control) = evaluator_with(vec![scenario(
            "bright",
            vec![luminosity_above("s1", 50)],
            vec![activate("blind-1")],
        )])
        .await;
        let (sender, receiver) = broadcast::channel(8);
        sender.send(Arc::new(snapshot(&[("s1", light(80))]))).unwrap();
        sender.send(Arc::new(snapshot(&[("s1", light(10))]))).unwrap();
        sender.send(Arc::new(snapshot(&[("s1", light(99))]))).unwrap();
        drop(sender);

        evaluator.run(receiver).await;

        assert_eq!(calls(&control), 2);
    }
}
