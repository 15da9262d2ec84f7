//! Scenario — a named rule of a hub: when every [`Condition`] holds on the
//! hub snapshot, the [`Action`]s are sent to their devices in order.
//!
//! At most one scenario exists per `(hub_id, name)`; defining a scenario
//! under an existing name replaces the previous one.

mod action;
mod condition;

pub use action::{Action, ActionType, DeviceActionRequest};
pub use condition::{Condition, ConditionType, Operator};

use serde::{Deserialize, Serialize};

use crate::error::{SmartHubError, ValidationError};
use crate::id::HubId;
use crate::snapshot::HubSnapshot;

/// A conjunction of sensor conditions triggering a sequence of actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub hub_id: HubId,
    pub name: String,
    pub conditions: Vec<Condition>,
    pub actions: Vec<Action>,
}

impl Scenario {
    /// Create a builder for constructing a [`Scenario`].
    #[must_use]
    pub fn builder() -> ScenarioBuilder {
        ScenarioBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHubError::Validation`] when `name` is blank.
    pub fn validate(&self) -> Result<(), SmartHubError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(())
    }

    /// Whether every condition holds on `snapshot`.
    ///
    /// Conditions are checked in order and evaluation stops at the first
    /// failure. A scenario without conditions is never satisfied.
    #[must_use]
    pub fn is_satisfied_by(&self, snapshot: &HubSnapshot) -> bool {
        !self.conditions.is_empty()
            && self
                .conditions
                .iter()
                .all(|condition| condition.is_satisfied_by(snapshot))
    }
}

/// Step-by-step builder for [`Scenario`].
#[derive(Debug, Default)]
pub struct ScenarioBuilder {
    hub_id: Option<HubId>,
    name: Option<String>,
    conditions: Vec<Condition>,
    actions: Vec<Action>,
}

impl ScenarioBuilder {
    #[must_use]
    pub fn hub_id(mut self, hub_id: HubId) -> Self {
        self.hub_id = Some(hub_id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    #[must_use]
    pub fn action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    /// Consume the builder, validate, and return a [`Scenario`].
    ///
    /// # Errors
    ///
    /// Returns [`SmartHubError::Validation`] if the hub is missing or the
    /// name is blank.
    pub fn build(self) -> Result<Scenario, SmartHubError> {
        let scenario = Scenario {
            hub_id: self.hub_id.ok_or(ValidationError::MissingField("hub_id"))?,
            name: self.name.unwrap_or_default(),
            conditions: self.conditions,
            actions: self.actions,
        };
        scenario.validate()?;
        Ok(scenario)
    }
}
