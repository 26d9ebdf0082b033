//! Policy statements

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::condition::{ConditionEntry, Conditions};
use crate::types::Effect;

pub const EXECUTE_API_INVOKE: &str = "execute-api:Invoke";

/// One effect bundled with its action, resources and conditions.
///
/// Serializes with the capitalized IAM field names:
/// `{"Effect", "Action", "Resource", "Condition"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Statement {
    effect: Effect,
    action: String,
    #[serde(rename = "Resource", deserialize_with = "one_or_many")]
    resources: Vec<String>,
    #[serde(rename = "Condition", default)]
    conditions: Conditions,
}

impl Statement {
    /// Statement for a custom action with no resources or conditions
    pub fn new(effect: Effect, action: impl Into<String>) -> Self {
        Self {
            effect,
            action: action.into(),
            resources: Vec::new(),
            conditions: Conditions::new(),
        }
    }

    /// `execute-api:Invoke` statement with no resources or conditions
    pub fn empty_invoke(effect: Effect) -> Self {
        Self::new(effect, EXECUTE_API_INVOKE)
    }

    /// Append a resource. Order is kept and duplicates are allowed.
    pub fn add_resource(&mut self, arn: impl Into<String>) {
        self.resources.push(arn.into());
    }

    /// Set the condition for `operator`, replacing any key previously held
    /// under the same operator.
    pub fn add_condition(
        &mut self,
        operator: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Option<ConditionEntry> {
        self.conditions.insert(operator, key, value)
    }

    #[must_use]
    pub fn with_resource(mut self, arn: impl Into<String>) -> Self {
        self.add_resource(arn);
        self
    }

    #[must_use]
    pub fn with_condition(
        mut self,
        operator: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.add_condition(operator, key, value);
        self
    }

    pub fn effect(&self) -> Effect {
        self.effect
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn resources(&self) -> &[String] {
        &self.resources
    }

    pub fn conditions(&self) -> &Conditions {
        &self.conditions
    }
}

// IAM accepts either a single string or an array for `Resource`.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Single(String),
    Multiple(Vec<String>),
}

fn one_or_many<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::Single(resource) => vec![resource],
        OneOrMany::Multiple(resources) => resources,
    })
}
