//! Statement condition blocks
//!
//! IAM writes conditions as `{ "<operator>": { "<key>": <value> } }`. This
//! crate keeps exactly one key per operator: adding a second key under an
//! operator replaces the first.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::AuthPolicyError;

/// The single (key, value) pair held under one condition operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionEntry {
    pub key: String,
    pub value: Value,
}

impl ConditionEntry {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl Serialize for ConditionEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.key, &self.value)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for ConditionEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntryVisitor;

        impl<'de> Visitor<'de> for EntryVisitor {
            type Value = ConditionEntry;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map holding exactly one condition key")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<ConditionEntry, A::Error> {
                let Some((key, value)) = map.next_entry::<String, Value>()? else {
                    return Err(de::Error::custom(AuthPolicyError::condition(
                        "operator has no condition key",
                    )));
                };
                if map.next_key::<de::IgnoredAny>()?.is_some() {
                    return Err(de::Error::custom(AuthPolicyError::condition(format!(
                        "operator holds more than one condition key (first was '{key}')"
                    ))));
                }
                Ok(ConditionEntry { key, value })
            }
        }

        deserializer.deserialize_map(EntryVisitor)
    }
}

/// Condition block of a statement, keyed by operator name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conditions(BTreeMap<String, ConditionEntry>);

impl Conditions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the entry for `operator`, returning the entry it replaced.
    pub fn insert(
        &mut self,
        operator: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Option<ConditionEntry> {
        self.0.insert(operator.into(), ConditionEntry::new(key, value))
    }

    pub fn get(&self, operator: &str) -> Option<&ConditionEntry> {
        self.0.get(operator)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConditionEntry)> {
        self.0.iter().map(|(operator, entry)| (operator.as_str(), entry))
    }
}
