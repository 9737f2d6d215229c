//! Fixture rule definitions and their evaluator.
//!
//! Rules are deliberately small: one condition over a field of the target,
//! with an optional precondition and optional type scope.

use crate::binding::resolve_path;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Embedded rule and baseline definitions
#[derive(Debug, Clone, Deserialize)]
pub struct FixtureDocument {
    pub module: String,
    pub source_path: String,
    pub rules: Vec<RuleDefinition>,
    #[serde(default)]
    pub baselines: Vec<BaselineDefinition>,
}

/// One rule
#[derive(Debug, Clone, Deserialize)]
pub struct RuleDefinition {
    pub name: String,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    /// Rule applies only when this holds
    #[serde(default)]
    pub precondition: Option<Condition>,
    /// Rule applies only to targets whose `Type` is listed; empty means any
    #[serde(default)]
    pub types: Vec<String>,
    pub condition: Condition,
}

/// A named selection of rules
#[derive(Debug, Clone, Deserialize)]
pub struct BaselineDefinition {
    pub name: String,
    pub rules: Vec<String>,
}

/// Comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Op {
    Equals,
    Exists,
    Greater,
    StartsWith,
}

/// A test against one (possibly dotted) field of the target
#[derive(Debug, Clone, Deserialize)]
pub struct Condition {
    pub field: String,
    pub op: Op,
    #[serde(default)]
    pub value: Value,
}

impl Condition {
    pub fn holds(&self, target: &Value) -> bool {
        let Some(actual) = resolve_path(target, &self.field) else {
            return false;
        };
        match self.op {
            Op::Exists => !actual.is_null(),
            Op::Equals => actual == &self.value,
            Op::Greater => match (actual.as_f64(), self.value.as_f64()) {
                (Some(a), Some(b)) => a > b,
                _ => false,
            },
            Op::StartsWith => match (actual.as_str(), self.value.as_str()) {
                (Some(a), Some(prefix)) => a.starts_with(prefix),
                _ => false,
            },
        }
    }
}

impl RuleDefinition {
    /// Whether the precondition (if any) holds
    pub fn applies_to(&self, target: &Value) -> bool {
        self.precondition.as_ref().is_none_or(|c| c.holds(target))
    }

    /// Whether the target's `Type` is in scope
    pub fn matches_type(&self, target: &Value) -> bool {
        if self.types.is_empty() {
            return true;
        }
        target
            .get("Type")
            .and_then(Value::as_str)
            .is_some_and(|t| self.types.iter().any(|s| s == t))
    }

    pub fn evaluate(&self, target: &Value) -> bool {
        self.condition.holds(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn condition(field: &str, op: Op, value: Value) -> Condition {
        Condition {
            field: field.to_string(),
            op,
            value,
        }
    }

    #[test]
    fn test_operators() {
        let target = json!({
            "Value": "Test",
            "Size": 150,
            "Type": "Virtual.Machine",
            "Properties": { "metadata": { "identifier": "vm-1" } }
        });

        assert!(condition("Value", Op::Equals, json!("Test")).holds(&target));
        assert!(!condition("Value", Op::Equals, json!("Other")).holds(&target));
        assert!(condition("Size", Op::Greater, json!(100)).holds(&target));
        assert!(!condition("Size", Op::Greater, json!(200)).holds(&target));
        assert!(condition("Type", Op::StartsWith, json!("Virtual.")).holds(&target));
        assert!(condition("Properties.metadata.identifier", Op::Exists, Value::Null).holds(&target));
        assert!(!condition("Missing", Op::Exists, Value::Null).holds(&target));
    }

    #[test]
    fn test_scope() {
        let rule: RuleDefinition = serde_json::from_value(json!({
            "name": "StorageOnly",
            "types": ["Storage.Account"],
            "precondition": { "field": "Value", "op": "equals", "value": "Test" },
            "condition": { "field": "Name", "op": "exists" }
        }))
        .unwrap();

        let storage = json!({ "Type": "Storage.Account", "Value": "Test", "Name": "a" });
        let vm = json!({ "Type": "Virtual.Machine", "Value": "Other" });

        assert!(rule.matches_type(&storage));
        assert!(rule.applies_to(&storage));
        assert!(rule.evaluate(&storage));
        assert!(!rule.matches_type(&vm));
        assert!(!rule.applies_to(&vm));
    }
}
