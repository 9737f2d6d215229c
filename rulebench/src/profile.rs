//! Fixture rule-engine profile.
//!
//! The subject the `rulebench` binary measures. `prepare` parses the embedded
//! rule definitions into classified [`LanguageBlock`]s and generates a fixed
//! set of synthetic targets; every operation then works over that data
//! without keeping anything between calls.

use crate::binding::TargetBinding;
use crate::rules::{FixtureDocument, RuleDefinition};
use anyhow::{Context, bail};
use rulebench_core::{
    BlockBody, ClassificationKind, LanguageBlock, OperationResult, RuleProfile, RuleSet,
};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::hint::black_box;

const FIXTURE_RULES: &str = include_str!("../fixtures/rules.json");

/// Synthetic targets generated by `prepare`
pub const DEFAULT_TARGET_COUNT: usize = 1000;

const TARGET_TYPES: [&str; 3] = ["Virtual.Machine", "Storage.Account", "Network.Interface"];

struct Prepared {
    module: String,
    rules: Vec<RuleDefinition>,
    rule_set: RuleSet,
    targets: Vec<Value>,
    default: TargetBinding,
    custom: TargetBinding,
    nested: TargetBinding,
}

/// Rule profile over embedded fixtures
pub struct FixtureProfile {
    target_count: usize,
    state: Option<Prepared>,
}

impl FixtureProfile {
    pub fn new() -> Self {
        Self::with_targets(DEFAULT_TARGET_COUNT)
    }

    /// Profile generating `count` targets
    pub fn with_targets(count: usize) -> Self {
        Self {
            target_count: count,
            state: None,
        }
    }

    /// Classified blocks loaded by `prepare`
    pub fn rule_set(&self) -> Option<&RuleSet> {
        self.state.as_ref().map(|s| &s.rule_set)
    }

    fn state(&self) -> anyhow::Result<&Prepared> {
        match &self.state {
            Some(state) => Ok(state),
            None => bail!("profile used before prepare()"),
        }
    }
}

impl Default for FixtureProfile {
    fn default() -> Self {
        Self::new()
    }
}

/// Turn parsed definitions into classified blocks
fn classify(document: &FixtureDocument) -> anyhow::Result<RuleSet> {
    let mut blocks = Vec::with_capacity(document.rules.len() + document.baselines.len());
    for rule in &document.rules {
        blocks.push(LanguageBlock::new(
            ClassificationKind::Rule,
            &document.source_path,
            &document.module,
            &rule.name,
            BlockBody::Rule {
                tags: rule.tags.clone(),
            },
        )?);
    }
    for baseline in &document.baselines {
        if let Some(missing) = baseline
            .rules
            .iter()
            .find(|r| !document.rules.iter().any(|d| &d.name == *r))
        {
            bail!(
                "baseline `{}` includes unknown rule `{missing}`",
                baseline.name
            );
        }
        blocks.push(LanguageBlock::baseline(
            &document.source_path,
            &document.module,
            &baseline.name,
            baseline.rules.clone(),
        )?);
    }
    Ok(RuleSet::from_blocks(blocks)?)
}

/// Deterministic synthetic target `i`.
///
/// A third of targets carry `TargetName`, a third only `Name`, and the rest
/// neither, so the default binding exercises every path.
fn synthetic_target(i: usize) -> Value {
    let value = if i % 2 == 0 { "Test" } else { "Other" };
    let mut target = json!({
        "Value": value,
        "Type": TARGET_TYPES[i % TARGET_TYPES.len()],
        "Size": (i * 7) % 250,
        "Alias": format!("alias-{i}"),
        "Properties": {
            "metadata": { "identifier": format!("resource-{i}") }
        }
    });
    if let Some(object) = target.as_object_mut() {
        match i % 3 {
            0 => {
                object.insert("TargetName".into(), json!(format!("target-{i}")));
            }
            1 => {
                object.insert("Name".into(), json!(format!("name-{i}")));
            }
            _ => {}
        }
    }
    target
}

impl FixtureProfile {
    fn bind_all(&self, binding: impl Fn(&Prepared) -> &TargetBinding) -> OperationResult {
        let state = self.state()?;
        let binding = binding(state);
        let mut bytes = 0usize;
        for target in &state.targets {
            bytes += binding.bind(target)?.len();
        }
        black_box(bytes);
        Ok(())
    }
}

impl RuleProfile for FixtureProfile {
    fn prepare(&mut self) -> anyhow::Result<()> {
        let document: FixtureDocument =
            serde_json::from_str(FIXTURE_RULES).context("failed to parse fixture rules")?;
        let rule_set = classify(&document)?;
        let targets = (0..self.target_count).map(synthetic_target).collect();

        self.state = Some(Prepared {
            module: document.module,
            rules: document.rules,
            rule_set,
            targets,
            default: TargetBinding::Default,
            custom: TargetBinding::Custom(vec!["ResourceName".into(), "Alias".into()]),
            nested: TargetBinding::Nested("Properties.metadata.identifier".into()),
        });
        Ok(())
    }

    fn invoke(&mut self) -> OperationResult {
        let state = self.state()?;
        let mut passed = 0usize;
        for target in &state.targets {
            for rule in &state.rules {
                passed += usize::from(rule.evaluate(target));
            }
        }
        black_box(passed);
        Ok(())
    }

    fn invoke_if(&mut self) -> OperationResult {
        let state = self.state()?;
        let mut passed = 0usize;
        for target in &state.targets {
            for rule in state.rules.iter().filter(|r| r.precondition.is_some()) {
                if rule.applies_to(target) {
                    passed += usize::from(rule.evaluate(target));
                }
            }
        }
        black_box(passed);
        Ok(())
    }

    fn invoke_type(&mut self) -> OperationResult {
        let state = self.state()?;
        let mut passed = 0usize;
        for target in &state.targets {
            for rule in state.rules.iter().filter(|r| !r.types.is_empty()) {
                if rule.matches_type(target) {
                    passed += usize::from(rule.evaluate(target));
                }
            }
        }
        black_box(passed);
        Ok(())
    }

    fn invoke_summary(&mut self) -> OperationResult {
        let state = self.state()?;
        let mut summary: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
        for target in &state.targets {
            for rule in &state.rules {
                if !rule.matches_type(target) || !rule.applies_to(target) {
                    continue;
                }
                let counts = summary.entry(rule.name.as_str()).or_default();
                if rule.evaluate(target) {
                    counts.0 += 1;
                } else {
                    counts.1 += 1;
                }
            }
        }
        black_box(summary);
        Ok(())
    }

    fn get(&mut self) -> OperationResult {
        let state = self.state()?;
        let mut tags = 0usize;
        for block in state.rule_set.in_module(&state.module) {
            if let BlockBody::Rule { tags: rule_tags } = block.body() {
                tags += rule_tags.len();
            }
        }
        black_box(tags);
        Ok(())
    }

    fn bind_default(&mut self) -> OperationResult {
        self.bind_all(|s| &s.default)
    }

    fn bind_custom(&mut self) -> OperationResult {
        self.bind_all(|s| &s.custom)
    }

    fn bind_nested(&mut self) -> OperationResult {
        self.bind_all(|s| &s.nested)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rulebench_core::ClassifiedArtifact;

    type Op = fn(&mut FixtureProfile) -> OperationResult;

    const OPERATIONS: [Op; 8] = [
        FixtureProfile::invoke,
        FixtureProfile::invoke_if,
        FixtureProfile::invoke_type,
        FixtureProfile::invoke_summary,
        FixtureProfile::get,
        FixtureProfile::bind_default,
        FixtureProfile::bind_custom,
        FixtureProfile::bind_nested,
    ];

    #[test]
    fn test_operations_fail_before_prepare() {
        let mut profile = FixtureProfile::with_targets(10);
        for op in OPERATIONS {
            let err = op(&mut profile).unwrap_err();
            assert!(err.to_string().contains("before prepare"));
        }
    }

    #[test]
    fn test_operations_succeed_after_prepare() {
        let mut profile = FixtureProfile::with_targets(30);
        profile.prepare().unwrap();
        for op in OPERATIONS {
            op(&mut profile).unwrap();
            op(&mut profile).unwrap();
        }
    }

    #[test]
    fn test_prepare_classifies_fixtures() {
        let mut profile = FixtureProfile::with_targets(1);
        profile.prepare().unwrap();
        let rule_set = profile.rule_set().unwrap();

        assert_eq!(rule_set.rules().count(), 6);
        assert_eq!(rule_set.baselines().count(), 1);
        assert!(
            rule_set
                .in_module("Benchmark")
                .all(|b| b.kind() != ClassificationKind::Unknown)
        );
    }

    #[test]
    fn test_targets_cover_every_binding_path() {
        let names: Vec<String> = (0..3)
            .map(|i| TargetBinding::Default.bind(&synthetic_target(i)).unwrap())
            .collect();
        assert_eq!(names[0], "target-0");
        assert_eq!(names[1], "name-1");
        assert_eq!(names[2].len(), 64);
    }

    #[test]
    fn test_prepare_installs_each_binding() {
        let mut profile = FixtureProfile::with_targets(3);
        profile.prepare().unwrap();
        let state = profile.state().unwrap();

        assert_eq!(state.default, TargetBinding::Default);
        assert!(matches!(state.custom, TargetBinding::Custom(_)));
        assert!(matches!(state.nested, TargetBinding::Nested(_)));
        for target in &state.targets {
            assert_ne!(state.default.bind(target).unwrap(), "");
        }
    }

    #[test]
    fn test_unknown_baseline_rule_rejected() {
        let document: FixtureDocument = serde_json::from_value(json!({
            "module": "Broken",
            "source_path": "broken.json",
            "rules": [
                { "name": "A", "condition": { "field": "Name", "op": "exists" } }
            ],
            "baselines": [ { "name": "B", "rules": ["A", "Missing"] } ]
        }))
        .unwrap();
        let err = classify(&document).unwrap_err();
        assert!(err.to_string().contains("Missing"));
    }
}
