//! Artifact Classification
//!
//! Tags parsed rule-definition artifacts by kind and origin.
//!
//! Every [`LanguageBlock`] carries an explicit [`ClassificationKind`] that is
//! cross-checked against the shape of its [`BlockBody`] at construction.
//! `Unknown` is the fallback for input that has not been (or could not be)
//! classified; a [`RuleSet`] refuses it, so it never reaches consumers of a
//! fully parsed rule set.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Errors raised while materializing an artifact
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArtifactError {
    /// Identity fields are empty or the kind does not match the body
    #[error("invalid artifact: {0}")]
    InvalidArtifact(String),
}

/// Kind of a parsed rule-definition artifact.
///
/// Ordinals are stable because the value may be persisted or compared numerically.
#[repr(u8)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ClassificationKind {
    /// Not yet classified, or malformed
    #[default]
    Unknown = 0,
    /// A rule definition
    Rule = 1,
    /// A baseline selecting a set of rules
    Baseline = 2,
}

impl ClassificationKind {
    /// Stable numeric ordinal
    pub fn ordinal(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for ClassificationKind {
    type Error = ArtifactError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ClassificationKind::Unknown),
            1 => Ok(ClassificationKind::Rule),
            2 => Ok(ClassificationKind::Baseline),
            other => Err(ArtifactError::InvalidArtifact(format!(
                "unknown classification ordinal {other}"
            ))),
        }
    }
}

impl fmt::Display for ClassificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ClassificationKind::Unknown => "unknown",
            ClassificationKind::Rule => "rule",
            ClassificationKind::Baseline => "baseline",
        };
        f.write_str(name)
    }
}

/// Read-only identity of any artifact the engine parses
pub trait ClassifiedArtifact {
    /// Path of the definition file the artifact came from
    fn source_path(&self) -> &str;
    /// Logical module the artifact belongs to
    fn module(&self) -> &str;
    /// Classification tag
    fn kind(&self) -> ClassificationKind;
}

/// Kind-specific content of a block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BlockBody {
    /// No content could be classified
    Unclassified,
    /// Rule metadata
    Rule {
        /// Free-form tags attached to the rule
        #[serde(default)]
        tags: BTreeMap<String, String>,
    },
    /// Rules selected by a baseline
    Baseline {
        /// Names of the included rules
        rules: Vec<String>,
    },
}

impl BlockBody {
    fn kind(&self) -> ClassificationKind {
        match self {
            BlockBody::Unclassified => ClassificationKind::Unknown,
            BlockBody::Rule { .. } => ClassificationKind::Rule,
            BlockBody::Baseline { .. } => ClassificationKind::Baseline,
        }
    }
}

/// A parsed rule-definition artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageBlock {
    kind: ClassificationKind,
    source_path: String,
    module: String,
    name: String,
    body: BlockBody,
}

impl LanguageBlock {
    /// Build a block, validating identity fields and kind/body consistency
    pub fn new(
        kind: ClassificationKind,
        source_path: impl Into<String>,
        module: impl Into<String>,
        name: impl Into<String>,
        body: BlockBody,
    ) -> Result<Self, ArtifactError> {
        let source_path = non_empty("source path", source_path.into())?;
        let module = non_empty("module", module.into())?;
        let name = non_empty("name", name.into())?;

        if body.kind() != kind {
            return Err(ArtifactError::InvalidArtifact(format!(
                "{name}: kind `{kind}` does not match a `{}` body",
                body.kind()
            )));
        }

        if let BlockBody::Baseline { rules } = &body {
            if rules.is_empty() {
                return Err(ArtifactError::InvalidArtifact(format!(
                    "{name}: baseline does not include any rules"
                )));
            }
        }

        Ok(Self {
            kind,
            source_path,
            module,
            name,
            body,
        })
    }

    /// Shorthand for a rule block without tags
    pub fn rule(
        source_path: impl Into<String>,
        module: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<Self, ArtifactError> {
        Self::new(
            ClassificationKind::Rule,
            source_path,
            module,
            name,
            BlockBody::Rule {
                tags: BTreeMap::new(),
            },
        )
    }

    /// Shorthand for a baseline block
    pub fn baseline(
        source_path: impl Into<String>,
        module: impl Into<String>,
        name: impl Into<String>,
        rules: Vec<String>,
    ) -> Result<Self, ArtifactError> {
        Self::new(
            ClassificationKind::Baseline,
            source_path,
            module,
            name,
            BlockBody::Baseline { rules },
        )
    }

    /// Block name, unique within its module
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Kind-specific content
    pub fn body(&self) -> &BlockBody {
        &self.body
    }
}

impl ClassifiedArtifact for LanguageBlock {
    fn source_path(&self) -> &str {
        &self.source_path
    }

    fn module(&self) -> &str {
        &self.module
    }

    fn kind(&self) -> ClassificationKind {
        self.kind
    }
}

fn non_empty(field: &str, value: String) -> Result<String, ArtifactError> {
    if value.trim().is_empty() {
        Err(ArtifactError::InvalidArtifact(format!("{field} is empty")))
    } else {
        Ok(value)
    }
}

/// A fully parsed set of rule-definition artifacts
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    blocks: Vec<LanguageBlock>,
}

impl RuleSet {
    /// Collect blocks into a rule set, rejecting any that are still unclassified
    pub fn from_blocks(
        blocks: impl IntoIterator<Item = LanguageBlock>,
    ) -> Result<Self, ArtifactError> {
        let blocks: Vec<LanguageBlock> = blocks.into_iter().collect();
        if let Some(block) = blocks
            .iter()
            .find(|b| b.kind() == ClassificationKind::Unknown)
        {
            return Err(ArtifactError::InvalidArtifact(format!(
                "{} ({}) was never classified",
                block.name(),
                block.source_path()
            )));
        }
        Ok(Self { blocks })
    }

    /// Rule blocks in load order
    pub fn rules(&self) -> impl Iterator<Item = &LanguageBlock> {
        self.of_kind(ClassificationKind::Rule)
    }

    /// Baseline blocks in load order
    pub fn baselines(&self) -> impl Iterator<Item = &LanguageBlock> {
        self.of_kind(ClassificationKind::Baseline)
    }

    /// All blocks belonging to `module`
    pub fn in_module<'a>(&'a self, module: &'a str) -> impl Iterator<Item = &'a LanguageBlock> {
        self.blocks.iter().filter(move |b| b.module() == module)
    }

    /// Number of blocks
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the set holds no blocks
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    fn of_kind(&self, kind: ClassificationKind) -> impl Iterator<Item = &LanguageBlock> {
        self.blocks.iter().filter(move |b| b.kind() == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinals_are_stable() {
        assert_eq!(ClassificationKind::Unknown.ordinal(), 0);
        assert_eq!(ClassificationKind::Rule.ordinal(), 1);
        assert_eq!(ClassificationKind::Baseline.ordinal(), 2);
        assert_eq!(ClassificationKind::default(), ClassificationKind::Unknown);
        assert_eq!(
            ClassificationKind::try_from(2).unwrap(),
            ClassificationKind::Baseline
        );
        assert!(ClassificationKind::try_from(3).is_err());
    }

    #[test]
    fn test_rule_round_trips_fields() {
        let block = LanguageBlock::rule("rules/storage.rule.ps1", "Storage", "Storage.UseHttps")
            .unwrap();

        assert_eq!(block.source_path(), "rules/storage.rule.ps1");
        assert_eq!(block.module(), "Storage");
        assert_eq!(block.name(), "Storage.UseHttps");
        assert_eq!(block.kind(), ClassificationKind::Rule);
    }

    #[test]
    fn test_empty_identity_rejected() {
        let err = LanguageBlock::rule("", "Storage", "Storage.UseHttps").unwrap_err();
        assert!(matches!(err, ArtifactError::InvalidArtifact(_)));

        let err = LanguageBlock::rule("rules/a.rule.ps1", "  ", "Storage.UseHttps").unwrap_err();
        assert!(matches!(err, ArtifactError::InvalidArtifact(_)));
    }

    #[test]
    fn test_kind_must_match_body() {
        let err = LanguageBlock::new(
            ClassificationKind::Baseline,
            "baselines.yaml",
            "Storage",
            "Strict",
            BlockBody::Rule {
                tags: BTreeMap::new(),
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("does not match"));
    }

    #[test]
    fn test_baseline_requires_rules() {
        assert!(LanguageBlock::baseline("baselines.yaml", "Storage", "Strict", vec![]).is_err());
        assert!(
            LanguageBlock::baseline(
                "baselines.yaml",
                "Storage",
                "Strict",
                vec!["Storage.UseHttps".to_string()]
            )
            .is_ok()
        );
    }

    #[test]
    fn test_rule_set_rejects_unknown() {
        let unknown = LanguageBlock::new(
            ClassificationKind::Unknown,
            "broken.rule.ps1",
            "Storage",
            "Broken",
            BlockBody::Unclassified,
        )
        .unwrap();
        let rule = LanguageBlock::rule("a.rule.ps1", "Storage", "A").unwrap();

        assert!(RuleSet::from_blocks(vec![rule.clone(), unknown]).is_err());

        let set = RuleSet::from_blocks(vec![rule]).unwrap();
        assert_eq!(set.rules().count(), 1);
        assert_eq!(set.baselines().count(), 0);
        assert_eq!(set.in_module("Storage").count(), 1);
    }
}
