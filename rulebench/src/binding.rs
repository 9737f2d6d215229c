//! Target name binding.
//!
//! Every target needs a stable display name. Bindings try configured fields
//! first and fall back to a SHA-256 digest of the serialized object.

use serde_json::Value;
use sha2::{Digest, Sha256};

/// Fields the default binding looks at, in order
pub const DEFAULT_NAME_FIELDS: [&str; 2] = ["TargetName", "Name"];

/// How a target's name is resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetBinding {
    /// `TargetName`, then `Name`
    Default,
    /// The first of these top-level fields holding a string
    Custom(Vec<String>),
    /// A dotted path into nested objects, e.g. `Properties.metadata.name`
    Nested(String),
}

impl TargetBinding {
    /// Resolve `target`'s name
    pub fn bind(&self, target: &Value) -> anyhow::Result<String> {
        let bound = match self {
            TargetBinding::Default => first_string(target, DEFAULT_NAME_FIELDS.iter().copied()),
            TargetBinding::Custom(fields) => first_string(target, fields.iter().map(String::as_str)),
            TargetBinding::Nested(path) => resolve_path(target, path)
                .and_then(Value::as_str)
                .map(str::to_string),
        };
        match bound {
            Some(name) => Ok(name),
            None => digest(target),
        }
    }
}

/// Walk a dotted path through nested objects
pub fn resolve_path<'a>(target: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(target, |value, segment| value.get(segment))
}

fn first_string<'a>(target: &Value, fields: impl Iterator<Item = &'a str>) -> Option<String> {
    fields
        .filter_map(|f| target.get(f).and_then(Value::as_str))
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// Hex SHA-256 of the compact JSON encoding
fn digest(target: &Value) -> anyhow::Result<String> {
    let bytes = serde_json::to_vec(target)?;
    Ok(format!("{:x}", Sha256::digest(&bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_prefers_target_name() {
        let both = json!({ "TargetName": "tn", "Name": "n" });
        let name_only = json!({ "Name": "n" });
        assert_eq!(TargetBinding::Default.bind(&both).unwrap(), "tn");
        assert_eq!(TargetBinding::Default.bind(&name_only).unwrap(), "n");
    }

    #[test]
    fn test_fallback_digest_is_stable() {
        let anonymous = json!({ "Value": 1 });
        let first = TargetBinding::Default.bind(&anonymous).unwrap();
        let second = TargetBinding::Default.bind(&anonymous).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));

        let other = TargetBinding::Default.bind(&json!({ "Value": 2 })).unwrap();
        assert_ne!(first, other);
    }

    #[test]
    fn test_custom_and_nested() {
        let target = json!({
            "ResourceName": "",
            "Alias": "alias-1",
            "Properties": { "metadata": { "identifier": "nested-1" } }
        });

        let custom = TargetBinding::Custom(vec!["ResourceName".into(), "Alias".into()]);
        assert_eq!(custom.bind(&target).unwrap(), "alias-1");

        let nested = TargetBinding::Nested("Properties.metadata.identifier".into());
        assert_eq!(nested.bind(&target).unwrap(), "nested-1");

        let missing = TargetBinding::Nested("Properties.settings.name".into());
        assert_eq!(missing.bind(&target).unwrap().len(), 64);
    }
}
