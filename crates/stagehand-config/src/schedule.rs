use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A name-only description of every contribution to one schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleDef {
  pub name: String,
  #[serde(default)]
  pub components: Vec<ComponentDef>,
}

/// The contribution of a single component.
///
/// Names listed in `actions` and `milestones` are declared by this component.
/// Any other name used inside `flows` refers to a node that some other
/// component must declare.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentDef {
  pub name: String,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub actions: Vec<String>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub milestones: Vec<String>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub flows: Vec<ExprDef>,
}

/// A composition expression.
///
/// In JSON a bare string names a node, `{"seq": [...]}` orders its operands
/// left to right, and `{"par": [...]}` leaves them unordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExprDef {
  Node(String),
  Seq { seq: Vec<ExprDef> },
  Par { par: Vec<ExprDef> },
}

impl ScheduleDef {
  /// Parse a schedule definition from JSON text.
  pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
    Ok(serde_json::from_str(json)?)
  }

  /// Read and parse a schedule definition from a JSON file.
  pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
      path: path.to_path_buf(),
      source,
    })?;
    Self::from_json_str(&content)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_nested_expressions() {
    let def = ScheduleDef::from_json_str(
      r#"{
        "name": "boot",
        "components": [
          {
            "name": "core",
            "actions": ["a", "c"],
            "milestones": ["ready"],
            "flows": [{"seq": ["a", {"par": ["b", "c"]}, "ready"]}]
          }
        ]
      }"#,
    )
    .unwrap();

    assert_eq!(def.name, "boot");
    let core = &def.components[0];
    assert_eq!(core.actions, vec!["a", "c"]);
    assert_eq!(core.milestones, vec!["ready"]);
    assert_eq!(
      core.flows[0],
      ExprDef::Seq {
        seq: vec![
          ExprDef::Node("a".to_string()),
          ExprDef::Par {
            par: vec![ExprDef::Node("b".to_string()), ExprDef::Node("c".to_string())],
          },
          ExprDef::Node("ready".to_string()),
        ],
      }
    );
  }

  #[test]
  fn test_components_default_to_empty() {
    let def = ScheduleDef::from_json_str(r#"{"name": "empty"}"#).unwrap();
    assert!(def.components.is_empty());
  }

  #[test]
  fn test_rejects_malformed_expression() {
    let result = ScheduleDef::from_json_str(
      r#"{"name": "bad", "components": [{"name": "x", "flows": [{"loop": ["a"]}]}]}"#,
    );
    assert!(matches!(result, Err(ConfigError::Parse(_))));
  }

  #[test]
  fn test_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("schedule.json");
    std::fs::write(
      &path,
      r#"{"name": "from-disk", "components": [{"name": "c", "milestones": ["m"]}]}"#,
    )
    .unwrap();

    let def = ScheduleDef::from_file(&path).unwrap();
    assert_eq!(def.name, "from-disk");
    assert_eq!(def.components[0].milestones, vec!["m"]);
  }

  #[test]
  fn test_from_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = ScheduleDef::from_file(dir.path().join("missing.json"));
    assert!(matches!(result, Err(ConfigError::Io { .. })));
  }
}
