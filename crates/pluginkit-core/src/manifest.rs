//! Typed access to a plugin's `package.json`.
//!
//! Only the fields the generator reads or writes are interpreted; everything
//! else round-trips untouched and in its original order.

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{GenError, GenResult};
use crate::topic::TopicTree;

/// Dev dependency that marks a plugin as internal to the CLI distribution.
pub const COMMAND_REFERENCE_PLUGIN: &str = "@salesforce/plugin-command-reference";

pub const DEPRECATION_POLICY_SCRIPT: &str = "test:deprecation-policy";
pub const JSON_SCHEMA_SCRIPT: &str = "test:json-schema";

#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    root: Map<String, Value>,
}

impl Manifest {
    pub fn from_json(json: &str) -> GenResult<Self> {
        let value: Value = serde_json_lenient::from_str(json)
            .map_err(|e| GenError::Manifest(format!("invalid JSON: {e}")))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> GenResult<Self> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            other => Err(GenError::Manifest(format!(
                "expected a JSON object, found {}",
                kind_of(&other)
            ))),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.root.get("name").and_then(Value::as_str)
    }

    pub fn has_dev_dependency(&self, name: &str) -> bool {
        self.root
            .get("devDependencies")
            .and_then(Value::as_object)
            .is_some_and(|deps| deps.contains_key(name))
    }

    /// Internal plugins ship with the CLI and share its topic namespace.
    pub fn is_internal_plugin(&self) -> bool {
        self.has_dev_dependency(COMMAND_REFERENCE_PLUGIN)
    }

    pub fn has_script(&self, name: &str) -> bool {
        self.root
            .get("scripts")
            .and_then(Value::as_object)
            .is_some_and(|scripts| scripts.contains_key(name))
    }

    /// `oclif.topics`, or an empty tree when the manifest has none.
    pub fn topics(&self) -> GenResult<TopicTree> {
        let Some(topics) = self.root.get("oclif").and_then(|o| o.get("topics")) else {
            debug!("manifest has no oclif.topics");
            return Ok(TopicTree::new());
        };
        serde_json::from_value(topics.clone())
            .map_err(|e| GenError::Manifest(format!("oclif.topics: {e}")))
    }

    /// Replace `oclif.topics`, creating the `oclif` section if needed.
    pub fn set_topics(&mut self, topics: &TopicTree) -> GenResult<()> {
        let oclif = self
            .root
            .entry("oclif")
            .or_insert_with(|| Value::Object(Map::new()));
        let oclif = oclif
            .as_object_mut()
            .ok_or_else(|| GenError::Manifest("oclif is not an object".into()))?;
        oclif.insert("topics".into(), serde_json::to_value(topics)?);
        Ok(())
    }

    pub fn as_value(&self) -> Value {
        Value::Object(self.root.clone())
    }

    /// Pretty-printed with a trailing newline, the way package managers write it.
    pub fn to_json_string(&self) -> GenResult<String> {
        let mut out = serde_json::to_string_pretty(&self.root)?;
        out.push('\n');
        Ok(out)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
