use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::GenError;

// ---------------------------------------------------------------------------
// Topic
// ---------------------------------------------------------------------------

/// Who owns a topic: this plugin (described here) or another one (referenced).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicKind {
    Internal { description: String },
    External,
}

/// A node of the manifest's topic tree.
///
/// Serializes as `{ "description": .. }` or `{ "external": true }`, with an
/// optional `subtopics` mapping. Any other fields are kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTopic", into = "RawTopic")]
pub struct Topic {
    pub kind: TopicKind,
    pub subtopics: Option<TopicTree>,
    pub extra: Map<String, Value>,
}

impl Topic {
    pub fn internal(description: impl Into<String>) -> Self {
        Self {
            kind: TopicKind::Internal {
                description: description.into(),
            },
            subtopics: None,
            extra: Map::new(),
        }
    }

    pub fn external() -> Self {
        Self {
            kind: TopicKind::External,
            subtopics: None,
            extra: Map::new(),
        }
    }

    pub fn with_subtopics(mut self, subtopics: TopicTree) -> Self {
        self.subtopics = Some(subtopics);
        self
    }

    pub fn description(&self) -> Option<&str> {
        match &self.kind {
            TopicKind::Internal { description } => Some(description),
            TopicKind::External => None,
        }
    }

    pub fn is_external(&self) -> bool {
        self.kind == TopicKind::External
    }

    /// Overlay a patch node: its kind wins, subtopics are merged key by key.
    fn absorb(&mut self, patch: Topic) {
        self.kind = patch.kind;
        self.extra.extend(patch.extra);
        if let Some(theirs) = patch.subtopics {
            match self.subtopics.as_mut() {
                Some(mine) => mine.apply_patch(theirs),
                None => self.subtopics = Some(theirs),
            }
        }
    }
}

/// Wire shape of a topic node.
#[derive(Serialize, Deserialize)]
struct RawTopic {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    external: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    subtopics: Option<TopicTree>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl TryFrom<RawTopic> for Topic {
    type Error = GenError;

    fn try_from(raw: RawTopic) -> Result<Self, Self::Error> {
        let kind = match (raw.description, raw.external) {
            (Some(description), None | Some(false)) => TopicKind::Internal { description },
            (None, Some(true)) => TopicKind::External,
            (Some(_), Some(true)) => {
                return Err(GenError::Manifest(
                    "topic has both a description and external: true".into(),
                ))
            }
            (None, _) => {
                return Err(GenError::Manifest(
                    "topic needs either a description or external: true".into(),
                ))
            }
        };
        Ok(Self {
            kind,
            subtopics: raw.subtopics,
            extra: raw.extra,
        })
    }
}

impl From<Topic> for RawTopic {
    fn from(topic: Topic) -> Self {
        let (description, external) = match topic.kind {
            TopicKind::Internal { description } => (Some(description), None),
            TopicKind::External => (None, Some(true)),
        };
        Self {
            description,
            external,
            subtopics: topic.subtopics,
            extra: topic.extra,
        }
    }
}

// ---------------------------------------------------------------------------
// TopicTree
// ---------------------------------------------------------------------------

/// Topic name → node, in manifest order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicTree(IndexMap<String, Topic>);

impl TopicTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Topic> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, topic: Topic) -> Option<Topic> {
        self.0.insert(key.into(), topic)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Follow `keys` from the top level down through `subtopics`.
    pub fn find(&self, keys: &[&str]) -> Option<&Topic> {
        let (first, rest) = keys.split_first()?;
        let mut topic = self.get(first)?;
        for key in rest {
            topic = topic.subtopics.as_ref()?.get(key)?;
        }
        Some(topic)
    }

    /// Apply a merge patch in place.
    ///
    /// New top-level keys are appended. Keys present on both sides take the
    /// patch node's kind, and their subtopics are patched recursively so
    /// siblings the patch does not mention stay in place.
    pub fn apply_patch(&mut self, patch: TopicTree) {
        for (key, topic) in patch.0 {
            match self.0.get_mut(&key) {
                Some(existing) => existing.absorb(topic),
                None => {
                    self.0.insert(key, topic);
                }
            }
        }
    }
}

impl FromIterator<(String, Topic)> for TopicTree {
    fn from_iter<I: IntoIterator<Item = (String, Topic)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for TopicTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string_pretty(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tree(value: Value) -> TopicTree {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_serialize_internal_and_external() {
        let mut subtopics = TopicTree::new();
        subtopics.insert("a.b", Topic::external());
        let mut t = TopicTree::new();
        t.insert("a", Topic::internal("about a").with_subtopics(subtopics));

        assert_eq!(
            serde_json::to_value(&t).unwrap(),
            json!({ "a": { "description": "about a", "subtopics": { "a.b": { "external": true } } } })
        );
    }

    #[test]
    fn test_deserialize_keeps_extra_fields() {
        let t = tree(json!({ "org": { "description": "orgs", "hidden": true } }));
        let org = t.get("org").unwrap();
        assert_eq!(org.description(), Some("orgs"));
        assert_eq!(org.extra.get("hidden"), Some(&json!(true)));
        assert_eq!(
            serde_json::to_value(&t).unwrap(),
            json!({ "org": { "description": "orgs", "hidden": true } })
        );
    }

    #[test]
    fn test_deserialize_rejects_ambiguous_nodes() {
        let neither: Result<TopicTree, _> = serde_json::from_value(json!({ "a": {} }));
        assert!(neither.is_err());
        let both: Result<TopicTree, _> =
            serde_json::from_value(json!({ "a": { "description": "x", "external": true } }));
        assert!(both.is_err());
    }

    #[test]
    fn test_external_false_is_internal() {
        let t = tree(json!({ "a": { "description": "x", "external": false } }));
        assert!(!t.get("a").unwrap().is_external());
    }

    #[test]
    fn test_find_through_subtopics() {
        let t = tree(json!({
            "do": { "description": "d", "subtopics": { "awesome": { "external": true } } }
        }));
        assert!(t.find(&["do", "awesome"]).unwrap().is_external());
        assert!(t.find(&["do", "missing"]).is_none());
        assert!(t.find(&[]).is_none());
    }

    #[test]
    fn test_apply_patch_keeps_siblings() {
        let mut base = tree(json!({
            "do": { "description": "d", "subtopics": { "do.other": { "description": "o" } } },
            "zed": { "description": "z" }
        }));
        let patch = tree(json!({
            "do": { "description": "d", "subtopics": { "do.awesome": { "description": "a" } } }
        }));
        base.apply_patch(patch);

        assert_eq!(
            serde_json::to_value(&base).unwrap(),
            json!({
                "do": { "description": "d", "subtopics": {
                    "do.other": { "description": "o" },
                    "do.awesome": { "description": "a" }
                } },
                "zed": { "description": "z" }
            })
        );
    }

    #[test]
    fn test_apply_patch_switches_kind() {
        let mut base = tree(json!({ "a": { "description": "mine" } }));
        base.apply_patch(tree(json!({ "a": { "external": true } })));
        assert!(base.get("a").unwrap().is_external());
    }

    #[test]
    fn test_apply_patch_preserves_key_order() {
        let mut base = tree(json!({ "b": { "description": "b" }, "a": { "description": "a" } }));
        base.apply_patch(tree(json!({ "c": { "description": "c" } })));
        let keys: Vec<&str> = base.keys().collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }
}
