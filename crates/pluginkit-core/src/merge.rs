//! Topic patches for newly generated commands.
//!
//! [`add_topics`] computes the entries a manifest's topic tree needs so that
//! every topic above a new command is registered. The patch holds only the
//! chain of topics touched by the command; callers apply it with
//! [`TopicTree::apply_patch`].

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::known::KnownCommands;
use crate::path;
use crate::topic::{Topic, TopicTree};

/// Prefix of the description given to topics that have none yet.
pub const PLACEHOLDER_PREFIX: &str = "description for ";

/// How entries inside `subtopics` are keyed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubtopicKeys {
    /// The full dotted path of the subtopic (`do.awesome`).
    #[default]
    FullPath,
    /// Only the subtopic's own segment (`awesome`).
    Segment,
}

impl SubtopicKeys {
    fn key<'a>(self, path: &'a str, segment: &'a str) -> &'a str {
        match self {
            Self::FullPath => path,
            Self::Segment => segment,
        }
    }

    /// Keys to try when reading an existing tree, preferred style first.
    fn candidates<'a>(self, path: &'a str, segment: &'a str) -> [&'a str; 2] {
        match self {
            Self::FullPath => [path, segment],
            Self::Segment => [segment, path],
        }
    }
}

impl fmt::Display for SubtopicKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FullPath => write!(f, "full-path"),
            Self::Segment => write!(f, "segment"),
        }
    }
}

impl std::str::FromStr for SubtopicKeys {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full-path" | "fullpath" | "path" => Ok(Self::FullPath),
            "segment" => Ok(Self::Segment),
            _ => Err(format!("invalid subtopic key style: {s}")),
        }
    }
}

/// Topic patch for `new_cmd`, keying subtopics by their full dotted path.
pub fn add_topics(new_cmd: &str, existing: &TopicTree, known: &KnownCommands) -> TopicTree {
    add_topics_with(new_cmd, existing, known, SubtopicKeys::default())
}

/// Topic patch for `new_cmd` using the given subtopic key style.
///
/// Topics are built from the deepest prefix up, each one wrapping the node
/// built just before it. A topic is external when a known command cut to the
/// topic's depth equals the topic's path; otherwise it keeps the description
/// already in `existing` or gets the placeholder. A topic already present in
/// `existing` keeps the key it is stored under, whatever `keys` says.
pub fn add_topics_with(
    new_cmd: &str,
    existing: &TopicTree,
    known: &KnownCommands,
    keys: SubtopicKeys,
) -> TopicTree {
    let segments = path::topic_segments(new_cmd);
    let prefixes = path::prefixes(&segments);
    let located = locate(existing, &segments, keys);

    let mut deeper: Option<(String, Topic)> = None;
    for (prefix, (key, current)) in prefixes.iter().zip(located).rev() {
        let mut topic = if known.claims(prefix) {
            debug!("topic {prefix} is owned by another plugin");
            Topic::external()
        } else {
            let description = current
                .and_then(Topic::description)
                .map(str::to_string)
                .unwrap_or_else(|| format!("{PLACEHOLDER_PREFIX}{prefix}"));
            Topic::internal(description)
        };

        if let Some((child_key, child)) = deeper.take() {
            topic = topic.with_subtopics(TopicTree::from_iter([(child_key, child)]));
        }
        deeper = Some((key, topic));
    }

    // The shallowest prefix is a single segment, so both key styles agree on it.
    deeper.into_iter().collect()
}

/// Key and existing node for each topic prefix of `segments`.
///
/// Each level is searched in the preferred key style first, then the other.
/// Once a level is missing, deeper topics are new and use the preferred style.
fn locate<'a>(
    existing: &'a TopicTree,
    segments: &[&str],
    keys: SubtopicKeys,
) -> Vec<(String, Option<&'a Topic>)> {
    let mut level = Some(existing);
    let mut out = Vec::with_capacity(segments.len());
    for depth in 0..segments.len() {
        let prefix = path::join(&segments[..=depth]);
        let found = level.and_then(|tree| {
            keys.candidates(&prefix, segments[depth])
                .into_iter()
                .find_map(|key| tree.get(key).map(|topic| (key.to_string(), topic)))
        });
        match found {
            Some((key, topic)) => {
                level = topic.subtopics.as_ref();
                out.push((key, Some(topic)));
            }
            None => {
                level = None;
                out.push((keys.key(&prefix, segments[depth]).to_string(), None));
            }
        }
    }
    out
}
