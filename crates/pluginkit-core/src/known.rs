//! Commands registered outside the plugin being generated.
//!
//! A topic whose dotted path is already occupied by one of these commands
//! belongs to another plugin and is written as an external reference.

use serde::Deserialize;
use tracing::debug;

use crate::error::{GenError, GenResult};
use crate::path::{self, COMMAND_SEPARATOR};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownCommands {
    ids: Vec<String>,
}

/// One entry of a `sf commands --json` listing. Other fields are ignored.
#[derive(Debug, Deserialize)]
struct ListedCommand {
    id: String,
}

impl KnownCommands {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            ids: ids.into_iter().map(|id| normalize(id.as_ref())).collect(),
        }
    }

    /// Parse the JSON array printed by a command listing (`[{"id": "org:create user"}, ...]`).
    pub fn from_listing_json(json: &str) -> GenResult<Self> {
        let listed: Vec<ListedCommand> = serde_json_lenient::from_str(json)
            .map_err(|e| GenError::KnownCommands(format!("invalid command listing: {e}")))?;
        debug!("loaded {} known commands", listed.len());
        Ok(Self::new(listed.iter().map(|c| c.id.as_str())))
    }

    /// True when some known command, cut to the depth of `topic_path`, equals it.
    pub fn claims(&self, topic_path: &str) -> bool {
        let depth = path::depth(topic_path);
        self.ids
            .iter()
            .any(|id| path::truncate(id, depth) == topic_path)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Command ids use `:` or spaces between segments; topic paths use `.`.
pub fn normalize(id: &str) -> String {
    id.replace([COMMAND_SEPARATOR, ' '], ".")
}
