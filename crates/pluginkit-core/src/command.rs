use std::fmt;
use std::path::PathBuf;

use crate::error::{GenError, GenResult};
use crate::path::{COMMAND_SEPARATOR, PATH_SEPARATOR};

/// A validated, colon-delimited command name such as `do:awesome:stuff`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandId {
    segments: Vec<String>,
}

impl CommandId {
    pub fn parse(name: &str) -> GenResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GenError::InvalidCommandName("name is empty".into()));
        }

        let mut segments = Vec::new();
        for segment in name.split(COMMAND_SEPARATOR) {
            if segment.is_empty() {
                return Err(GenError::InvalidCommandName(format!(
                    "{name}: empty segment"
                )));
            }
            if let Some(bad) = segment
                .chars()
                .find(|&c| c.is_whitespace() || matches!(c, '/' | '\\' | PATH_SEPARATOR))
            {
                return Err(GenError::InvalidCommandName(format!(
                    "{name}: segment {segment:?} contains {bad:?}"
                )));
            }
            segments.push(segment.to_string());
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Segments naming topics; empty for a top-level command.
    pub fn topic_segments(&self) -> &[String] {
        &self.segments[..self.segments.len() - 1]
    }

    pub fn leaf(&self) -> &str {
        // parse() guarantees at least one segment
        &self.segments[self.segments.len() - 1]
    }

    /// `do:awesome:stuff` → `DoAwesomeStuff`.
    pub fn class_name(&self) -> String {
        self.segments
            .iter()
            .flat_map(|s| s.split(['-', '_']))
            .map(capitalize)
            .collect()
    }

    pub fn result_type(&self) -> String {
        format!("{}Result", self.class_name())
    }

    /// `do.awesome.stuff`, the message bundle name.
    pub fn message_file(&self) -> String {
        self.segments.join(".")
    }

    /// `do awesome stuff`, as typed on the command line.
    pub fn display_name(&self) -> String {
        self.segments.join(" ")
    }

    pub fn source_path(&self) -> PathBuf {
        self.nested("src/commands", "ts")
    }

    pub fn message_path(&self) -> PathBuf {
        PathBuf::from("messages").join(format!("{}.md", self.message_file()))
    }

    pub fn nut_path(&self) -> PathBuf {
        self.nested("test/commands", "nut.ts")
    }

    pub fn unit_test_path(&self) -> PathBuf {
        self.nested("test/commands", "test.ts")
    }

    /// Import specifier for the command module as seen from its unit test.
    pub fn unit_test_import(&self) -> String {
        let up = "../".repeat(2 + self.topic_segments().len());
        format!("{up}src/commands/{}.js", self.segments.join("/"))
    }

    fn nested(&self, root: &str, extension: &str) -> PathBuf {
        let mut path = PathBuf::from(root);
        for topic in self.topic_segments() {
            path.push(topic);
        }
        path.push(format!("{}.{extension}", self.leaf()));
        path
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join(":"))
    }
}

impl std::str::FromStr for CommandId {
    type Err = GenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
