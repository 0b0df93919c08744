//! Dotted topic paths derived from colon-delimited command names.
//!
//! A command `do:awesome:stuff` lives under the topics `do` and
//! `do.awesome`; the last segment names the command itself.

pub const COMMAND_SEPARATOR: char = ':';
pub const PATH_SEPARATOR: char = '.';

/// Topic segments of a command name: every segment except the leaf.
pub fn topic_segments(command: &str) -> Vec<&str> {
    let mut segments: Vec<&str> = command.split(COMMAND_SEPARATOR).collect();
    segments.pop();
    segments
}

/// Every dotted prefix of `segments`, shallowest first.
pub fn prefixes(segments: &[&str]) -> Vec<String> {
    (1..=segments.len())
        .map(|len| join(&segments[..len]))
        .collect()
}

pub fn join(segments: &[&str]) -> String {
    segments.join(".")
}

/// Number of segments in a dotted path.
pub fn depth(path: &str) -> usize {
    path.split(PATH_SEPARATOR).count()
}

/// The first `depth` segments of a dotted path. Shorter paths come back whole.
pub fn truncate(path: &str, depth: usize) -> String {
    path.split(PATH_SEPARATOR)
        .take(depth)
        .collect::<Vec<_>>()
        .join(".")
}
