pub mod command;
pub mod error;
pub mod known;
pub mod manifest;
pub mod merge;
pub mod path;
pub mod template;
pub mod topic;

pub use command::CommandId;
pub use error::{GenError, GenResult};
pub use known::KnownCommands;
pub use manifest::Manifest;
pub use merge::{add_topics, add_topics_with, SubtopicKeys};
pub use template::{render, TemplateEngine, Vars};
pub use topic::{Topic, TopicKind, TopicTree};
