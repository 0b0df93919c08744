use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenError {
    #[error("invalid command name: {0}")]
    InvalidCommandName(String),

    #[error("manifest error: {0}")]
    Manifest(String),

    #[error("known commands error: {0}")]
    KnownCommands(String),

    #[error("template error: {0}")]
    Template(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type GenResult<T> = Result<T, GenError>;
