//! Error types for the utterance processing engine

use thiserror::Error;

use crate::keyboard::KeyboardError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// A command segment did not match any known command name
    #[error("command parse error: {0}")]
    Parse(String),

    /// A command definition cannot be loaded into the registry
    #[error("command configuration error: {0}")]
    Config(String),

    /// A command is configured for behavior that is not implemented
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// Arguments passed to a command were malformed for its contract
    #[error("bad command arguments: {0}")]
    BadArgs(String),

    /// Undo was requested with no utterances left in the history
    #[error("nothing left to undo")]
    HistoryEmpty,

    #[error("keyboard output failed: {0}")]
    Keyboard(#[from] KeyboardError),

    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse config file: {0}")]
    Toml(#[from] toml::de::Error),
}
