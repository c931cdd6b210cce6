//! Error types for the fallible edges of the game: config files, the
//! high-score store and audio assets.
//!
//! None of these ever reach the player. The collaborator boundary logs
//! them and degrades to "feature disabled".

/// Error type for side_shooter operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// IO error from filesystem
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored value could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid or unreadable tuning file
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Sound asset could not be loaded or played
    #[error("Audio error: {0}")]
    Audio(String),
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}

impl From<std::num::ParseIntError> for Error {
    fn from(e: std::num::ParseIntError) -> Self {
        Error::Parse(e.to_string())
    }
}

/// Result type for side_shooter operations
pub type Result<T> = std::result::Result<T, Error>;
