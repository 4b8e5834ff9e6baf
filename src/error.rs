//! Error types for softgaz.

use thiserror::Error;

/// Result type for softgaz operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for softgaz operations.
///
/// Only fatal conditions are errors. Unknown entities, missing n-grams and
/// malformed candidate weights are handled in the pipeline and never
/// surface here.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Invalid or inconsistent configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed knowledge-base or input line.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Error from the core types.
    #[error(transparent)]
    Core(#[from] softgaz_core::Error),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Error::Parse(msg.into())
    }

    /// Create a parse error located at a 1-based line of a named source.
    pub fn parse_at(source: &str, line: usize, msg: impl std::fmt::Display) -> Self {
        Error::Parse(format!("{source}:{line}: {msg}"))
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Error::Serialization(msg.into())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}
