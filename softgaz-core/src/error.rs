//! Error types for softgaz-core.

use thiserror::Error;

/// Result type for softgaz-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for softgaz-core operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The type registry or one of its aliases is misconfigured.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Text handed to a parser is malformed.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Create a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create an invalid input error.
    #[must_use]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
