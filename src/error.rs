//! Error types for prosestrip library.

use std::io;
use thiserror::Error;

/// Result type alias for prosestrip operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for prosestrip library.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The custom filter pattern does not compile.
    #[error("Invalid custom pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// The configuration document could not be read.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The input path is ignored or has an unsupported extension.
    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidConfig(err.to_string())
    }
}

impl Error {
    /// Builds an [`Error::InvalidPattern`] from a regex compile failure.
    pub(crate) fn invalid_pattern(pattern: &str, err: impl std::fmt::Display) -> Self {
        Error::InvalidPattern {
            pattern: pattern.to_string(),
            message: err.to_string(),
        }
    }
}
