//! Linter error types.
//!
//! Anything that represents a problem in the analyzed document becomes a
//! diagnostic through the reporter and processing continues; every variant
//! here represents a problem in the engine or its configuration and halts
//! the run.

use thiserror::Error;

use gherlint_ast::TreeError;

/// Errors that can occur while linting.
#[derive(Debug, Error)]
pub enum LinterError {
    /// Configuration error (bad option type, invalid pattern).
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The parser produced a mapping without a structurally required field.
    #[error("Malformed parse result: {0}")]
    MalformedInput(String),

    /// A path that is not a `.feature` file was passed directly.
    #[error("{0} is not a .feature file")]
    UnsupportedFileType(String),

    /// Message id does not match `^[EWCRI][0-9]{3}$`.
    #[error("Value for id must conform to {pattern}: got {value}")]
    InvalidMessageId { pattern: &'static str, value: String },

    /// Message name is not kebab-case.
    #[error("Value for name must conform to {pattern}: got {value}")]
    InvalidMessageName { pattern: &'static str, value: String },

    /// A message id or name was registered twice.
    #[error("{0}")]
    DuplicateMessage(String),

    /// A checker asked for a message nobody registered.
    #[error("{0}")]
    UnknownMessage(String),

    /// A tree operation hit a state the builder can never produce.
    #[error("Internal error: {0}")]
    InvariantViolation(#[from] TreeError),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LinterError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a malformed-input error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedInput(message.into())
    }
}
