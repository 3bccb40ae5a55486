// src/core/error.rs

use thiserror::Error;

/// Every failure a visitor, transformer or the dispatch loop can report.
///
/// The loop never catches these: the first one raised by a handler ends the
/// walk and is handed back to the caller of `visit_argv` unchanged.
#[derive(Error, Debug)]
pub enum ArgError {
    #[error("'{key}' expects a value!")]
    MissingValue { key: String },
    #[error("'{key}' does not expect a value!")]
    UnexpectedValue { key: String },
    #[error("'{key}' can only be used once.")]
    Duplicate { key: String },
    #[error("'{key}' received an invalid value '{value}': {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
    #[error("Command line could not be split into arguments: {0}")]
    CommandLine(String),
    #[error("Target could not be converted: {0}")]
    Target(#[from] serde_json::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ArgError {
    /// Shorthand for [`ArgError::InvalidValue`].
    pub fn invalid(key: &str, value: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}
