//! Core error types.

use thiserror::Error;

/// A string that is not a valid four-character code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid four-char code {input:?}: expected exactly four Latin-1 characters")]
pub struct InvalidFourCharCode {
    /// The rejected input.
    pub input: String,
}

impl InvalidFourCharCode {
    pub(crate) fn new(input: &str) -> Self {
        Self {
            input: input.to_owned(),
        }
    }
}
