//! Shared error types for the services crate.

use thiserror::Error;

/// Errors raised while fetching or parsing a single question source.
///
/// These never abort a load cycle; the loader downgrades them to an empty
/// contribution from the failing source.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoaderError {
    #[error("request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("unparseable question file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors emitted by the learn/test state machine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EngineError {
    #[error("only {available} questions loaded, but {required} are needed for a test")]
    InsufficientQuestions { available: usize, required: usize },

    #[error("no session is active")]
    NotInSession,
}
