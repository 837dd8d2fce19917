//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::ValidationError;
use quiz_core::model::QuizError;
use storage::repository::StorageError;

/// Errors emitted by `QuizGenerator`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GeneratorError {
    #[error("quiz generation is not configured")]
    Disabled,
    #[error("topic must be between 3 and 200 characters")]
    InvalidTopic,
    #[error("quiz generation returned an empty response")]
    EmptyResponse,
    #[error("quiz generation request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Errors emitted by `QuizFlowService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
