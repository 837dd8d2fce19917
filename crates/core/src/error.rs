use thiserror::Error;

use crate::model::{QuizError, SessionStateError};
use crate::report::ReportError;
use crate::validate::ValidationError;

/// Aggregate error for core quiz operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    State(#[from] SessionStateError),
    #[error(transparent)]
    Report(#[from] ReportError),
}
