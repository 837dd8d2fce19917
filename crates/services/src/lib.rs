#![forbid(unsafe_code)]

pub mod error;
pub mod generator;
pub mod offline;
pub mod search;
pub mod sessions;

pub use quiz_core::Clock;

pub use error::{GeneratorError, SessionError};
pub use generator::{GeneratorConfig, Locale, QuizGenerator};
pub use offline::offline_question_set;
pub use search::{SearchClient, SearchConfig};
pub use sessions::{DispatchOutcome, QuizAction, QuizFlowService, QuizProgress};
