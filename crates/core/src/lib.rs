#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod report;
pub mod scoring;
pub mod time;
pub mod validate;

pub use error::Error;
pub use report::{QuizReport, ReportError};
pub use time::Clock;
pub use validate::{ValidationError, parse_generated_quiz};
