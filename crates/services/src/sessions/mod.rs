mod progress;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use progress::QuizProgress;
pub use workflow::{DispatchOutcome, QuizAction, QuizFlowService};
