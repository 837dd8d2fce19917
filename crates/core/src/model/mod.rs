mod leverage;
mod question;
mod session;

pub use leverage::{Leverage, LeverageInventory, LeverageSlot};
pub use question::{
    OPTION_COUNT, QUESTIONS_PER_QUIZ, Question, QuestionError, QuestionSet, QuestionSetError,
};
pub use session::{AnswerOutcome, QuizError, QuizSession, SessionStateError};
