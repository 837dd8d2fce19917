use thiserror::Error;

/// Number of answer options every question carries.
pub const OPTION_COUNT: usize = 4;

/// Number of questions in a full quiz.
pub const QUESTIONS_PER_QUIZ: usize = 10;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Errors from constructing a single question.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question id cannot be empty")]
    EmptyId,

    #[error("question text cannot be empty")]
    EmptyText,

    #[error("expected exactly 4 answer options, got {found}")]
    WrongOptionCount { found: usize },

    #[error("correct answer index {index} is out of range")]
    AnswerOutOfRange { index: usize },
}

/// Errors from assembling a question set.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionSetError {
    #[error("expected exactly 10 questions, got {found}")]
    WrongQuestionCount { found: usize },
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single multiple-choice quiz question.
///
/// Immutable once created; the constructor enforces a non-empty id and
/// text, exactly [`OPTION_COUNT`] options, and an in-range correct
/// answer. A missing explanation is stored as an empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: String,
    text: String,
    options: Vec<String>,
    correct_answer: usize,
    explanation: String,
}

impl Question {
    /// Creates a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the id or text is empty, the option
    /// count is not exactly 4, or the correct answer index is out of
    /// range.
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        options: Vec<String>,
        correct_answer: usize,
        explanation: Option<String>,
    ) -> Result<Self, QuestionError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(QuestionError::EmptyId);
        }
        let text = text.into();
        if text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if options.len() != OPTION_COUNT {
            return Err(QuestionError::WrongOptionCount {
                found: options.len(),
            });
        }
        if correct_answer >= OPTION_COUNT {
            return Err(QuestionError::AnswerOutOfRange {
                index: correct_answer,
            });
        }

        Ok(Self {
            id,
            text,
            options,
            correct_answer,
            explanation: explanation.unwrap_or_default(),
        })
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_answer(&self) -> usize {
        self.correct_answer
    }

    /// Explanation of the correct answer; empty when none was provided.
    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    /// Whether the given choice index hits the correct answer.
    #[must_use]
    pub fn is_correct(&self, choice: usize) -> bool {
        choice == self.correct_answer
    }
}

//
// ─── QUESTION SET ──────────────────────────────────────────────────────────────
//

/// An ordered set of exactly [`QUESTIONS_PER_QUIZ`] questions.
///
/// Produced by payload validation from untrusted generator output and
/// owned by the session afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSet {
    questions: Vec<Question>,
}

impl QuestionSet {
    /// Assembles a set from validated questions.
    ///
    /// # Errors
    ///
    /// Returns `QuestionSetError::WrongQuestionCount` unless exactly
    /// ten questions are given.
    pub fn new(questions: Vec<Question>) -> Result<Self, QuestionSetError> {
        if questions.len() != QUESTIONS_PER_QUIZ {
            return Err(QuestionSetError::WrongQuestionCount {
                found: questions.len(),
            });
        }
        Ok(Self { questions })
    }

    /// Number of questions in the set (always [`QUESTIONS_PER_QUIZ`]).
    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Question] {
        &self.questions
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Vec<String> {
        vec!["A".into(), "B".into(), "C".into(), "D".into()]
    }

    #[test]
    fn question_requires_id_and_text() {
        let err = Question::new("", "What?", options(), 0, None).unwrap_err();
        assert_eq!(err, QuestionError::EmptyId);

        let err = Question::new("q1", "  ", options(), 0, None).unwrap_err();
        assert_eq!(err, QuestionError::EmptyText);
    }

    #[test]
    fn question_requires_four_options() {
        let err = Question::new("q1", "What?", vec!["A".into()], 0, None).unwrap_err();
        assert_eq!(err, QuestionError::WrongOptionCount { found: 1 });
    }

    #[test]
    fn question_rejects_out_of_range_answer() {
        let err = Question::new("q1", "What?", options(), 4, None).unwrap_err();
        assert_eq!(err, QuestionError::AnswerOutOfRange { index: 4 });
    }

    #[test]
    fn missing_explanation_reads_as_empty() {
        let question = Question::new("q1", "What?", options(), 2, None).unwrap();
        assert_eq!(question.explanation(), "");
        assert!(question.is_correct(2));
        assert!(!question.is_correct(1));
    }

    #[test]
    fn set_requires_exactly_ten_questions() {
        let nine: Vec<Question> = (0..9)
            .map(|i| Question::new(format!("q{i}"), "What?", options(), 0, None).unwrap())
            .collect();
        let err = QuestionSet::new(nine).unwrap_err();
        assert_eq!(err, QuestionSetError::WrongQuestionCount { found: 9 });

        let ten: Vec<Question> = (0..10)
            .map(|i| Question::new(format!("q{i}"), "What?", options(), 0, None).unwrap())
            .collect();
        let set = QuestionSet::new(ten).unwrap();
        assert_eq!(set.len(), 10);
        assert_eq!(set.get(9).unwrap().id(), "q9");
        assert!(set.get(10).is_none());
    }
}
