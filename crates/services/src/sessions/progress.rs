use quiz_core::model::QuizSession;

/// Aggregated view of quiz progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub is_complete: bool,
}

impl QuizProgress {
    #[must_use]
    pub fn of(session: &QuizSession) -> Self {
        let total = session.questions().len();
        let answered = session.answered_count();
        Self {
            total,
            answered,
            remaining: total - answered,
            is_complete: session.is_complete(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{QUESTIONS_PER_QUIZ, Question, QuestionSet};
    use quiz_core::time::fixed_now;

    #[test]
    fn progress_tracks_answers_and_completion() {
        let questions = (0..QUESTIONS_PER_QUIZ)
            .map(|i| {
                Question::new(
                    format!("q{i}"),
                    format!("Question {i}?"),
                    vec!["A".into(), "B".into(), "C".into(), "D".into()],
                    0,
                    None,
                )
                .unwrap()
            })
            .collect();
        let mut session = QuizSession::new(
            "History",
            QuestionSet::new(questions).unwrap(),
            fixed_now(),
        );

        let progress = QuizProgress::of(&session);
        assert_eq!(progress.total, QUESTIONS_PER_QUIZ);
        assert_eq!(progress.answered, 0);
        assert_eq!(progress.remaining, QUESTIONS_PER_QUIZ);
        assert!(!progress.is_complete);

        session.answer_current(0).unwrap();
        session.advance(fixed_now());
        let progress = QuizProgress::of(&session);
        assert_eq!(progress.answered, 1);
        assert_eq!(progress.remaining, QUESTIONS_PER_QUIZ - 1);

        for _ in 1..QUESTIONS_PER_QUIZ {
            session.answer_current(0).unwrap();
            session.advance(fixed_now());
        }
        let progress = QuizProgress::of(&session);
        assert_eq!(progress.remaining, 0);
        assert!(progress.is_complete);
    }
}
