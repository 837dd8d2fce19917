use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{Leverage, QuizSession};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ReportError {
    #[error("session is not complete")]
    IncompleteSession,
}

/// Derived summary of a completed quiz session.
///
/// Pure derivation from the final session state; leverage affects only
/// the score, never the correct count.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizReport {
    topic: String,
    total_questions: usize,
    correct_count: usize,
    percentage: u32,
    final_score: i64,
    question_points: Vec<i64>,
    question_leverages: Vec<Option<Leverage>>,
    cumulative_scores: Vec<i64>,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
}

impl QuizReport {
    /// Summarizes a completed session.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::IncompleteSession` if the session has not
    /// been advanced past its final question.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_session(session: &QuizSession) -> Result<Self, ReportError> {
        let completed_at = session.completed_at().ok_or(ReportError::IncompleteSession)?;

        let correct_count = session
            .questions()
            .iter()
            .zip(session.answers())
            .filter(|(question, answer)| answer.is_some_and(|choice| question.is_correct(choice)))
            .count();
        let total_questions = session.questions().len();
        let percentage = (100.0 * correct_count as f64 / total_questions as f64).round() as u32;

        let mut running = 0;
        let cumulative_scores = session
            .question_points()
            .iter()
            .map(|points| {
                running += points;
                running
            })
            .collect();

        Ok(Self {
            topic: session.topic().to_string(),
            total_questions,
            correct_count,
            percentage,
            final_score: session.score(),
            question_points: session.question_points().to_vec(),
            question_leverages: session.question_leverages().to_vec(),
            cumulative_scores,
            started_at: session.started_at(),
            completed_at,
        })
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.total_questions
    }

    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.correct_count
    }

    /// Share of correctly answered questions, rounded to whole percent.
    #[must_use]
    pub fn percentage(&self) -> u32 {
        self.percentage
    }

    #[must_use]
    pub fn final_score(&self) -> i64 {
        self.final_score
    }

    #[must_use]
    pub fn question_points(&self) -> &[i64] {
        &self.question_points
    }

    #[must_use]
    pub fn question_leverages(&self) -> &[Option<Leverage>] {
        &self.question_leverages
    }

    /// Running score after each question, for charting progression.
    #[must_use]
    pub fn cumulative_scores(&self) -> &[i64] {
        &self.cumulative_scores
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{QUESTIONS_PER_QUIZ, Question, QuestionSet};
    use crate::time::fixed_now;

    fn build_set() -> QuestionSet {
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
        QuestionSet::new(questions).unwrap()
    }

    #[test]
    fn incomplete_session_is_rejected() {
        let session = QuizSession::new("History", build_set(), fixed_now());
        assert_eq!(
            QuizReport::from_session(&session).unwrap_err(),
            ReportError::IncompleteSession
        );
    }

    #[test]
    fn report_counts_and_accumulates() {
        let mut session = QuizSession::new("History", build_set(), fixed_now());
        session.select_leverage(Leverage::Triple);
        session.answer_current(0).unwrap(); // +30
        session.advance(fixed_now());
        session.answer_current(1).unwrap(); // -10
        session.advance(fixed_now());
        for _ in 2..QUESTIONS_PER_QUIZ {
            session.answer_current(0).unwrap(); // +10 each
            session.advance(fixed_now());
        }
        assert!(session.is_complete());

        let report = QuizReport::from_session(&session).unwrap();
        assert_eq!(report.total_questions(), 10);
        assert_eq!(report.correct_count(), 9);
        assert_eq!(report.percentage(), 90);
        assert_eq!(report.final_score(), 100);
        assert_eq!(report.cumulative_scores()[0], 30);
        assert_eq!(report.cumulative_scores()[1], 20);
        assert_eq!(*report.cumulative_scores().last().unwrap(), 100);
        assert_eq!(report.question_leverages()[0], Some(Leverage::Triple));
        assert_eq!(report.question_leverages()[1], None);
    }

    #[test]
    fn leverage_does_not_change_correct_count() {
        let mut session = QuizSession::new("History", build_set(), fixed_now());
        session.select_leverage(Leverage::Half);
        session.answer_current(0).unwrap(); // correct, but only +5
        session.advance(fixed_now());
        for _ in 1..QUESTIONS_PER_QUIZ {
            session.answer_current(2).unwrap();
            session.advance(fixed_now());
        }

        let report = QuizReport::from_session(&session).unwrap();
        assert_eq!(report.correct_count(), 1);
        assert_eq!(report.percentage(), 10);
        assert_eq!(report.final_score(), 5 - 90);
    }
}
