use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;

use crate::model::leverage::{Leverage, LeverageInventory};
use crate::model::question::{OPTION_COUNT, Question, QuestionSet};
use crate::scoring;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Errors from driving the quiz state machine.
///
/// Only one thing can actually go wrong: an out-of-range answer choice,
/// which indicates a bug in the calling layer rather than a user-facing
/// condition. Everything else is modelled as a quiet no-op.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("answer choice {choice} is out of range (0-3)")]
    InvalidChoiceIndex { choice: usize },
}

/// Errors from rehydrating a persisted session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionStateError {
    #[error("{field} has {found} entries for {expected} questions")]
    LengthMismatch {
        field: &'static str,
        found: usize,
        expected: usize,
    },

    #[error("current index {index} is out of range for {len} questions")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("recorded answer {choice} for question {index} is out of range")]
    RecordedAnswerOutOfRange { index: usize, choice: usize },

    #[error("score {score} does not match the sum of question points ({sum})")]
    ScoreMismatch { score: i64, sum: i64 },

    #[error("pending leverage {0} is already marked used")]
    PendingLeverageUsed(Leverage),
}

//
// ─── ANSWER OUTCOME ────────────────────────────────────────────────────────────
//

/// Outcome of answering a single question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub question_index: usize,
    pub choice: usize,
    pub correct: bool,
    pub leverage: Option<Leverage>,
    pub points: i64,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// State of one quiz attempt, from first question to final report.
///
/// Owns progression through the question set, answer recording,
/// leverage bookkeeping, and the running score. Every operation leaves
/// the session fully consistent: the current index never exceeds the
/// last question, each answer slot is written at most once, and `score`
/// always equals the sum of `question_points`.
#[derive(Clone, PartialEq)]
pub struct QuizSession {
    topic: String,
    questions: QuestionSet,
    current: usize,
    answers: Vec<Option<usize>>,
    pending_leverage: Option<Leverage>,
    leverages: LeverageInventory,
    question_leverages: Vec<Option<Leverage>>,
    question_points: Vec<i64>,
    score: i64,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    /// Creates a fresh session over a validated question set.
    ///
    /// `started_at` should come from the services layer clock to keep
    /// time deterministic.
    #[must_use]
    pub fn new(topic: impl Into<String>, questions: QuestionSet, started_at: DateTime<Utc>) -> Self {
        let len = questions.len();
        Self {
            topic: topic.into(),
            questions,
            current: 0,
            answers: vec![None; len],
            pending_leverage: None,
            leverages: LeverageInventory::new(),
            question_leverages: vec![None; len],
            question_points: vec![0; len],
            score: 0,
            started_at,
            completed_at: None,
        }
    }

    /// Rehydrates a session from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `SessionStateError` if the parallel vectors do not match
    /// the question count, the index is out of bounds, a recorded
    /// answer is out of range, the score does not equal the sum of the
    /// question points, or a pending leverage is already used.
    #[allow(clippy::too_many_arguments)]
    pub fn from_persisted(
        topic: String,
        questions: QuestionSet,
        current: usize,
        answers: Vec<Option<usize>>,
        pending_leverage: Option<Leverage>,
        leverages: LeverageInventory,
        question_leverages: Vec<Option<Leverage>>,
        question_points: Vec<i64>,
        score: i64,
        started_at: DateTime<Utc>,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<Self, SessionStateError> {
        let len = questions.len();
        for (field, found) in [
            ("answers", answers.len()),
            ("question_leverages", question_leverages.len()),
            ("question_points", question_points.len()),
        ] {
            if found != len {
                return Err(SessionStateError::LengthMismatch {
                    field,
                    found,
                    expected: len,
                });
            }
        }
        if current >= len {
            return Err(SessionStateError::IndexOutOfRange {
                index: current,
                len,
            });
        }
        for (index, answer) in answers.iter().enumerate() {
            if let Some(choice) = *answer {
                if choice >= OPTION_COUNT {
                    return Err(SessionStateError::RecordedAnswerOutOfRange { index, choice });
                }
            }
        }
        let sum: i64 = question_points.iter().sum();
        if score != sum {
            return Err(SessionStateError::ScoreMismatch { score, sum });
        }
        if let Some(leverage) = pending_leverage {
            if leverages.is_used(leverage) {
                return Err(SessionStateError::PendingLeverageUsed(leverage));
            }
        }

        Ok(Self {
            topic,
            questions,
            current,
            answers,
            pending_leverage,
            leverages,
            question_leverages,
            question_points,
            score,
            started_at,
            completed_at,
        })
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    #[must_use]
    pub fn questions(&self) -> &QuestionSet {
        &self.questions
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The question at the current index. Stays addressable after
    /// completion, when the index is pinned to the last question.
    #[must_use]
    pub fn current_question(&self) -> &Question {
        &self.questions.as_slice()[self.current]
    }

    #[must_use]
    pub fn answers(&self) -> &[Option<usize>] {
        &self.answers
    }

    #[must_use]
    pub fn pending_leverage(&self) -> Option<Leverage> {
        self.pending_leverage
    }

    #[must_use]
    pub fn leverages(&self) -> &LeverageInventory {
        &self.leverages
    }

    #[must_use]
    pub fn question_leverages(&self) -> &[Option<Leverage>] {
        &self.question_leverages
    }

    #[must_use]
    pub fn question_points(&self) -> &[i64] {
        &self.question_points
    }

    #[must_use]
    pub fn score(&self) -> i64 {
        self.score
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Number of questions that have a recorded answer.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.iter().flatten().count()
    }

    #[must_use]
    pub fn current_answered(&self) -> bool {
        self.answers[self.current].is_some()
    }

    /// Stages a leverage for the current, not-yet-answered question.
    ///
    /// Selection is quietly rejected (returning `false`, state
    /// untouched) when the current question is already answered,
    /// another leverage is pending, or this leverage was already
    /// consumed. A rejected selection never substitutes a different
    /// multiplier.
    pub fn select_leverage(&mut self, leverage: Leverage) -> bool {
        if self.current_answered()
            || self.pending_leverage.is_some()
            || self.leverages.is_used(leverage)
        {
            return false;
        }
        self.pending_leverage = Some(leverage);
        true
    }

    /// Records an answer for the current question.
    ///
    /// Scores the choice against the question, applies and consumes a
    /// pending leverage, and updates the running total. Answering an
    /// already-answered question is a no-op that returns the recorded
    /// outcome unchanged.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidChoiceIndex` if `choice` is not in
    /// `0..4` — a caller contract violation, not a user condition.
    pub fn answer_current(&mut self, choice: usize) -> Result<AnswerOutcome, QuizError> {
        let index = self.current;
        if let Some(recorded) = self.answers[index] {
            return Ok(AnswerOutcome {
                question_index: index,
                choice: recorded,
                correct: self.questions.as_slice()[index].is_correct(recorded),
                leverage: self.question_leverages[index],
                points: self.question_points[index],
            });
        }
        if choice >= OPTION_COUNT {
            return Err(QuizError::InvalidChoiceIndex { choice });
        }

        let correct = self.questions.as_slice()[index].is_correct(choice);
        let leverage = self.pending_leverage.take();
        let points = scoring::points_for(correct, leverage);

        self.answers[index] = Some(choice);
        self.question_leverages[index] = leverage;
        self.question_points[index] = points;
        self.score += points;
        if let Some(leverage) = leverage {
            self.leverages.mark_used(leverage);
        }

        Ok(AnswerOutcome {
            question_index: index,
            choice,
            correct,
            leverage,
            points,
        })
    }

    /// Moves to the next question, or completes the session after the
    /// last one.
    ///
    /// Answering is mandatory: advancing an unanswered question is a
    /// no-op returning `false`. An unconsumed pending leverage is
    /// dropped without being marked used. On the final question the
    /// index stays pinned so its data remains addressable in the
    /// completed state.
    pub fn advance(&mut self, now: DateTime<Utc>) -> bool {
        if !self.current_answered() || self.is_complete() {
            return false;
        }
        self.pending_leverage = None;
        if self.current + 1 >= self.questions.len() {
            self.completed_at = Some(now);
        } else {
            self.current += 1;
        }
        true
    }

    /// A brand-new session reusing this one's topic and questions
    /// unless replacements are given.
    #[must_use]
    pub fn reset(
        &self,
        topic: Option<String>,
        questions: Option<QuestionSet>,
        now: DateTime<Utc>,
    ) -> Self {
        Self::new(
            topic.unwrap_or_else(|| self.topic.clone()),
            questions.unwrap_or_else(|| self.questions.clone()),
            now,
        )
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("topic", &self.topic)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("answered", &self.answered_count())
            .field("score", &self.score)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::question::QUESTIONS_PER_QUIZ;
    use crate::time::fixed_now;

    fn build_question(id: usize) -> Question {
        Question::new(
            format!("q{id}"),
            format!("Question {id}?"),
            vec!["A".into(), "B".into(), "C".into(), "D".into()],
            0,
            Some("Because A.".into()),
        )
        .unwrap()
    }

    fn build_set() -> QuestionSet {
        QuestionSet::new((0..QUESTIONS_PER_QUIZ).map(build_question).collect()).unwrap()
    }

    fn build_session() -> QuizSession {
        QuizSession::new("History", build_set(), fixed_now())
    }

    #[test]
    fn leveraged_scenario_matches_scoring_rules() {
        let mut session = build_session();
        assert_eq!(session.score(), 0);
        assert_eq!(session.leverages().available().count(), 3);

        assert!(session.select_leverage(Leverage::Triple));
        let outcome = session.answer_current(0).unwrap();
        assert!(outcome.correct);
        assert_eq!(outcome.points, 30);
        assert_eq!(session.question_points()[0], 30);
        assert_eq!(session.score(), 30);
        assert!(session.leverages().is_used(Leverage::Triple));
        assert_eq!(session.pending_leverage(), None);

        assert!(session.advance(fixed_now()));
        let outcome = session.answer_current(1).unwrap();
        assert!(!outcome.correct);
        assert_eq!(outcome.points, -10);
        assert_eq!(session.question_points()[1], -10);
        assert_eq!(session.score(), 20);
    }

    #[test]
    fn answering_twice_is_a_noop() {
        let mut session = build_session();
        session.answer_current(0).unwrap();
        let score = session.score();

        let outcome = session.answer_current(3).unwrap();
        assert_eq!(outcome.choice, 0);
        assert_eq!(outcome.points, 10);
        assert_eq!(session.score(), score);
        assert_eq!(session.question_points()[0], 10);
    }

    #[test]
    fn second_answer_does_not_consume_pending_leverage() {
        let mut session = build_session();
        session.answer_current(2).unwrap();

        // leverage cannot even be staged once the question is answered
        assert!(!session.select_leverage(Leverage::Double));
        session.answer_current(0).unwrap();
        assert!(!session.leverages().is_used(Leverage::Double));
    }

    #[test]
    fn out_of_range_choice_is_an_error() {
        let mut session = build_session();
        let err = session.answer_current(4).unwrap_err();
        assert_eq!(err, QuizError::InvalidChoiceIndex { choice: 4 });
        assert_eq!(session.answered_count(), 0);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn leverage_selection_rejections() {
        let mut session = build_session();
        assert!(session.select_leverage(Leverage::Double));
        // something already pending
        assert!(!session.select_leverage(Leverage::Triple));
        assert_eq!(session.pending_leverage(), Some(Leverage::Double));

        session.answer_current(0).unwrap();
        session.advance(fixed_now());
        // already consumed
        assert!(!session.select_leverage(Leverage::Double));
        assert_eq!(session.pending_leverage(), None);
        assert!(session.select_leverage(Leverage::Half));
    }

    #[test]
    fn advance_requires_an_answer() {
        let mut session = build_session();
        assert!(!session.advance(fixed_now()));
        assert_eq!(session.current_index(), 0);

        session.answer_current(0).unwrap();
        assert!(session.advance(fixed_now()));
        assert_eq!(session.current_index(), 1);
    }

    #[test]
    fn full_run_completes_with_index_pinned() {
        let mut session = build_session();
        for _ in 0..QUESTIONS_PER_QUIZ {
            session.answer_current(0).unwrap();
            session.advance(fixed_now());
        }
        assert!(session.is_complete());
        assert_eq!(session.current_index(), QUESTIONS_PER_QUIZ - 1);
        assert_eq!(session.score(), 100);
        assert!(!session.advance(fixed_now()));
        assert_eq!(session.current_question().id(), "q9");
    }

    #[test]
    fn score_is_sum_of_question_points() {
        let mut session = build_session();
        session.select_leverage(Leverage::Half);
        session.answer_current(1).unwrap();
        session.advance(fixed_now());
        session.answer_current(0).unwrap();
        session.advance(fixed_now());
        session.answer_current(3).unwrap();

        let sum: i64 = session.question_points().iter().sum();
        assert_eq!(session.score(), sum);
        assert_eq!(session.score(), -5 + 10 - 10);
    }

    #[test]
    fn reset_produces_a_fresh_session() {
        let mut session = build_session();
        session.select_leverage(Leverage::Triple);
        session.answer_current(0).unwrap();
        session.advance(fixed_now());

        let fresh = session.reset(None, None, fixed_now());
        assert_eq!(fresh.topic(), "History");
        assert_eq!(fresh.score(), 0);
        assert_eq!(fresh.current_index(), 0);
        assert_eq!(fresh.answered_count(), 0);
        assert_eq!(fresh.leverages().available().count(), 3);
        assert!(!fresh.is_complete());

        let renamed = session.reset(Some("Space".into()), None, fixed_now());
        assert_eq!(renamed.topic(), "Space");
    }

    #[test]
    fn from_persisted_validates_invariants() {
        let session = build_session();
        let ok = QuizSession::from_persisted(
            "History".into(),
            build_set(),
            2,
            session.answers().to_vec(),
            None,
            LeverageInventory::new(),
            session.question_leverages().to_vec(),
            session.question_points().to_vec(),
            0,
            fixed_now(),
            None,
        );
        assert!(ok.is_ok());

        let err = QuizSession::from_persisted(
            "History".into(),
            build_set(),
            10,
            vec![None; 10],
            None,
            LeverageInventory::new(),
            vec![None; 10],
            vec![0; 10],
            0,
            fixed_now(),
            None,
        )
        .unwrap_err();
        assert_eq!(err, SessionStateError::IndexOutOfRange { index: 10, len: 10 });

        let err = QuizSession::from_persisted(
            "History".into(),
            build_set(),
            0,
            vec![None; 10],
            None,
            LeverageInventory::new(),
            vec![None; 10],
            vec![0; 10],
            25,
            fixed_now(),
            None,
        )
        .unwrap_err();
        assert_eq!(err, SessionStateError::ScoreMismatch { score: 25, sum: 0 });

        let mut used = LeverageInventory::new();
        used.mark_used(Leverage::Double);
        let err = QuizSession::from_persisted(
            "History".into(),
            build_set(),
            0,
            vec![None; 10],
            Some(Leverage::Double),
            used,
            vec![None; 10],
            vec![0; 10],
            0,
            fixed_now(),
            None,
        )
        .unwrap_err();
        assert_eq!(err, SessionStateError::PendingLeverageUsed(Leverage::Double));

        let err = QuizSession::from_persisted(
            "History".into(),
            build_set(),
            0,
            vec![None; 9],
            None,
            LeverageInventory::new(),
            vec![None; 10],
            vec![0; 10],
            0,
            fixed_now(),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, SessionStateError::LengthMismatch { field: "answers", .. }));
    }
}
