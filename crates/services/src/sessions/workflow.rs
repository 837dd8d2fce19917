use std::sync::Arc;

use quiz_core::model::{AnswerOutcome, Leverage, QuestionSet, QuizSession};
use storage::repository::{SessionRecord, SessionStore};

use crate::Clock;
use crate::error::SessionError;

/// A single state transition requested against a quiz session.
#[derive(Debug, Clone)]
pub enum QuizAction {
    /// Arm a leverage multiplier for the current question.
    SelectLeverage(Leverage),
    /// Answer the current question with the given option index.
    Answer(usize),
    /// Move on to the next question, or complete the quiz.
    Advance,
    /// Start over, optionally with a new topic and question set.
    Reset {
        topic: Option<String>,
        questions: Option<QuestionSet>,
    },
}

/// Result of dispatching a single action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Whether the action changed session state (and was persisted).
    pub changed: bool,
    /// Populated for `Answer` actions.
    pub answer: Option<AnswerOutcome>,
    pub is_complete: bool,
}

/// Orchestrates quiz sessions and keeps them persisted across restarts.
///
/// Every state-changing dispatch writes the full session snapshot to the
/// store, mirroring how a browser client would write through to local
/// storage after each reducer step. The in-memory session stays
/// authoritative: a failed write surfaces as `SessionError::Storage` but
/// does not roll the transition back.
#[derive(Clone)]
pub struct QuizFlowService {
    clock: Clock,
    sessions: Arc<dyn SessionStore>,
}

impl QuizFlowService {
    #[must_use]
    pub fn new(clock: Clock, sessions: Arc<dyn SessionStore>) -> Self {
        Self { clock, sessions }
    }

    /// Start a fresh session under `key` and persist it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the initial snapshot cannot be
    /// written.
    pub async fn start(
        &self,
        key: &str,
        topic: impl Into<String>,
        questions: QuestionSet,
    ) -> Result<QuizSession, SessionError> {
        let session = QuizSession::new(topic, questions, self.clock.now());
        self.persist(key, &session).await?;
        Ok(session)
    }

    /// Load the session stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` on load or rehydration failures.
    pub async fn resume(&self, key: &str) -> Result<Option<QuizSession>, SessionError> {
        let Some(record) = self.sessions.load_session(key).await? else {
            return Ok(None);
        };
        Ok(Some(record.into_session()?))
    }

    /// Apply `action` to `session` and persist the result when it changed
    /// state.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Quiz` for invalid answer indices and
    /// `SessionError::Storage` for persistence failures.
    pub async fn dispatch(
        &self,
        key: &str,
        session: &mut QuizSession,
        action: QuizAction,
    ) -> Result<DispatchOutcome, SessionError> {
        let mut answer = None;
        let changed = match action {
            QuizAction::SelectLeverage(leverage) => session.select_leverage(leverage),
            QuizAction::Answer(choice) => {
                let was_answered = session.current_answered();
                answer = Some(session.answer_current(choice)?);
                !was_answered
            }
            QuizAction::Advance => session.advance(self.clock.now()),
            QuizAction::Reset { topic, questions } => {
                *session = session.reset(topic, questions, self.clock.now());
                true
            }
        };

        if changed {
            self.persist(key, session).await?;
        }

        Ok(DispatchOutcome {
            changed,
            answer,
            is_complete: session.is_complete(),
        })
    }

    /// Remove the stored session under `key`. Missing keys are a no-op.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` on connection failures.
    pub async fn clear(&self, key: &str) -> Result<(), SessionError> {
        self.sessions.delete_session(key).await?;
        Ok(())
    }

    async fn persist(&self, key: &str, session: &QuizSession) -> Result<(), SessionError> {
        let record = SessionRecord::from_session(session, self.clock.now());
        self.sessions.save_session(key, &record).await?;
        Ok(())
    }
}
