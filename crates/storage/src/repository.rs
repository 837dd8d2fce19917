use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use quiz_core::model::{Leverage, LeverageInventory, Question, QuestionSet, QuizSession};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted shape for a single question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    pub explanation: Option<String>,
}

impl QuestionRecord {
    #[must_use]
    pub fn from_question(question: &Question) -> Self {
        let explanation = question.explanation();
        Self {
            id: question.id().to_owned(),
            question: question.text().to_owned(),
            options: question.options().to_vec(),
            correct_answer: question.correct_answer(),
            explanation: (!explanation.is_empty()).then(|| explanation.to_owned()),
        }
    }
}

/// Persisted state of one leverage slot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LeverageSlotRecord {
    pub leverage: Leverage,
    pub used: bool,
}

/// Persisted snapshot of a quiz session.
///
/// This mirrors the domain `QuizSession` so stores can serialize and
/// deserialize without leaking storage concerns into the domain layer.
/// Rehydration re-validates everything through the domain constructors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub topic: String,
    pub questions: Vec<QuestionRecord>,
    pub current_index: usize,
    pub answers: Vec<Option<usize>>,
    pub pending_leverage: Option<Leverage>,
    pub leverages: Vec<LeverageSlotRecord>,
    pub question_leverages: Vec<Option<Leverage>>,
    pub question_points: Vec<i64>,
    pub score: i64,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub saved_at: DateTime<Utc>,
}

impl SessionRecord {
    #[must_use]
    pub fn from_session(session: &QuizSession, saved_at: DateTime<Utc>) -> Self {
        Self {
            topic: session.topic().to_owned(),
            questions: session
                .questions()
                .iter()
                .map(QuestionRecord::from_question)
                .collect(),
            current_index: session.current_index(),
            answers: session.answers().to_vec(),
            pending_leverage: session.pending_leverage(),
            leverages: session
                .leverages()
                .slots()
                .iter()
                .map(|slot| LeverageSlotRecord {
                    leverage: slot.leverage(),
                    used: slot.used(),
                })
                .collect(),
            question_leverages: session.question_leverages().to_vec(),
            question_points: session.question_points().to_vec(),
            score: session.score(),
            started_at: session.started_at(),
            completed_at: session.completed_at(),
            saved_at,
        }
    }

    /// Convert the record back into a domain `QuizSession`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if any question or the
    /// session state fails domain validation.
    pub fn into_session(self) -> Result<QuizSession, StorageError> {
        fn ser<E: core::fmt::Display>(e: E) -> StorageError {
            StorageError::Serialization(e.to_string())
        }

        let mut questions = Vec::with_capacity(self.questions.len());
        for record in self.questions {
            questions.push(
                Question::new(
                    record.id,
                    record.question,
                    record.options,
                    record.correct_answer,
                    record.explanation,
                )
                .map_err(ser)?,
            );
        }
        let questions = QuestionSet::new(questions).map_err(ser)?;

        let mut leverages = LeverageInventory::new();
        for slot in &self.leverages {
            if slot.used {
                leverages.mark_used(slot.leverage);
            }
        }

        QuizSession::from_persisted(
            self.topic,
            questions,
            self.current_index,
            self.answers,
            self.pending_leverage,
            leverages,
            self.question_leverages,
            self.question_points,
            self.score,
            self.started_at,
            self.completed_at,
        )
        .map_err(ser)
    }
}

/// Repository contract for persisted sessions, keyed by caller-chosen slot.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist or overwrite the session stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot cannot be stored.
    async fn save_session(&self, key: &str, record: &SessionRecord) -> Result<(), StorageError>;

    /// Fetch the session stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on connection or decoding failures.
    async fn load_session(&self, key: &str) -> Result<Option<SessionRecord>, StorageError>;

    /// Remove the session stored under `key`. Removing a missing key is
    /// a no-op.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on connection failures.
    async fn delete_session(&self, key: &str) -> Result<(), StorageError>;
}

/// Simple in-memory store implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<Mutex<HashMap<String, SessionRecord>>>,
}

impl InMemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn save_session(&self, key: &str, record: &SessionRecord) -> Result<(), StorageError> {
        let mut guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), record.clone());
        Ok(())
    }

    async fn load_session(&self, key: &str) -> Result<Option<SessionRecord>, StorageError> {
        let guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn delete_session(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(key);
        Ok(())
    }
}

/// Aggregates the session store behind a trait object for easy backend
/// swapping.
#[derive(Clone)]
pub struct Storage {
    pub sessions: Arc<dyn SessionStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            sessions: Arc::new(InMemorySessionStore::new()),
        }
    }
}
