use sqlx::Row;

use super::SqliteStore;
use crate::repository::{SessionRecord, SessionStore, StorageError};

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

#[async_trait::async_trait]
impl SessionStore for SqliteStore {
    async fn save_session(&self, key: &str, record: &SessionRecord) -> Result<(), StorageError> {
        let state = serde_json::to_string(record).map_err(ser)?;

        sqlx::query(
            r"
                INSERT INTO sessions (key, topic, state, saved_at)
                VALUES (?1, ?2, ?3, ?4)
                ON CONFLICT(key) DO UPDATE SET
                    topic = excluded.topic,
                    state = excluded.state,
                    saved_at = excluded.saved_at
            ",
        )
        .bind(key)
        .bind(&record.topic)
        .bind(state)
        .bind(record.saved_at)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }

    async fn load_session(&self, key: &str) -> Result<Option<SessionRecord>, StorageError> {
        let row = sqlx::query(
            r"
                SELECT state
                FROM sessions
                WHERE key = ?1
            ",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let state: String = row.try_get("state").map_err(ser)?;
        let record: SessionRecord = serde_json::from_str(&state).map_err(ser)?;
        Ok(Some(record))
    }

    async fn delete_session(&self, key: &str) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM sessions WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }
}
