//! SQLite-backed chat message history.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection};
use serde::Serialize;
use uuid::Uuid;

/// Who wrote a stored message.
pub const SENDER_USER: &str = "user";
pub const SENDER_AI: &str = "ai";

/// One stored chat message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub id: String,
    pub sender: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("IO error: {0}")]
    IoError(String),
}

/// Append-only message log.
pub struct MessageLog {
    conn: Mutex<Connection>,
}

impl MessageLog {
    /// Open (or create) the log at `database_url`.
    ///
    /// Accepts a plain path or a `sqlite:` prefixed one; `:memory:` keeps the
    /// log in memory.
    pub fn new(database_url: &str) -> Result<Self, HistoryError> {
        let path = database_url.strip_prefix("sqlite:").unwrap_or(database_url);

        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| HistoryError::IoError(e.to_string()))?;
            }
        }

        let conn =
            Connection::open(path).map_err(|e| HistoryError::DatabaseError(e.to_string()))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS messages (
                id TEXT PRIMARY KEY,
                sender TEXT NOT NULL,
                text TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )
        .map_err(|e| HistoryError::DatabaseError(e.to_string()))?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_messages_created_at ON messages(created_at)",
            [],
        )
        .map_err(|e| HistoryError::DatabaseError(e.to_string()))?;

        tracing::info!("Message history initialized with database: {}", path);

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Store a message and return it with its id and timestamp.
    pub fn append(&self, sender: &str, text: &str) -> Result<Message, HistoryError> {
        let message = Message {
            id: Uuid::new_v4().to_string(),
            sender: sender.to_string(),
            text: text.to_string(),
            created_at: Utc::now(),
        };

        let conn = self
            .conn
            .lock()
            .map_err(|e| HistoryError::DatabaseError(e.to_string()))?;

        conn.execute(
            "INSERT INTO messages (id, sender, text, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                message.id,
                message.sender,
                message.text,
                message.created_at.to_rfc3339_opts(SecondsFormat::Nanos, true),
            ],
        )
        .map_err(|e| HistoryError::DatabaseError(e.to_string()))?;

        tracing::debug!("Stored {} message {}", message.sender, message.id);
        Ok(message)
    }

    /// Every stored message, oldest first.
    pub fn list(&self) -> Result<Vec<Message>, HistoryError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| HistoryError::DatabaseError(e.to_string()))?;

        let mut stmt = conn
            .prepare(
                "SELECT id, sender, text, created_at FROM messages ORDER BY created_at, rowid",
            )
            .map_err(|e| HistoryError::DatabaseError(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })
            .map_err(|e| HistoryError::DatabaseError(e.to_string()))?;

        let mut messages = Vec::new();
        for row in rows {
            let (id, sender, text, created_at) =
                row.map_err(|e| HistoryError::DatabaseError(e.to_string()))?;
            let created_at = DateTime::parse_from_rfc3339(&created_at)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| HistoryError::DatabaseError(e.to_string()))?;
            messages.push(Message {
                id,
                sender,
                text,
                created_at,
            });
        }

        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_list_in_order() {
        let log = MessageLog::new(":memory:").unwrap();
        let first = log.append(SENDER_USER, "hello").unwrap();
        let second = log.append(SENDER_AI, "AI says: hello").unwrap();

        let messages = log.list().unwrap();
        assert_eq!(messages, vec![first, second]);
        assert_eq!(messages[0].sender, "user");
        assert_eq!(messages[1].text, "AI says: hello");
    }

    #[test]
    fn test_empty_log() {
        let log = MessageLog::new("sqlite::memory:").unwrap();
        assert!(log.list().unwrap().is_empty());
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("messages.db");
        let url = format!("sqlite:{}", path.display());

        MessageLog::new(&url).unwrap().append(SENDER_USER, "kept").unwrap();

        let reopened = MessageLog::new(&url).unwrap();
        let messages = reopened.list().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text, "kept");
    }
}
