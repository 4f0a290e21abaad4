//! Embedded SQLite store for sessions and their response logs.
//!
//! One process-wide handle serves all sessions. Responses are append-only;
//! the log for a session reads back in submission order.

use chrono::{DateTime, Utc};
use log::info;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use super::models::{Domain, ResponseRecord, SessionRecord, UserProfile};
use super::{Result, StoreError};
use crate::scoring::ScoreResult;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS sessions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_name TEXT NOT NULL,
    user_email TEXT NOT NULL,
    domain TEXT NOT NULL,
    started_at TEXT NOT NULL,
    ended_at TEXT
);
CREATE TABLE IF NOT EXISTS responses (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id INTEGER NOT NULL,
    question TEXT NOT NULL,
    answer TEXT NOT NULL,
    feedback TEXT NOT NULL,
    score REAL NOT NULL,
    created_at TEXT NOT NULL
);
";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path.as_ref())
            .map_err(|e| StoreError::Open(e.to_string()))?;
        info!("opened session store at {}", path.as_ref().display());
        Self::with_connection(conn)
    }

    /// Private in-memory store, used by tests and throwaway runs.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StoreError::Open(e.to_string()))?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)
            .map_err(|e| StoreError::Open(format!("schema setup failed: {}", e)))?;
        Ok(SqliteStore {
            conn: Mutex::new(conn),
        })
    }

    pub fn create_session(&self, user: &UserProfile) -> Result<i64> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO sessions (user_name, user_email, domain, started_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                user.name,
                user.email,
                user.domain.as_str(),
                Utc::now().to_rfc3339(),
            ],
        )
        .map_err(|e| StoreError::Query(format!("failed to create session: {}", e)))?;

        let session_id = conn.last_insert_rowid();
        info!("created session {} for {}", session_id, user.name);
        Ok(session_id)
    }

    /// Append one response to a session's log.
    pub fn append_response(
        &self,
        session_id: i64,
        question: &str,
        answer: &str,
        result: &ScoreResult,
    ) -> Result<i64> {
        let feedback_json = serde_json::to_string(result)
            .map_err(|e| StoreError::Query(format!("failed to serialize feedback: {}", e)))?;

        let conn = self.conn.lock();
        let exists: Option<i64> = conn
            .query_row(
                "SELECT id FROM sessions WHERE id = ?1",
                params![session_id],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| StoreError::Query(e.to_string()))?;
        if exists.is_none() {
            return Err(StoreError::SessionNotFound(session_id));
        }

        conn.execute(
            "INSERT INTO responses (session_id, question, answer, feedback, score, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                session_id,
                question,
                answer,
                feedback_json,
                crate::scoring::round1(result.score),
                Utc::now().to_rfc3339(),
            ],
        )
        .map_err(|e| StoreError::Query(format!("failed to save response: {}", e)))?;

        Ok(conn.last_insert_rowid())
    }

    pub fn session(&self, session_id: i64) -> Result<SessionRecord> {
        let conn = self.conn.lock();
        let row = conn
            .query_row(
                "SELECT id, user_name, user_email, domain, started_at, ended_at
                 FROM sessions WHERE id = ?1",
                params![session_id],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, Option<String>>(5)?,
                    ))
                },
            )
            .optional()
            .map_err(|e| StoreError::Query(e.to_string()))?
            .ok_or(StoreError::SessionNotFound(session_id))?;

        let (id, user_name, user_email, domain, started_at, ended_at) = row;
        Ok(SessionRecord {
            id,
            user_name,
            user_email,
            domain: Domain::from_str(&domain)
                .ok_or_else(|| StoreError::Corrupt(format!("unknown domain: {}", domain)))?,
            started_at: parse_timestamp(&started_at)?,
            ended_at: ended_at.as_deref().map(parse_timestamp).transpose()?,
        })
    }

    /// The session's responses in submission order.
    pub fn responses_for(&self, session_id: i64) -> Result<Vec<ResponseRecord>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare(
                "SELECT id, session_id, question, answer, feedback, score, created_at
                 FROM responses WHERE session_id = ?1 ORDER BY id",
            )
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let rows = stmt
            .query_map(params![session_id], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, f64>(5)?,
                    row.get::<_, String>(6)?,
                ))
            })
            .map_err(|e| StoreError::Query(e.to_string()))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| StoreError::Query(e.to_string()))?;

        rows.into_iter()
            .map(|(id, session_id, question, answer, feedback, score, created_at)| {
                Ok(ResponseRecord {
                    id,
                    session_id,
                    question,
                    answer,
                    feedback: serde_json::from_str(&feedback).map_err(|e| {
                        StoreError::Corrupt(format!("bad feedback for response {}: {}", id, e))
                    })?,
                    score,
                    created_at: parse_timestamp(&created_at)?,
                })
            })
            .collect()
    }

    /// Stamp the session's end time.
    pub fn close_session(&self, session_id: i64) -> Result<()> {
        let conn = self.conn.lock();
        let updated = conn
            .execute(
                "UPDATE sessions SET ended_at = ?1 WHERE id = ?2",
                params![Utc::now().to_rfc3339(), session_id],
            )
            .map_err(|e| StoreError::Query(format!("failed to close session: {}", e)))?;

        if updated == 0 {
            return Err(StoreError::SessionNotFound(session_id));
        }
        info!("closed session {}", session_id);
        Ok(())
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Corrupt(format!("bad timestamp {}: {}", value, e)))
}
