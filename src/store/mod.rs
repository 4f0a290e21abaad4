pub mod models;
pub mod sqlite;

pub use models::{Domain, ResponseRecord, SessionRecord, SessionSummary, UserProfile};
pub use sqlite::SqliteStore;

use thiserror::Error;

/// Persistence failures always surface to the caller: a scoring glitch is
/// tolerable, a silently lost answer is not.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to open store: {0}")]
    Open(String),
    #[error("query failed: {0}")]
    Query(String),
    #[error("session not found: {0}")]
    SessionNotFound(i64),
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;
