use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scoring::ScoreResult;

/// Interview domain chosen at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Hr,
    Technical,
    /// Draws from both question pools.
    Mixed,
}

impl Domain {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "hr" => Some(Domain::Hr),
            "technical" => Some(Domain::Technical),
            "mixed" => Some(Domain::Mixed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Domain::Hr => "hr",
            Domain::Technical => "technical",
            Domain::Mixed => "mixed",
        }
    }
}

/// Registration details; embedded into the session row, never stored alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub domain: Domain,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: i64,
    pub user_name: String,
    pub user_email: String,
    pub domain: Domain,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

/// One submitted answer with its scoring outcome. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub id: i64,
    pub session_id: i64,
    pub question: String,
    pub answer: String,
    pub feedback: ScoreResult,
    pub score: f64,
    pub created_at: DateTime<Utc>,
}

/// Aggregated view of one finished (or in-progress) practice run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session: SessionRecord,
    pub response_count: usize,
    pub average_score: f64,
    pub responses: Vec<ResponseRecord>,
}
