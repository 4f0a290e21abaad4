//! PrepMate core: interview practice sessions with scored free-text answers.
//!
//! The library owns question selection, answer scoring (heuristic with an
//! optional remote LLM provider in front), and the append-only session
//! transcript. Presentation is a caller concern; the bundled binary is one
//! thin example of such a caller.

pub mod config;
pub mod scoring;
pub mod session;
pub mod store;

pub use config::ScoringConfig;
pub use scoring::{
    AIProvider, RemotePreference, ScoreResult, ScoringEngine, ScoringError,
};
pub use session::{InterviewManager, QuestionCatalog};
pub use store::{
    Domain, ResponseRecord, SessionRecord, SessionSummary, SqliteStore, StoreError, UserProfile,
};
