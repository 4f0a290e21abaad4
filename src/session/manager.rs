//! Session lifecycle: registration, question selection, answer submission,
//! and the end-of-run summary. Wires the catalog, the scoring engine, and
//! the store together; owns no scoring or storage logic itself.

use log::info;
use std::path::Path;
use std::sync::Arc;

use super::catalog::QuestionCatalog;
use crate::config::ScoringConfig;
use crate::scoring::{RemotePreference, ScoreResult, ScoringEngine};
use crate::store::models::{Domain, ResponseRecord, SessionSummary, UserProfile};
use crate::store::{Result, SqliteStore};

pub struct InterviewManager {
    catalog: QuestionCatalog,
    store: Arc<SqliteStore>,
    engine: ScoringEngine,
}

impl InterviewManager {
    pub fn new(catalog: QuestionCatalog, store: Arc<SqliteStore>, engine: ScoringEngine) -> Self {
        InterviewManager {
            catalog,
            store,
            engine,
        }
    }

    /// Catalog file + store path + config, the usual production wiring.
    pub fn open<P: AsRef<Path>, Q: AsRef<Path>>(
        questions_path: P,
        db_path: Q,
        config: ScoringConfig,
    ) -> Result<Self> {
        let store = Arc::new(SqliteStore::open(db_path)?);
        Ok(Self::new(
            QuestionCatalog::load(questions_path),
            store,
            ScoringEngine::new(config),
        ))
    }

    /// Create a session for the user. Only persistence can make this fail.
    pub fn start(&self, user: &UserProfile) -> Result<i64> {
        let session_id = self.store.create_session(user)?;
        info!(
            "started {} practice session {} for {}",
            user.domain.as_str(),
            session_id,
            user.name
        );
        Ok(session_id)
    }

    /// Uniformly random question for the type, or `None` on an empty pool.
    /// Repeated calls may repeat questions.
    pub fn next_question(&self, interview_type: Domain) -> Option<String> {
        self.catalog.pick(interview_type)
    }

    /// Score the answer and append it to the session log. Scoring itself
    /// cannot fail; any error here is a persistence failure.
    pub async fn submit(
        &self,
        session_id: i64,
        question: &str,
        answer: &str,
        preference: RemotePreference,
    ) -> Result<ScoreResult> {
        let result = self.engine.evaluate(question, answer, preference).await;
        self.store
            .append_response(session_id, question, answer, &result)?;
        info!(
            "session {}: recorded answer scored {:.1}",
            session_id, result.score
        );
        Ok(result)
    }

    /// Close the session, stamping its end time.
    pub fn end(&self, session_id: i64) -> Result<()> {
        self.store.close_session(session_id)
    }

    /// The session's responses in submission order.
    pub fn responses(&self, session_id: i64) -> Result<Vec<ResponseRecord>> {
        self.store.responses_for(session_id)
    }

    /// Aggregate view the presentation layer renders as a table and chart.
    pub fn summary(&self, session_id: i64) -> Result<SessionSummary> {
        let session = self.store.session(session_id)?;
        let responses = self.store.responses_for(session_id)?;
        let response_count = responses.len();
        let average_score = if response_count == 0 {
            0.0
        } else {
            let total: f64 = responses.iter().map(|r| r.score).sum();
            crate::scoring::round1(total / response_count as f64)
        };

        Ok(SessionSummary {
            session,
            response_count,
            average_score,
            responses,
        })
    }
}
