//! Scoring policy: remote when enabled and healthy, heuristic otherwise.
//!
//! `ScoringEngine::evaluate` is the one call the session layer makes and the
//! one guarantee the scoring subsystem gives: it always returns a result.
//! Remote failures of any kind degrade silently to the heuristic scorer.

use log::{debug, warn};

use super::{heuristic, round1, AIProvider, Result, ScoreResult};
use super::{OpenAiScorer, PollinationsScorer};
use crate::config::ScoringConfig;

/// Per-call remote-scoring preference, overriding the process-wide flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemotePreference {
    /// Follow the configured enable flag.
    Auto,
    /// Force remote scoring with the configured provider.
    On,
    /// Heuristic only.
    Off,
    /// Force remote scoring with a specific provider.
    Provider(AIProvider),
}

pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    /// Built once at startup; the config is frozen for the process lifetime.
    pub fn new(config: ScoringConfig) -> Self {
        ScoringEngine { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score an answer. Never fails.
    ///
    /// Remote output is normalized before it is returned: the score is
    /// rounded to one decimal and clamped into [0, 10], with non-finite
    /// values collapsing to 0.0. With remote scoring disabled the result is
    /// exactly what the heuristic scorer produces.
    pub async fn evaluate(
        &self,
        question: &str,
        answer: &str,
        preference: RemotePreference,
    ) -> ScoreResult {
        let enabled = match preference {
            RemotePreference::On | RemotePreference::Provider(_) => true,
            RemotePreference::Off => false,
            RemotePreference::Auto => self.config.remote_enabled,
        };

        if enabled {
            let provider = match preference {
                RemotePreference::Provider(p) => p,
                _ => self.config.provider,
            };
            match self.score_remote(provider, question, answer).await {
                Ok(result) => {
                    debug!("remote scoring via {} succeeded", provider.as_str());
                    return normalize(result);
                }
                Err(err) => {
                    warn!(
                        "remote scoring via {} failed, falling back to heuristics: {}",
                        provider.as_str(),
                        err
                    );
                }
            }
        }

        heuristic::score(question, answer)
    }

    /// Diagnostic credential probe for one provider; out-of-band only.
    pub async fn validate_credentials(&self, provider: AIProvider) -> Result<String> {
        match provider {
            AIProvider::OpenAI => {
                OpenAiScorer::from_config(&self.config)?
                    .validate_credentials()
                    .await
            }
            AIProvider::Pollinations => {
                PollinationsScorer::from_config(&self.config)
                    .validate_credentials()
                    .await
            }
        }
    }

    async fn score_remote(
        &self,
        provider: AIProvider,
        question: &str,
        answer: &str,
    ) -> Result<ScoreResult> {
        match provider {
            AIProvider::OpenAI => {
                OpenAiScorer::from_config(&self.config)?
                    .score(question, answer)
                    .await
            }
            AIProvider::Pollinations => {
                PollinationsScorer::from_config(&self.config)
                    .score(question, answer)
                    .await
            }
        }
    }
}

fn normalize(mut result: ScoreResult) -> ScoreResult {
    let score = if result.score.is_finite() {
        result.score
    } else {
        0.0
    };
    result.score = round1(score.clamp(0.0, 10.0));
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::ScoringError;

    fn offline_engine() -> ScoringEngine {
        ScoringEngine::new(ScoringConfig::offline())
    }

    #[tokio::test]
    async fn disabled_remote_matches_heuristic_exactly() {
        let engine = offline_engine();
        let question = "Tell me about yourself.";
        let answer = "I am a software engineer with experience leading teams.";

        let evaluated = engine.evaluate(question, answer, RemotePreference::Auto).await;
        let direct = heuristic::score(question, answer);

        assert_eq!(
            serde_json::to_string(&evaluated).unwrap(),
            serde_json::to_string(&direct).unwrap()
        );
    }

    #[tokio::test]
    async fn forced_remote_without_credential_falls_back() {
        let engine = offline_engine();
        let question = "Tell me about yourself.";
        let answer = "I am a software engineer with experience leading teams.";

        let evaluated = engine.evaluate(question, answer, RemotePreference::On).await;
        assert_eq!(evaluated, heuristic::score(question, answer));
    }

    #[tokio::test]
    async fn explicit_provider_without_credential_falls_back() {
        let engine = offline_engine();
        let evaluated = engine
            .evaluate(
                "Any question",
                "Any answer",
                RemotePreference::Provider(AIProvider::OpenAI),
            )
            .await;
        assert!((0.0..=10.0).contains(&evaluated.score));
        assert_eq!(evaluated, heuristic::score("Any question", "Any answer"));
    }

    #[tokio::test]
    async fn off_preference_never_attempts_remote() {
        let config = ScoringConfig {
            remote_enabled: true,
            ..ScoringConfig::offline()
        };
        let engine = ScoringEngine::new(config);

        // No credential is configured, so a remote attempt would fall back
        // anyway; Off must not even need that.
        let evaluated = engine
            .evaluate("Question?", "Answer.", RemotePreference::Off)
            .await;
        assert_eq!(evaluated, heuristic::score("Question?", "Answer."));
    }

    #[tokio::test]
    async fn probe_without_credential_reports_failure() {
        let engine = offline_engine();
        let err = engine
            .validate_credentials(AIProvider::OpenAI)
            .await
            .unwrap_err();
        assert!(matches!(err, ScoringError::MissingCredential("openai")));
    }

    #[test]
    fn normalize_clamps_out_of_range_scores() {
        assert_eq!(normalize(ScoreResult::new(15.0, "")).score, 10.0);
        assert_eq!(normalize(ScoreResult::new(-3.0, "")).score, 0.0);
        assert_eq!(normalize(ScoreResult::new(7.25, "")).score, 7.3);
        assert_eq!(normalize(ScoreResult::new(f64::NAN, "")).score, 0.0);
        assert_eq!(normalize(ScoreResult::new(f64::INFINITY, "")).score, 0.0);
    }
}
