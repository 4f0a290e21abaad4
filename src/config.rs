//! Scoring configuration.
//!
//! All remote-scoring knobs are read from the environment exactly once and
//! frozen into a `ScoringConfig` that callers pass by reference. Nothing in
//! the scoring path looks up the environment after construction, and every
//! field is optional: an empty environment yields a config that scores
//! heuristically.

use log::debug;

use crate::scoring::AIProvider;

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_POLLINATIONS_MODEL: &str = "openai";
pub const DEFAULT_POLLINATIONS_REFERRER: &str = "prepmate";

#[derive(Debug, Clone)]
pub struct ScoringConfig {
    /// Process-wide remote-scoring enable flag.
    pub remote_enabled: bool,
    /// Provider used when the caller does not name one.
    pub provider: AIProvider,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub pollinations_api_key: Option<String>,
    pub pollinations_referrer: String,
    pub pollinations_model: String,
}

impl ScoringConfig {
    /// Build the config from the process environment.
    pub fn from_env() -> Self {
        let remote_enabled = std::env::var("USE_REMOTE_SCORING")
            .map(|v| truthy(&v))
            .unwrap_or(false);
        let provider = std::env::var("AI_PROVIDER")
            .ok()
            .and_then(|v| AIProvider::from_str(v.to_lowercase().trim()))
            .unwrap_or(AIProvider::OpenAI);

        let config = ScoringConfig {
            remote_enabled,
            provider,
            openai_api_key: non_empty(std::env::var("OPENAI_API_KEY").ok()),
            openai_model: std::env::var("OPENAI_MODEL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_MODEL.to_string()),
            pollinations_api_key: non_empty(std::env::var("POLLINATIONS_API_KEY").ok()),
            pollinations_referrer: std::env::var("POLLINATIONS_REFERRER")
                .unwrap_or_else(|_| DEFAULT_POLLINATIONS_REFERRER.to_string()),
            pollinations_model: std::env::var("POLLINATIONS_MODEL")
                .unwrap_or_else(|_| DEFAULT_POLLINATIONS_MODEL.to_string()),
        };

        debug!(
            "scoring config: remote_enabled={}, provider={}, openai_key={}, pollinations_key={}",
            config.remote_enabled,
            config.provider.as_str(),
            if config.openai_api_key.is_some() { "set" } else { "unset" },
            if config.pollinations_api_key.is_some() { "set" } else { "unset" },
        );

        config
    }

    /// A config with remote scoring off and all defaults; heuristic only.
    pub fn offline() -> Self {
        ScoringConfig {
            remote_enabled: false,
            provider: AIProvider::OpenAI,
            openai_api_key: None,
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            pollinations_api_key: None,
            pollinations_referrer: DEFAULT_POLLINATIONS_REFERRER.to_string(),
            pollinations_model: DEFAULT_POLLINATIONS_MODEL.to_string(),
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self::offline()
    }
}

fn truthy(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes")
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
