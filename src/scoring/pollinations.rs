//! Pollinations-backed answer scorer (generative-text style).
//!
//! Unlike the chat API this endpoint takes the whole prompt as a query
//! parameter and replies with plain text, which may or may not contain the
//! JSON we asked for. The shared reply parser handles both cases.

use log::{error, info};
use reqwest::Client;

use super::reply;
use super::{Result, ScoreResult, ScoringError};
use crate::config::ScoringConfig;

const RUBRIC_PROMPT: &str = "You are an expert interview coach. Evaluate the user's answer \
     to the question using a short rubric. Return a JSON object containing at least: \
     score (0-10), feedback (brief text).";

#[derive(Clone)]
pub struct PollinationsScorer {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    referrer: String,
    model: String,
}

impl PollinationsScorer {
    pub fn new(api_key: Option<String>, referrer: String, model: String) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .connect_timeout(std::time::Duration::from_secs(5))
            .build()
            .unwrap_or_else(|_| Client::new());

        PollinationsScorer {
            client,
            base_url: "https://text.pollinations.ai".to_string(),
            api_key,
            referrer,
            model,
        }
    }

    /// The API key is optional here; the endpoint accepts anonymous calls.
    pub fn from_config(config: &ScoringConfig) -> Self {
        Self::new(
            config.pollinations_api_key.clone(),
            config.pollinations_referrer.clone(),
            config.pollinations_model.clone(),
        )
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Ask the model to grade the answer and parse its reply.
    pub async fn score(&self, question: &str, answer: &str) -> Result<ScoreResult> {
        let prompt = format!(
            "{}\nQuestion: {}\n\nAnswer: {}\n\nReturn the result as JSON.",
            RUBRIC_PROMPT, question, answer
        );

        info!(
            "Requesting evaluation from Pollinations with model: {}",
            self.model
        );
        let text = self.generate(&prompt).await?;
        reply::parse_reply(&text)
    }

    /// Diagnostic probe: one minimal request, truncated reply on success.
    /// Never part of the scoring path.
    pub async fn validate_credentials(&self) -> Result<String> {
        let text = self
            .generate("Please reply with a short confirmation: OK.")
            .await?;
        Ok(text.trim().chars().take(200).collect())
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let mut url = reqwest::Url::parse(&format!("{}/", self.base_url))
            .map_err(|e| ScoringError::Provider(format!("invalid Pollinations URL: {}", e)))?;
        url.query_pairs_mut()
            .append_pair("prompt", prompt)
            .append_pair("model", &self.model)
            .append_pair("private", "true")
            .append_pair("referrer", &self.referrer);

        let mut request = self
            .client
            .get(url)
            .header("User-Agent", "PrepMate/1.0")
            .header("Accept", "text/plain");
        if let Some(api_key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("Pollinations API error {}: {}", status, error_text);
            return Err(ScoringError::Provider(format!(
                "Pollinations API error {}: {}",
                status, error_text
            )));
        }

        let text = response.text().await?;

        // The service serves an HTML landing page for some malformed requests.
        if text.trim_start().starts_with("<!DOCTYPE html>") || text.trim_start().starts_with("<html")
        {
            return Err(ScoringError::Provider(
                "received HTML response instead of plain text".to_string(),
            ));
        }
        if text.trim().is_empty() {
            return Err(ScoringError::Provider(
                "empty response from Pollinations API".to_string(),
            ));
        }

        Ok(text.trim().to_string())
    }
}
