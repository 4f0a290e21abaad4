//! OpenAI-backed answer scorer (chat-completion style).

use log::{error, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::reply;
use super::{Result, ScoreResult, ScoringError};
use crate::config::ScoringConfig;

const SYSTEM_PROMPT: &str = "You are an expert interview coach. Evaluate the user's answer \
     to the question using a short rubric. Return a JSON object containing at least: \
     score (0-10), feedback (brief text). You may include optional fields like polarity, \
     relevance. Be concise and return only valid JSON or text that includes JSON.";

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Clone, Debug)]
pub struct OpenAiScorer {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiScorer {
    pub fn new(api_key: String, model: String) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .connect_timeout(std::time::Duration::from_secs(5))
            .build()
            .unwrap_or_else(|_| Client::new());

        OpenAiScorer {
            client,
            api_key,
            model,
            base_url: "https://api.openai.com/v1".to_string(),
        }
    }

    /// Fails with `MissingCredential` before any I/O when no key is set.
    pub fn from_config(config: &ScoringConfig) -> Result<Self> {
        let api_key = config
            .openai_api_key
            .clone()
            .ok_or(ScoringError::MissingCredential("openai"))?;
        Ok(Self::new(api_key, config.openai_model.clone()))
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Ask the model to grade the answer and parse its reply.
    pub async fn score(&self, question: &str, answer: &str) -> Result<ScoreResult> {
        let user_prompt = format!(
            "Question: {}\n\nAnswer: {}\n\nProvide a short evaluation and a numeric score \
             from 0 (poor) to 10 (excellent). Return the result as JSON.",
            question, answer
        );

        info!("Requesting evaluation from OpenAI with model: {}", self.model);
        let content = self
            .chat(vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_prompt,
                },
            ], 300, 0.2)
            .await?;

        reply::parse_reply(&content)
    }

    /// Diagnostic probe: one minimal request, truncated reply on success.
    /// Never part of the scoring path.
    pub async fn validate_credentials(&self) -> Result<String> {
        let content = self
            .chat(vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: "You are a test assistant.".to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: "Reply with OK.".to_string(),
                },
            ], 5, 0.0)
            .await?;

        Ok(content.trim().chars().take(200).collect())
    }

    async fn chat(
        &self,
        messages: Vec<ChatMessage>,
        max_tokens: u32,
        temperature: f64,
    ) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages,
            max_tokens,
            temperature,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("OpenAI API error {}: {}", status, error_text);
            return Err(ScoringError::Provider(format!(
                "OpenAI API error {}: {}",
                status, error_text
            )));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| ScoringError::Provider(format!("invalid OpenAI response: {}", e)))?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ScoringError::Provider("no response choices from OpenAI".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_fails_before_any_io() {
        let config = ScoringConfig::offline();
        let err = OpenAiScorer::from_config(&config).unwrap_err();
        assert!(matches!(err, ScoringError::MissingCredential("openai")));
    }

    #[test]
    fn configured_key_builds_a_scorer() {
        let config = ScoringConfig {
            openai_api_key: Some("sk-test".to_string()),
            ..ScoringConfig::offline()
        };
        let scorer = OpenAiScorer::from_config(&config).unwrap();
        assert_eq!(scorer.model, "gpt-3.5-turbo");
    }

    fn chat_body(content: &str) -> String {
        serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": content}}]
        })
        .to_string()
    }

    #[tokio::test]
    async fn extracts_score_from_model_reply() {
        let body = chat_body(r#"Evaluation: {"score": 8, "feedback": "Solid answer."}"#);
        let base_url = crate::scoring::testing::serve_once("application/json", &body);
        let scorer =
            OpenAiScorer::new("sk-test".to_string(), "gpt-3.5-turbo".to_string())
                .with_base_url(base_url);

        let result = scorer.score("Q", "A").await.unwrap();
        assert_eq!(result.score, 8.0);
        assert_eq!(result.feedback, "Solid answer.");
    }

    #[tokio::test]
    async fn reply_without_any_score_is_a_parse_failure() {
        let body = chat_body("A thoughtful response, but I cannot grade it.");
        let base_url = crate::scoring::testing::serve_once("application/json", &body);
        let scorer =
            OpenAiScorer::new("sk-test".to_string(), "gpt-3.5-turbo".to_string())
                .with_base_url(base_url);

        let err = scorer.score("Q", "A").await.unwrap_err();
        assert!(matches!(err, ScoringError::ParseFailure));
    }

    #[tokio::test]
    async fn transport_failure_is_a_provider_error() {
        let scorer = OpenAiScorer::new("sk-test".to_string(), "gpt-3.5-turbo".to_string())
            .with_base_url(crate::scoring::testing::refused_url());

        let err = scorer.score("Q", "A").await.unwrap_err();
        assert!(matches!(err, ScoringError::Provider(_)));
    }
}
